use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use kernel_cmdline::{run, Config, Invocation};
use tracing_subscriber::EnvFilter;

fn usage() -> &'static str {
    "Usage:\n  kernel-cmdline [--config <config.toml>] <request.json|->\n\n\
     request fields: parameter, value, state (present|absent), check_mode, diff\n\
     environment: KERNEL_CMDLINE_FILE overrides the cmdline path"
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Apply {
        config: Option<PathBuf>,
        request: String,
    },
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [flag] if flag == "-h" || flag == "--help" => Ok(Command::Help),
        [config_flag, config_path, request] if config_flag == "--config" => Ok(Command::Apply {
            config: Some(PathBuf::from(config_path)),
            request: request.clone(),
        }),
        [request] if !request.starts_with("--") => Ok(Command::Apply {
            config: None,
            request: request.clone(),
        }),
        _ => bail!(usage()),
    }
}

fn load_config(config: Option<&Path>) -> Result<Config> {
    let config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok(config.with_env_overrides())
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, request_source) = match parse_args(&args)? {
        Command::Help => {
            println!("{}", usage());
            return Ok(());
        }
        Command::Apply { config, request } => (load_config(config.as_deref())?, request),
    };

    let invocation = read_invocation(&request_source)?;
    let (request, options) = invocation.into_parts();

    let report = run(&config, &request, options).with_context(|| {
        format!(
            "applying {} '{}' to '{}'",
            request.state,
            request.parameter,
            config.cmdline_path.display()
        )
    })?;

    let json = serde_json::to_string(&report).context("encoding result")?;
    println!("{json}");
    Ok(())
}

fn read_invocation(source: &str) -> Result<Invocation> {
    let text = if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading request from stdin")?;
        text
    } else {
        fs::read_to_string(source).with_context(|| format!("reading request '{source}'"))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing request '{source}'"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_cmdline::State;
    use tempfile::TempDir;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn request_path_alone_uses_default_config() {
        assert_eq!(
            parse_args(&args(&["request.json"])).unwrap(),
            Command::Apply {
                config: None,
                request: "request.json".to_string(),
            }
        );
    }

    #[test]
    fn dash_reads_request_from_stdin() {
        assert_eq!(
            parse_args(&args(&["-"])).unwrap(),
            Command::Apply {
                config: None,
                request: "-".to_string(),
            }
        );
    }

    #[test]
    fn config_flag_takes_path_before_request() {
        assert_eq!(
            parse_args(&args(&["--config", "/etc/kernel-cmdline.toml", "-"])).unwrap(),
            Command::Apply {
                config: Some(PathBuf::from("/etc/kernel-cmdline.toml")),
                request: "-".to_string(),
            }
        );
    }

    #[test]
    fn help_and_malformed_args() {
        assert_eq!(parse_args(&args(&["--help"])).unwrap(), Command::Help);
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), Command::Help);

        for bad in [
            args(&[]),
            args(&["--config"]),
            args(&["--config", "c.toml"]),
            args(&["--verbose", "c.toml", "r.json"]),
            args(&["a.json", "b.json"]),
        ] {
            let err = parse_args(&bad).unwrap_err();
            assert!(err.to_string().contains("Usage:"), "expected usage for {bad:?}");
        }
    }

    #[test]
    fn load_config_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kernel-cmdline.toml");
        fs::write(&path, "cmdline_path = \"/boot/cmdline.txt\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        // KERNEL_CMDLINE_FILE, when set in the test environment, wins.
        if std::env::var_os(kernel_cmdline::config::CMDLINE_PATH_ENV).is_none() {
            assert_eq!(config.cmdline_path, PathBuf::from("/boot/cmdline.txt"));
        }

        assert!(load_config(Some(&temp.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn read_invocation_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("request.json");
        fs::write(&path, r#"{"parameter": "splash", "state": "absent", "diff": true}"#).unwrap();

        let (request, options) = read_invocation(path.to_str().unwrap())
            .unwrap()
            .into_parts();
        assert_eq!(request.parameter, "splash");
        assert_eq!(request.state, State::Absent);
        assert!(options.diff);
        assert!(!options.check_mode);
    }

    #[test]
    fn read_invocation_rejects_bad_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("request.json");
        fs::write(&path, r#"{"value": "3"}"#).unwrap();

        let err = read_invocation(path.to_str().unwrap()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing request"));
    }
}
