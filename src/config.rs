use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the kernel command line consumed by kernel-install.
pub const DEFAULT_CMDLINE_PATH: &str = "/etc/kernel/cmdline";

/// Environment variable overriding [`Config::cmdline_path`].
pub const CMDLINE_PATH_ENV: &str = "KERNEL_CMDLINE_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub cmdline_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cmdline_path: PathBuf::from(DEFAULT_CMDLINE_PATH),
        }
    }
}

impl Config {
    pub fn new(cmdline_path: impl Into<PathBuf>) -> Self {
        Self {
            cmdline_path: cmdline_path.into(),
        }
    }

    /// Load a TOML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading kernel-cmdline config '{}'", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("parsing kernel-cmdline config '{}'", path.display()))?;
        Ok(config)
    }

    /// Apply `KERNEL_CMDLINE_FILE` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var(CMDLINE_PATH_ENV).ok().as_deref())
    }

    fn with_overrides(mut self, cmdline_path: Option<&str>) -> Self {
        if let Some(path) = cmdline_path.map(str::trim).filter(|path| !path.is_empty()) {
            self.cmdline_path = PathBuf::from(path);
        }
        self
    }
}
