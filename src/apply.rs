//! Orchestration: read, merge, diff and (unless checking) commit.
//!
//! [`evaluate`] is the pure core over an in-memory [`ParameterSet`]; [`run`]
//! wraps it with file access and produces the [`Report`] handed back to the
//! calling harness.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commit::commit;
use crate::config::Config;
use crate::error::Result;
use crate::merge;
use crate::params::{read_parameters, ParameterSet};
use crate::request::{ChangeRequest, State};

/// Result of merging a request into a parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub changed: bool,
    pub before: String,
    pub after: String,
    pub final_set: ParameterSet,
}

/// Execution flags supplied by the harness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Compute and report without touching the file.
    pub check_mode: bool,
    /// Include the before/after lines in the report.
    pub diff: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    pub before: String,
    pub after: String,
}

/// Result object returned to the harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub changed: bool,
    pub parameter: String,
    pub value: Option<String>,
    pub state: State,
    pub parameters: ParameterSet,
    pub cmdline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Diff>,
}

/// Full harness input: the change plus execution flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Invocation {
    pub parameter: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub state: State,
    #[serde(default)]
    pub check_mode: bool,
    #[serde(default)]
    pub diff: bool,
}

impl Invocation {
    pub fn into_parts(self) -> (ChangeRequest, RunOptions) {
        (
            ChangeRequest {
                parameter: self.parameter,
                value: self.value,
                state: self.state,
            },
            RunOptions {
                check_mode: self.check_mode,
                diff: self.diff,
            },
        )
    }
}

pub fn evaluate(current: &ParameterSet, request: &ChangeRequest) -> Outcome {
    let (final_set, changed) = merge::apply(current, request);
    Outcome {
        changed,
        before: current.to_cmdline(),
        after: final_set.to_cmdline(),
        final_set,
    }
}

/// Apply `request` to the cmdline file named by `config`.
///
/// The request is validated before the file is opened. The file is only
/// rewritten when the set changed and `check_mode` is off.
pub fn run(config: &Config, request: &ChangeRequest, options: RunOptions) -> Result<Report> {
    request.validate()?;

    let path = &config.cmdline_path;
    let current = read_parameters(path)?;
    let outcome = evaluate(&current, request);

    if options.check_mode {
        debug!(path = %path.display(), changed = outcome.changed, "check mode; not writing");
    } else if outcome.changed {
        commit(&outcome.after, path)?;
    } else {
        info!(path = %path.display(), parameter = %request.parameter, "kernel cmdline already up to date");
    }

    let diff = options.diff.then(|| Diff {
        before: outcome.before.clone(),
        after: outcome.after.clone(),
    });

    Ok(Report {
        changed: outcome.changed,
        parameter: request.parameter.clone(),
        value: request.value.clone(),
        state: request.state,
        parameters: outcome.final_set,
        cmdline: outcome.after,
        diff,
    })
}
