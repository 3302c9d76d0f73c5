//! Requested change to a single kernel parameter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CmdlineError, Result};

/// Desired state of the requested parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    #[default]
    Present,
    Absent,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Present => f.write_str("present"),
            State::Absent => f.write_str("absent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub parameter: String,
    pub value: Option<String>,
    pub state: State,
}

impl ChangeRequest {
    pub fn present(parameter: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            parameter: parameter.into(),
            value: value.map(str::to_string),
            state: State::Present,
        }
    }

    pub fn absent(parameter: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            value: None,
            state: State::Absent,
        }
    }

    /// Reject requests that cannot be represented as a single cmdline token.
    ///
    /// Names must be non-empty and free of whitespace and `=`; values must be
    /// free of whitespace. Nothing else about names or values is checked.
    pub fn validate(&self) -> Result<()> {
        if self.parameter.is_empty() {
            return Err(CmdlineError::Validation(
                "parameter name must not be empty".to_string(),
            ));
        }
        if self.parameter.chars().any(char::is_whitespace) {
            return Err(CmdlineError::Validation(format!(
                "parameter name '{}' must not contain whitespace",
                self.parameter
            )));
        }
        if self.parameter.contains('=') {
            return Err(CmdlineError::Validation(format!(
                "parameter name '{}' must not contain '='; pass the value separately",
                self.parameter
            )));
        }
        if let Some(value) = &self.value {
            if value.chars().any(char::is_whitespace) {
                return Err(CmdlineError::Validation(format!(
                    "value '{}' for parameter '{}' must not contain whitespace; \
                     the cmdline is whitespace-separated and it would split into several tokens",
                    value, self.parameter
                )));
            }
        }
        Ok(())
    }
}
