//! Idempotent editing of the kernel boot parameter line.
//!
//! `/etc/kernel/cmdline` holds one line of whitespace-separated
//! `key[=value]` tokens. This crate applies a single change to it:
//!
//! - **Parse** the file into an ordered [`ParameterSet`]
//! - **Merge** a [`ChangeRequest`] (present/absent) into a new set
//! - **Serialize** both sets for the before/after diff
//! - **Commit** the new line with an atomic temp-file rename, unless running
//!   in check mode
//!
//! # Example
//!
//! ```rust,no_run
//! use kernel_cmdline::{run, ChangeRequest, Config, RunOptions};
//!
//! let config = Config::default();
//! let request = ChangeRequest::present("loglevel", Some("3"));
//! let report = run(&config, &request, RunOptions { check_mode: true, diff: true })?;
//! println!("changed={} cmdline={}", report.changed, report.cmdline);
//! # Ok::<(), kernel_cmdline::CmdlineError>(())
//! ```

pub mod apply;
pub mod commit;
pub mod config;
pub mod error;
pub mod merge;
pub mod params;
pub mod request;

pub use apply::{evaluate, run, Diff, Invocation, Outcome, Report, RunOptions};
pub use config::Config;
pub use error::CmdlineError;
pub use params::ParameterSet;
pub use request::{ChangeRequest, State};
