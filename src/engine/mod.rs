//! engine
//!
//! Runs the reporting pipeline.
//!
//! # Modules
//!
//! - [`exec`] - External test and report commands
//! - [`runner`] - The run lifecycle and exit code policy
//!
//! # Example
//!
//! ```ignore
//! use faultline::engine::runner::{run, RunOptions};
//!
//! let outcome = run(&tracker, &options).await?;
//! std::process::exit(outcome.exit_code);
//! ```

pub mod exec;
pub mod runner;

use std::path::PathBuf;

use crate::ui::output::Verbosity;

pub use exec::ExecError;
pub use runner::{exit_code_for, run, RunError, RunOptions, RunOutcome};

/// Execution context for a run.
///
/// Contains global settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Use existing reports instead of running the test command.
    pub skip_tests: bool,
    /// Environment override file; defaults to `.env` in the project root.
    pub env_file: Option<PathBuf>,
}

impl Context {
    /// Output verbosity for these flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Project root: the override, else the process working directory.
    pub fn root(&self) -> std::io::Result<PathBuf> {
        match &self.cwd {
            Some(dir) => dir.canonicalize(),
            None => std::env::current_dir(),
        }
    }
}
