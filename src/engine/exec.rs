//! engine::exec
//!
//! Runs the external test and report commands.
//!
//! Commands run in the project root with inherited stdio so their output
//! streams straight to the console. The pipeline imposes no timeout.

use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;

use crate::ui::output::{self, Verbosity};

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("empty command")]
    EmptyCommand,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// Exit code of a finished process.
///
/// A process killed by a signal has no code and counts as 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Run `command` (program then arguments) in `cwd` and wait for it.
///
/// # Errors
///
/// Returns an error if the command is empty or cannot be started. A
/// non-zero exit is not an error; it is returned as the code.
pub fn run_command(command: &[String], cwd: &Path, verbosity: Verbosity) -> Result<i32, ExecError> {
    let (program, args) = command
        .split_first()
        .ok_or(ExecError::EmptyCommand)?;

    output::debug(
        format!("running `{}` in {}", command.join(" "), cwd.display()),
        verbosity,
    );

    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .status()
        .map_err(|e| ExecError::Spawn {
            program: program.clone(),
            source: e,
        })?;

    let code = exit_code(status);
    output::debug(format!("`{}` exited with {}", program, code), verbosity);
    Ok(code)
}

/// Print a section banner, then run the command.
pub fn run_step(
    title: &str,
    command: &[String],
    cwd: &Path,
    verbosity: Verbosity,
) -> Result<i32, ExecError> {
    output::banner(title, verbosity);
    run_command(command, cwd, verbosity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn empty_command_is_error() {
        let temp = TempDir::new().unwrap();
        let err = run_command(&[], temp.path(), Verbosity::Quiet).unwrap_err();
        assert!(matches!(err, ExecError::EmptyCommand));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let temp = TempDir::new().unwrap();
        let command = vec!["faultline-no-such-program-xyz".to_string()];
        let err = run_command(&command, temp.path(), Verbosity::Quiet).unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
        assert!(err.to_string().contains("faultline-no-such-program-xyz"));
    }

    #[cfg(unix)]
    #[test]
    fn exit_codes_pass_through() {
        let temp = TempDir::new().unwrap();
        assert_eq!(run_command(&sh("exit 0"), temp.path(), Verbosity::Quiet).unwrap(), 0);
        assert_eq!(run_command(&sh("exit 3"), temp.path(), Verbosity::Quiet).unwrap(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_working_directory() {
        let temp = TempDir::new().unwrap();
        run_command(&sh("touch marker"), temp.path(), Verbosity::Quiet).unwrap();
        assert!(temp.path().join("marker").exists());
    }

    #[cfg(unix)]
    #[test]
    fn signal_counts_as_one() {
        let temp = TempDir::new().unwrap();
        let code = run_command(&sh("kill -9 $$"), temp.path(), Verbosity::Quiet).unwrap();
        assert_eq!(code, 1);
    }
}
