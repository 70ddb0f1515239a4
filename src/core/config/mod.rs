//! core::config
//!
//! Configuration loading.
//!
//! # Overview
//!
//! A run has two configuration sources:
//! - **Environment**: tracker credentials and project key, with a `.env`
//!   overlay (see [`env`])
//! - **Project settings**: optional `faultline.toml` with commands, labels and
//!   the artifacts directory (see [`schema`])
//!
//! # Precedence
//!
//! Environment variables set in the process win over `.env` values. Project
//! settings fall back to built-in defaults field by field. CLI flags are
//! applied by the caller.
//!
//! # Example
//!
//! ```no_run
//! use faultline::core::config::{Environment, Settings};
//! use std::path::Path;
//!
//! let root = Path::new("/path/to/project");
//! let env = Environment::load(&root.join(".env")).unwrap();
//! let settings = Settings::load(root, &env).unwrap();
//! println!("Test command: {:?}", settings.test_command());
//! println!("Labels: {:?}", settings.labels());
//! ```

pub mod env;
pub mod schema;

pub use env::{parse_env_file, Environment, RunConfig};
pub use schema::ProjectSettings;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::paths::DEFAULT_ARTIFACTS_DIR;

/// Variable that points at an alternate settings file.
pub const SETTINGS_PATH_VAR: &str = "FAULTLINE_CONFIG";

/// Labels put on every filed issue unless configured otherwise.
pub const DEFAULT_LABELS: &[&str] = &[
    "WEB",
    "SELENIUM",
    "CUCUMBER",
    "JAVA",
    "MAVEN",
    "automated-test",
];

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("missing tracker configuration: {}", .0.join(", "))]
    Missing(Vec<String>),
}

/// Project settings with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Parsed file contents (defaults when no file exists)
    pub file: ProjectSettings,
    /// Path the settings were loaded from, if any
    loaded_from: Option<PathBuf>,
}

impl Settings {
    /// Load settings for the project at `root`.
    ///
    /// `$FAULTLINE_CONFIG` (looked up in `env`) replaces the default
    /// `faultline.toml` location.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read,
    /// parsed, or validated. A missing file is not an error.
    pub fn load(root: &Path, env: &Environment) -> Result<Self, ConfigError> {
        let path = match env.non_blank(SETTINGS_PATH_VAR) {
            Some(p) => root.join(p.trim()),
            None => root.join("faultline.toml"),
        };
        Self::load_from(&path)
    }

    /// Load settings from an explicit path (missing file yields defaults).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ProjectSettings =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        file.validate()?;

        Ok(Self {
            file,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    // =========================================================================
    // Accessors with defaults
    // =========================================================================

    /// Command that runs the test suite.
    ///
    /// Defaults to `mvn clean test` (`mvn.cmd` on Windows).
    pub fn test_command(&self) -> Vec<String> {
        self.file
            .test_command
            .clone()
            .unwrap_or_else(|| maven_command(&["clean", "test"]))
    }

    /// Command that renders the HTML report.
    ///
    /// Defaults to `mvn -DskipTests surefire-report:report-only`.
    pub fn report_command(&self) -> Vec<String> {
        self.file
            .report_command
            .clone()
            .unwrap_or_else(|| maven_command(&["-DskipTests", "surefire-report:report-only"]))
    }

    /// Labels put on every filed issue.
    pub fn labels(&self) -> Vec<String> {
        self.file
            .labels
            .clone()
            .unwrap_or_else(|| DEFAULT_LABELS.iter().map(|l| l.to_string()).collect())
    }

    /// Holding directory for produced archives, relative to the project root.
    pub fn artifacts_dir(&self) -> &str {
        self.file
            .artifacts_dir
            .as_deref()
            .unwrap_or(DEFAULT_ARTIFACTS_DIR)
    }

    /// Path the settings were loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}

fn maven_command(args: &[&str]) -> Vec<String> {
    let mvn = if cfg!(windows) { "mvn.cmd" } else { "mvn" };
    std::iter::once(mvn)
        .chain(args.iter().copied())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load_from(&temp.path().join("faultline.toml")).unwrap();

        assert!(settings.loaded_from().is_none());
        assert_eq!(settings.test_command()[1..], ["clean", "test"]);
        assert_eq!(
            settings.report_command()[1..],
            ["-DskipTests", "surefire-report:report-only"]
        );
        assert_eq!(settings.labels(), DEFAULT_LABELS);
        assert_eq!(settings.artifacts_dir(), "jira_artifacts");
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("faultline.toml");
        fs::write(
            &path,
            r#"
            test_command = ["./gradlew", "test"]
            labels = ["nightly"]
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.loaded_from(), Some(path.as_path()));
        assert_eq!(settings.test_command(), vec!["./gradlew", "test"]);
        assert_eq!(settings.labels(), vec!["nightly"]);
        // Untouched fields keep their defaults
        assert_eq!(settings.artifacts_dir(), "jira_artifacts");
    }

    #[test]
    fn env_var_selects_settings_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("ci.toml"), "labels = [\"ci\"]").unwrap();
        fs::write(temp.path().join("faultline.toml"), "labels = [\"local\"]").unwrap();

        let env = Environment::from_pairs([(SETTINGS_PATH_VAR, "ci.toml")]);
        let settings = Settings::load(temp.path(), &env).unwrap();
        assert_eq!(settings.labels(), vec!["ci"]);

        let settings = Settings::load(temp.path(), &Environment::default()).unwrap();
        assert_eq!(settings.labels(), vec!["local"]);
    }

    #[test]
    fn parse_error_names_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("faultline.toml");
        fs::write(&path, "labels = 7").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("faultline.toml"));
    }

    #[test]
    fn invalid_values_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("faultline.toml");
        fs::write(&path, "test_command = []").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
