//! core::config::schema
//!
//! Project settings file schema.
//!
//! # Location
//!
//! 1. `$FAULTLINE_CONFIG` if set
//! 2. `faultline.toml` in the project root
//!
//! The file is optional; every field has a default.
//!
//! # Validation
//!
//! Values are validated after parsing: commands need a program, labels
//! cannot contain whitespace.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Project settings (all optional).
///
/// # Example
///
/// ```toml
/// test_command = ["mvn", "-Pci", "clean", "test"]
/// report_command = ["mvn", "-DskipTests", "surefire-report:report-only"]
/// labels = ["WEB", "automated-test"]
/// artifacts_dir = "build/jira"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSettings {
    /// Command that runs the test suite
    pub test_command: Option<Vec<String>>,

    /// Command that renders the HTML report
    pub report_command: Option<Vec<String>>,

    /// Labels put on every filed issue
    pub labels: Option<Vec<String>>,

    /// Holding directory for produced archives
    pub artifacts_dir: Option<String>,
}

impl ProjectSettings {
    /// Validate the settings values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, command) in [
            ("test_command", &self.test_command),
            ("report_command", &self.report_command),
        ] {
            if let Some(command) = command {
                match command.first() {
                    Some(program) if !program.trim().is_empty() => {}
                    _ => {
                        return Err(ConfigError::InvalidValue(format!(
                            "{} must name a program",
                            field
                        )))
                    }
                }
            }
        }

        if let Some(labels) = &self.labels {
            if let Some(bad) = labels
                .iter()
                .find(|l| l.is_empty() || l.chars().any(char::is_whitespace))
            {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid label '{}': labels must be non-empty and contain no whitespace",
                    bad
                )));
            }
        }

        if let Some(dir) = &self.artifacts_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "artifacts_dir must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
