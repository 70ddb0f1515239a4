//! core::config::env
//!
//! Tracker settings resolved from the process environment.
//!
//! # Overlay
//!
//! A `.env` file in the project root may supply any variable as a
//! `KEY=value` line. File values only fill gaps: a variable already set in
//! the real environment always wins. The overlay is held in an
//! [`Environment`] value; the process environment is never modified.
//!
//! # Variables
//!
//! | variable | required | notes |
//! |---|---|---|
//! | `JIRA_BASE_URL` | yes | trailing `/` removed |
//! | `JIRA_EMAIL` | yes | |
//! | `JIRA_API_SECRET` / `JIRA_API_TOKEN` | yes | first non-blank wins |
//! | `JIRA_PROJECT_KEY` | yes | |
//! | `JIRA_ISSUE_TYPE` | no | defaults to `Bug` |

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::ConfigError;

pub const BASE_URL_VAR: &str = "JIRA_BASE_URL";
pub const IDENTITY_VAR: &str = "JIRA_EMAIL";
pub const SECRET_VAR: &str = "JIRA_API_SECRET";
pub const TOKEN_VAR: &str = "JIRA_API_TOKEN";
pub const PROJECT_KEY_VAR: &str = "JIRA_PROJECT_KEY";
pub const ISSUE_TYPE_VAR: &str = "JIRA_ISSUE_TYPE";

/// Variable that skips test execution when set to `true`.
pub const SKIP_TESTS_VAR: &str = "FAULTLINE_SKIP_TESTS";

/// Issue type used when none is configured.
pub const DEFAULT_ISSUE_TYPE: &str = "Bug";

/// Process environment with the `.env` overlay merged underneath it.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Snapshot the process environment and merge `env_file` under it.
    ///
    /// A missing file is not an error.
    pub fn load(env_file: &Path) -> Result<Self, ConfigError> {
        let mut env = Self::from_pairs(std::env::vars());
        if env_file.is_file() {
            let contents = fs::read_to_string(env_file).map_err(|e| ConfigError::ReadError {
                path: env_file.to_path_buf(),
                source: e,
            })?;
            env.overlay(parse_env_file(&contents));
        }
        Ok(env)
    }

    /// Build an environment from explicit pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Fill in keys that are not already defined.
    pub fn overlay(&mut self, pairs: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in pairs {
            self.vars.entry(key).or_insert(value);
        }
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Look up a variable, treating blank values as undefined.
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    /// Boolean flag: `true` (any case) is true, everything else false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// Parse `KEY=value` lines.
///
/// Blank lines, `#` comments and lines without `=` are skipped. One layer
/// of matching single or double quotes around the value is stripped.
pub fn parse_env_file(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Tracker connection settings for one run.
///
/// # Invariants
///
/// - `base_url` has no trailing slash
/// - `base_url`, `identity`, `secret` and `project_key` are non-blank
#[derive(Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub base_url: String,
    pub identity: String,
    pub secret: String,
    pub project_key: String,
    pub issue_type_name: String,
}

// Keep the secret out of debug output.
impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("base_url", &self.base_url)
            .field("identity", &self.identity)
            .field("project_key", &self.project_key)
            .field("issue_type_name", &self.issue_type_name)
            .finish()
    }
}

impl RunConfig {
    /// Resolve settings from an environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming every required variable that
    /// is absent or blank.
    ///
    /// # Example
    ///
    /// ```
    /// use faultline::core::config::{Environment, RunConfig};
    ///
    /// let env = Environment::from_pairs([
    ///     ("JIRA_BASE_URL", "https://acme.atlassian.net/"),
    ///     ("JIRA_EMAIL", "qa@acme.test"),
    ///     ("JIRA_API_TOKEN", "t0k3n"),
    ///     ("JIRA_PROJECT_KEY", "QA"),
    /// ]);
    /// let config = RunConfig::from_env(&env).unwrap();
    /// assert_eq!(config.base_url, "https://acme.atlassian.net");
    /// assert_eq!(config.issue_type_name, "Bug");
    /// ```
    pub fn from_env(env: &Environment) -> Result<Self, ConfigError> {
        let base_url = env.non_blank(BASE_URL_VAR);
        let identity = env.non_blank(IDENTITY_VAR);
        let secret = env
            .non_blank(SECRET_VAR)
            .or_else(|| env.non_blank(TOKEN_VAR));
        let project_key = env.non_blank(PROJECT_KEY_VAR);

        let mut missing = Vec::new();
        if base_url.is_none() {
            missing.push(BASE_URL_VAR.to_string());
        }
        if identity.is_none() {
            missing.push(IDENTITY_VAR.to_string());
        }
        if secret.is_none() {
            missing.push(TOKEN_VAR.to_string());
        }
        if project_key.is_none() {
            missing.push(PROJECT_KEY_VAR.to_string());
        }

        match (base_url, identity, secret, project_key) {
            (Some(base_url), Some(identity), Some(secret), Some(project_key)) => Ok(Self {
                base_url: base_url.trim().trim_end_matches('/').to_string(),
                identity: identity.trim().to_string(),
                secret: secret.trim().to_string(),
                project_key: project_key.trim().to_string(),
                issue_type_name: env
                    .non_blank(ISSUE_TYPE_VAR)
                    .map(|v| v.trim().to_string())
                    .unwrap_or_else(|| DEFAULT_ISSUE_TYPE.to_string()),
            }),
            _ => Err(ConfigError::Missing(missing)),
        }
    }
}
