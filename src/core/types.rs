//! core::types
//!
//! Plain value types that flow through a reporting run.
//!
//! # Types
//!
//! - [`FailureRecord`] - One failed or errored test case
//! - [`EvidenceKind`] - The category of evidence an archive holds
//! - [`AttachmentBundle`] - A produced evidence archive on disk
//! - [`IssueTypeEntry`] - An issue type offered by the tracker for a project
//! - [`FiledIssue`] - A ticket the tracker accepted
//!
//! All of these are immutable once built. A run creates them, hands them
//! to the next stage, and drops them when the process exits.

use std::fmt;
use std::path::{Path, PathBuf};

/// Placeholder used when a failure carries no message.
pub const NO_MESSAGE: &str = "No error message";

/// Placeholder used when a failure carries no body text.
pub const NO_DETAILS: &str = "No stack trace available";

/// One failed or errored test case, as read from a result file.
///
/// # Example
///
/// ```
/// use faultline::core::types::{FailureRecord, NO_MESSAGE};
///
/// let failure = FailureRecord::new("LoginTest", "invalidPassword", "0.42", None, Some("trace..."));
/// assert_eq!(failure.test_name, "LoginTest.invalidPassword");
/// assert_eq!(failure.message, NO_MESSAGE);
/// assert_eq!(failure.details, "trace...");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Fully qualified test name (`container.case`, or `case` alone).
    pub test_name: String,
    /// Duration in seconds, verbatim from the report.
    pub duration: String,
    /// Short failure message.
    pub message: String,
    /// Full failure text (stack trace or diagnostic body).
    pub details: String,
}

impl FailureRecord {
    /// Build a record, applying the name-joining and placeholder rules.
    ///
    /// A blank `class_name` yields the case name alone. Message and details
    /// are trimmed; blank or absent values become [`NO_MESSAGE`] and
    /// [`NO_DETAILS`].
    pub fn new(
        class_name: &str,
        case_name: &str,
        duration: impl Into<String>,
        message: Option<&str>,
        details: Option<&str>,
    ) -> Self {
        let test_name = if class_name.trim().is_empty() {
            case_name.to_string()
        } else {
            format!("{}.{}", class_name, case_name)
        };

        Self {
            test_name,
            duration: duration.into(),
            message: text_or(message, NO_MESSAGE),
            details: text_or(details, NO_DETAILS),
        }
    }
}

fn text_or(text: Option<&str>, fallback: &str) -> String {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => fallback.to_string(),
    }
}

/// Evidence category packaged into one archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceKind {
    /// Rendered HTML test report
    RenderedReport,
    /// Raw structured (XML/TXT) result files
    RawReports,
    /// Behavioral-test (Cucumber) reports
    BehaviorReports,
    /// Screenshots captured on failure
    Screenshots,
    /// Run logs and console transcripts
    Logs,
}

impl EvidenceKind {
    /// Every kind, in the order bundles are produced.
    pub fn all() -> &'static [EvidenceKind] {
        &[
            EvidenceKind::RenderedReport,
            EvidenceKind::RawReports,
            EvidenceKind::BehaviorReports,
            EvidenceKind::Screenshots,
            EvidenceKind::Logs,
        ]
    }

    /// Archive stem for this kind.
    pub fn archive_stem(&self) -> &'static str {
        match self {
            EvidenceKind::RenderedReport => "surefire-site",
            EvidenceKind::RawReports => "surefire-reports",
            EvidenceKind::BehaviorReports => "cucumber-reports",
            EvidenceKind::Screenshots => "screenshots",
            EvidenceKind::Logs => "test-logs",
        }
    }

    /// Archive file name for this kind.
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.archive_stem())
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.archive_stem())
    }
}

/// A produced evidence archive.
///
/// Only exists for archives that were actually written and hold at least
/// one entry. The pipeline never deletes the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentBundle {
    /// Location of the archive.
    pub path: PathBuf,
    /// Which evidence the archive holds.
    pub kind: EvidenceKind,
}

impl AttachmentBundle {
    pub fn new(path: impl Into<PathBuf>, kind: EvidenceKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An issue type offered by the tracker for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTypeEntry {
    pub id: String,
    pub name: String,
}

impl IssueTypeEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A ticket the tracker accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiledIssue {
    /// Tracker key (e.g. `QA-123`)
    pub key: String,
    /// Browse URL for humans
    pub url: String,
}

impl FiledIssue {
    /// Build a filed issue whose URL is `base_url + "/browse/" + key`.
    ///
    /// # Example
    ///
    /// ```
    /// use faultline::core::types::FiledIssue;
    ///
    /// let issue = FiledIssue::from_key("https://acme.atlassian.net", "QA-7");
    /// assert_eq!(issue.url, "https://acme.atlassian.net/browse/QA-7");
    /// ```
    pub fn from_key(base_url: &str, key: impl Into<String>) -> Self {
        let key = key.into();
        let url = format!("{}/browse/{}", base_url, key);
        Self { key, url }
    }
}

impl fmt::Display for FiledIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.url)
    }
}
