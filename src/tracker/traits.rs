//! tracker::traits
//!
//! Tracker trait definition for filing issues against a remote tracker.
//!
//! # Design
//!
//! The `Tracker` trait is async because every operation is a network call.
//! A run still drives it strictly sequentially: one request in flight at a
//! time, in a fixed order.
//!
//! # Example
//!
//! ```ignore
//! use faultline::tracker::{CreateIssueRequest, Tracker, TrackerError};
//!
//! async fn file(tracker: &dyn Tracker) -> Result<(), TrackerError> {
//!     let issue = tracker.create_issue(CreateIssueRequest {
//!         project_key: "QA".to_string(),
//!         summary: "[Automated Test Failure] LoginTest.invalidPassword".to_string(),
//!         description: "...".to_string(),
//!         issue_type_id: "10004".to_string(),
//!         labels: vec!["automated-test".to_string()],
//!     }).await?;
//!     println!("Filed {}: {}", issue.key, issue.url);
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{FiledIssue, IssueTypeEntry};

/// Errors from tracker operations.
///
/// Every variant is fatal to a run; nothing is retried.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// Credentials rejected or insufficient permissions.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    Protocol(String),

    /// A file to upload could not be read.
    #[error("failed to read attachment '{}': {message}", .path.display())]
    AttachmentRead { path: PathBuf, message: String },

    /// The configured issue type does not exist in the project.
    #[error(
        "issue type '{name}' not found in project '{project}'. Available: {}",
        .available.join(", ")
    )]
    UnknownIssueType {
        name: String,
        project: String,
        available: Vec<String>,
    },
}

/// Request to create an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueRequest {
    /// Project the issue is filed in
    pub project_key: String,
    /// One-line summary
    pub summary: String,
    /// Body in the tracker's markup
    pub description: String,
    /// Resolved issue type id
    pub issue_type_id: String,
    /// Labels to apply
    pub labels: Vec<String>,
}

/// The Tracker trait for filing issues.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`.
///
/// # Error Handling
///
/// All methods return `Result<T, TrackerError>`. Any non-success response
/// is an error; callers abort the run on the first one.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Get the tracker name (e.g., "jira").
    fn name(&self) -> &'static str;

    /// List the issue types valid for a project.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the credentials are rejected
    /// - `Protocol` if the response lacks the project collection
    async fn issue_types(&self, project_key: &str) -> Result<Vec<IssueTypeEntry>, TrackerError>;

    /// Create an issue.
    ///
    /// # Returns
    ///
    /// The new issue's key and browse URL.
    ///
    /// # Errors
    ///
    /// - `ApiError` with status 400 if the tracker rejects a field
    /// - `Protocol` if the response carries no key
    async fn create_issue(&self, request: CreateIssueRequest) -> Result<FiledIssue, TrackerError>;

    /// Upload one file as an attachment of an existing issue.
    ///
    /// # Errors
    ///
    /// - `AttachmentRead` if the file cannot be read
    /// - `NotFound` if the issue does not exist
    async fn attach_file(&self, issue_key: &str, path: &Path) -> Result<(), TrackerError>;
}
