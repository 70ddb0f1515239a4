//! tracker
//!
//! Issue tracker integration.
//!
//! # Modules
//!
//! - [`traits`] - The `Tracker` trait, request type and `TrackerError`
//! - [`jira`] - Jira REST v2 client
//! - [`mock`] - In-memory tracker for tests
//! - [`description`] - Issue body rendering
//! - [`filing`] - Issue type resolution, request building and uploads

pub mod description;
pub mod filing;
pub mod jira;
pub mod mock;
pub mod traits;

pub use filing::{
    attach_bundles, build_request, file_failure, match_issue_type, resolve_issue_type,
};
pub use jira::JiraTracker;
pub use traits::{CreateIssueRequest, Tracker, TrackerError};
