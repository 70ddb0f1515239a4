//! tracker::filing
//!
//! Tracker-agnostic steps of filing a failure: resolving the issue type,
//! building the create request and uploading evidence.
//!
//! # Contract
//!
//! - Issue type names match case-insensitively; the first match in tracker
//!   order wins.
//! - Attachments are uploaded one at a time in bundle order. Bundles whose
//!   file has disappeared are skipped; any upload error aborts.

use super::description::build_description;
use super::traits::{CreateIssueRequest, Tracker, TrackerError};
use crate::core::types::{AttachmentBundle, FailureRecord, FiledIssue, IssueTypeEntry};
use crate::ui::output::{self, Verbosity};

/// Summary prefix for every filed issue.
pub const SUMMARY_PREFIX: &str = "[Automated Test Failure] ";

/// Find the id of the issue type called `name` among `types`.
///
/// # Errors
///
/// `UnknownIssueType` listing every available name when nothing matches.
pub fn match_issue_type(
    types: &[IssueTypeEntry],
    project_key: &str,
    name: &str,
) -> Result<String, TrackerError> {
    let wanted = name.trim().to_lowercase();
    types
        .iter()
        .find(|t| t.name.to_lowercase() == wanted)
        .map(|t| t.id.clone())
        .ok_or_else(|| TrackerError::UnknownIssueType {
            name: name.to_string(),
            project: project_key.to_string(),
            available: types.iter().map(|t| t.name.clone()).collect(),
        })
}

/// Look up the issue types for `project_key` and resolve `name` to an id.
pub async fn resolve_issue_type(
    tracker: &dyn Tracker,
    project_key: &str,
    name: &str,
) -> Result<String, TrackerError> {
    let types = tracker.issue_types(project_key).await?;
    match_issue_type(&types, project_key, name)
}

/// Build the create request for one failure.
pub fn build_request(
    failure: &FailureRecord,
    project_key: &str,
    issue_type_id: &str,
    labels: &[String],
    timestamp: &str,
) -> CreateIssueRequest {
    CreateIssueRequest {
        project_key: project_key.to_string(),
        summary: format!("{}{}", SUMMARY_PREFIX, failure.test_name),
        description: build_description(failure, timestamp),
        issue_type_id: issue_type_id.to_string(),
        labels: labels.to_vec(),
    }
}

/// Upload every bundle that still exists to `issue_key`.
///
/// Returns the number of files uploaded.
pub async fn attach_bundles(
    tracker: &dyn Tracker,
    issue_key: &str,
    bundles: &[AttachmentBundle],
    verbosity: Verbosity,
) -> Result<usize, TrackerError> {
    let mut uploaded = 0;
    for bundle in bundles {
        if !bundle.path().is_file() {
            output::debug(
                format!("skipping missing attachment {}", bundle.path().display()),
                verbosity,
            );
            continue;
        }
        output::debug(
            format!("attaching {} to {}", bundle.path().display(), issue_key),
            verbosity,
        );
        tracker.attach_file(issue_key, bundle.path()).await?;
        uploaded += 1;
    }
    Ok(uploaded)
}

/// Create the issue for one failure and attach the bundles to it.
pub async fn file_failure(
    tracker: &dyn Tracker,
    request: CreateIssueRequest,
    bundles: &[AttachmentBundle],
    verbosity: Verbosity,
) -> Result<FiledIssue, TrackerError> {
    let issue = tracker.create_issue(request).await?;
    attach_bundles(tracker, &issue.key, bundles, verbosity).await?;
    Ok(issue)
}
