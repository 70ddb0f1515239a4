//! tracker::mock
//!
//! Mock tracker implementation for deterministic testing.
//!
//! # Design
//!
//! The mock tracker keeps issues in memory, numbers them `MOCK-1`,
//! `MOCK-2`, ... and records every call so tests can assert on the exact
//! sequence a run produced. A single operation can be configured to fail.
//!
//! # Example
//!
//! ```
//! use faultline::tracker::mock::MockTracker;
//! use faultline::tracker::{CreateIssueRequest, Tracker};
//!
//! # tokio_test::block_on(async {
//! let tracker = MockTracker::new();
//!
//! let issue = tracker.create_issue(CreateIssueRequest {
//!     project_key: "QA".to_string(),
//!     summary: "[Automated Test Failure] A.b".to_string(),
//!     description: String::new(),
//!     issue_type_id: "1".to_string(),
//!     labels: vec![],
//! }).await.unwrap();
//!
//! assert_eq!(issue.key, "MOCK-1");
//! assert_eq!(issue.url, "https://tracker.test/browse/MOCK-1");
//! # });
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{CreateIssueRequest, Tracker, TrackerError};
use crate::core::types::{FiledIssue, IssueTypeEntry};

/// Base URL used for mock browse links.
pub const MOCK_BASE_URL: &str = "https://tracker.test";

/// Mock tracker for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockTracker {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockTrackerInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockTrackerInner {
    /// Issue types returned for every project.
    issue_types: Vec<IssueTypeEntry>,
    /// Created issues, in creation order.
    issues: Vec<(FiledIssue, CreateIssueRequest)>,
    /// Next issue number to assign.
    next_issue_number: u64,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail issue_types with the given error.
    IssueTypes(TrackerError),
    /// Fail create_issue with the given error.
    CreateIssue(TrackerError),
    /// Fail attach_file with the given error.
    AttachFile(TrackerError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    IssueTypes { project_key: String },
    CreateIssue { summary: String, issue_type_id: String },
    AttachFile { issue_key: String, path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    IssueTypes,
    CreateIssue,
    AttachFile,
}

impl MockTracker {
    /// Create a mock tracker offering `Bug`, `Task` and `Story`.
    pub fn new() -> Self {
        Self::with_issue_types(vec![
            IssueTypeEntry::new("10001", "Bug"),
            IssueTypeEntry::new("10002", "Task"),
            IssueTypeEntry::new("10003", "Story"),
        ])
    }

    /// Create a mock tracker offering the given issue types.
    pub fn with_issue_types(issue_types: Vec<IssueTypeEntry>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockTrackerInner {
                issue_types,
                issues: Vec::new(),
                next_issue_number: 1,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use faultline::tracker::mock::{FailOn, MockTracker};
    /// use faultline::tracker::TrackerError;
    ///
    /// let tracker = MockTracker::new()
    ///     .fail_on(FailOn::CreateIssue(TrackerError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Get every created issue with the request that produced it.
    pub fn created(&self) -> Vec<(FiledIssue, CreateIssueRequest)> {
        let inner = self.inner.lock().unwrap();
        inner.issues.clone()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, op: Op) -> Result<(), TrackerError> {
        let inner = self.inner.lock().unwrap();
        match (&inner.fail_on, op) {
            (Some(FailOn::IssueTypes(e)), Op::IssueTypes)
            | (Some(FailOn::CreateIssue(e)), Op::CreateIssue)
            | (Some(FailOn::AttachFile(e)), Op::AttachFile) => Err(e.clone()),
            _ => Ok(()),
        }
    }
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tracker for MockTracker {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn issue_types(&self, project_key: &str) -> Result<Vec<IssueTypeEntry>, TrackerError> {
        self.record(MockOperation::IssueTypes {
            project_key: project_key.to_string(),
        });
        self.check_fail(Op::IssueTypes)?;

        let inner = self.inner.lock().unwrap();
        Ok(inner.issue_types.clone())
    }

    async fn create_issue(&self, request: CreateIssueRequest) -> Result<FiledIssue, TrackerError> {
        self.record(MockOperation::CreateIssue {
            summary: request.summary.clone(),
            issue_type_id: request.issue_type_id.clone(),
        });
        self.check_fail(Op::CreateIssue)?;

        let mut inner = self.inner.lock().unwrap();
        let number = inner.next_issue_number;
        inner.next_issue_number += 1;

        let issue = FiledIssue::from_key(MOCK_BASE_URL, format!("MOCK-{}", number));
        inner.issues.push((issue.clone(), request));
        Ok(issue)
    }

    async fn attach_file(&self, issue_key: &str, path: &Path) -> Result<(), TrackerError> {
        self.record(MockOperation::AttachFile {
            issue_key: issue_key.to_string(),
            path: path.to_path_buf(),
        });
        self.check_fail(Op::AttachFile)?;

        let inner = self.inner.lock().unwrap();
        if inner.issues.iter().any(|(issue, _)| issue.key == issue_key) {
            Ok(())
        } else {
            Err(TrackerError::NotFound(format!("issue {}", issue_key)))
        }
    }
}
