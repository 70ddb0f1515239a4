//! engine::runner
//!
//! Drives one reporting run from start to exit code.
//!
//! # Lifecycle
//!
//! ```text
//! ResolveIssueType -> RunTests -> RenderReport -> ParseFailures
//!     -> [none: exit with test code]
//!     -> CollectArtifacts -> (CreateIssue -> AttachFiles)* -> Summary -> exit
//! ```
//!
//! Configuration is loaded by the caller before the run starts, so a bad
//! setup fails before any test executes. Every step is sequential and the
//! first fatal error ends the run.
//!
//! # Exit code
//!
//! The test command's own exit code, except that a run with tests skipped
//! that still finds failures (stale reports) exits with 1. A failed report
//! render only produces a warning.

use thiserror::Error;

use super::exec::{self, ExecError};
use crate::bundle::{BundleError, Bundler};
use crate::core::paths::ProjectLayout;
use crate::core::types::{AttachmentBundle, FiledIssue};
use crate::report::{self, ReportError};
use crate::tracker::description::timestamp_now;
use crate::tracker::{build_request, file_failure, resolve_issue_type, Tracker, TrackerError};
use crate::ui::output::{self, Verbosity};

/// Banner shown before the test command.
pub const TESTS_TITLE: &str = "Running Tests";

/// Banner shown before the report command.
pub const REPORT_TITLE: &str = "Generating HTML Report";

/// Warning printed when the report command fails.
pub const REPORT_WARNING: &str = "[WARNING] HTML report generation failed.";

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("test command failed: {0}")]
    Exec(#[from] ExecError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Bundle(#[from] BundleError),
}

/// Everything a run needs besides the tracker.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Where reports, evidence and archives live.
    pub layout: ProjectLayout,
    /// Test command, program first.
    pub test_command: Vec<String>,
    /// Report render command, program first.
    pub report_command: Vec<String>,
    /// Project issues are filed in.
    pub project_key: String,
    /// Issue type display name to resolve.
    pub issue_type_name: String,
    /// Labels applied to every issue.
    pub labels: Vec<String>,
    /// Do not run the test command; use the reports already on disk.
    pub skip_tests: bool,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Process exit code to use.
    pub exit_code: i32,
    /// Number of failures found in the reports.
    pub failures: usize,
    /// Issues filed, in creation order.
    pub filed: Vec<FiledIssue>,
    /// Archives produced for upload.
    pub bundles: Vec<AttachmentBundle>,
    /// Whether the report command exited non-zero or could not start.
    pub report_failed: bool,
}

/// Choose the process exit code.
pub fn exit_code_for(test_exit: i32, skip_tests: bool, failures_found: bool) -> i32 {
    if skip_tests && failures_found {
        1
    } else {
        test_exit
    }
}

/// Execute a full run against `tracker`.
///
/// # Errors
///
/// Returns the first fatal error: issue type resolution, a test command
/// that cannot start, a corrupt report, an archive that cannot be written,
/// or any tracker request that fails.
pub async fn run(tracker: &dyn Tracker, options: &RunOptions) -> Result<RunOutcome, RunError> {
    let verbosity = options.verbosity;
    let root = &options.layout.root;

    let issue_type_id =
        resolve_issue_type(tracker, &options.project_key, &options.issue_type_name).await?;
    output::debug(
        format!(
            "issue type '{}' resolved to id {} on {}",
            options.issue_type_name,
            issue_type_id,
            tracker.name()
        ),
        verbosity,
    );

    let test_exit = if options.skip_tests {
        output::debug("skipping test command", verbosity);
        0
    } else {
        exec::run_step(TESTS_TITLE, &options.test_command, root, verbosity)?
    };

    let report_failed = match exec::run_step(REPORT_TITLE, &options.report_command, root, verbosity)
    {
        Ok(code) => code != 0,
        Err(e) => {
            output::debug(e, verbosity);
            true
        }
    };

    let failures = report::parse_failures(&options.layout.raw_reports_dir())?;
    if failures.is_empty() {
        output::print("\n[OK] All tests passed. No issues created.", verbosity);
        if report_failed {
            output::notice(REPORT_WARNING, verbosity);
        }
        return Ok(RunOutcome {
            exit_code: test_exit,
            failures: 0,
            filed: Vec::new(),
            bundles: Vec::new(),
            report_failed,
        });
    }
    output::debug(format!("{} failure(s) found", failures.len()), verbosity);

    let bundles = Bundler::new(&options.layout, verbosity).collect()?;

    let mut filed = Vec::with_capacity(failures.len());
    for failure in &failures {
        output::print(
            format!("\n[INFO] Creating issue for: {}", failure.test_name),
            verbosity,
        );
        let request = build_request(
            failure,
            &options.project_key,
            &issue_type_id,
            &options.labels,
            &timestamp_now(),
        );
        let issue = file_failure(tracker, request, &bundles, verbosity).await?;
        output::print(
            format!("[OK] Issue created: {} - {}", issue.key, issue.url),
            verbosity,
        );
        filed.push(issue);
    }

    output::print(output::format_summary(&filed), verbosity);
    if report_failed {
        output::notice(REPORT_WARNING, verbosity);
    }

    Ok(RunOutcome {
        exit_code: exit_code_for(test_exit, options.skip_tests, true),
        failures: failures.len(),
        filed,
        bundles,
        report_failed,
    })
}
