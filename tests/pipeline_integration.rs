//! End-to-end pipeline tests.
//!
//! Each test lays out a throwaway project directory, runs the full
//! pipeline against `MockTracker`, and checks what was filed and uploaded.
//! Test and report commands are small `sh` scripts, so these tests are
//! Unix-only.

#![cfg(unix)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use faultline::core::paths::ProjectLayout;
use faultline::core::types::EvidenceKind;
use faultline::engine::{run, RunError, RunOptions};
use faultline::tracker::mock::{FailOn, MockOperation, MockTracker};
use faultline::tracker::TrackerError;
use faultline::ui::output::Verbosity;

fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

fn options(root: &Path, test_script: &str) -> RunOptions {
    RunOptions {
        layout: ProjectLayout::new(root),
        test_command: sh(test_script),
        report_command: sh("exit 0"),
        project_key: "QA".to_string(),
        issue_type_name: "Bug".to_string(),
        labels: vec!["automated-test".to_string()],
        skip_tests: false,
        verbosity: Verbosity::Quiet,
    }
}

fn write_report(root: &Path, name: &str, xml: &str) {
    let dir = root.join("target/surefire-reports");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), xml).unwrap();
}

const PASSING: &str = r#"<testsuite name="LoginTest" tests="2" failures="0">
  <testcase classname="LoginTest" name="validLogin" time="0.5"/>
  <testcase classname="LoginTest" name="logout" time="0.2"/>
</testsuite>"#;

const ONE_FAILURE: &str = r#"<testsuite name="LoginTest" tests="2" failures="1">
  <testcase classname="LoginTest" name="validLogin" time="0.5"/>
  <testcase classname="LoginTest" name="invalidPassword" time="1.25">
    <failure message="assertion failed">trace...</failure>
  </testcase>
</testsuite>"#;

#[tokio::test]
async fn no_failures_files_nothing_and_keeps_test_exit_code() {
    let temp = TempDir::new().unwrap();
    write_report(temp.path(), "TEST-LoginTest.xml", PASSING);

    let tracker = MockTracker::new();
    let outcome = run(&tracker, &options(temp.path(), "exit 3"))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 3);
    assert_eq!(outcome.failures, 0);
    assert!(outcome.filed.is_empty());
    assert!(tracker.created().is_empty());
    assert!(!temp.path().join("jira_artifacts").exists());
}

#[tokio::test]
async fn one_failure_files_one_issue() {
    let temp = TempDir::new().unwrap();
    write_report(temp.path(), "TEST-LoginTest.xml", ONE_FAILURE);

    let tracker = MockTracker::new();
    let outcome = run(&tracker, &options(temp.path(), "exit 1"))
        .await
        .unwrap();

    assert_eq!(outcome.exit_code, 1);
    assert_eq!(outcome.filed.len(), 1);

    let created = tracker.created();
    assert_eq!(created.len(), 1);
    let (issue, request) = &created[0];
    assert_eq!(issue.url, "https://tracker.test/browse/MOCK-1");
    assert_eq!(
        request.summary,
        "[Automated Test Failure] LoginTest.invalidPassword"
    );
    assert_eq!(request.issue_type_id, "10001");
    assert_eq!(request.labels, vec!["automated-test".to_string()]);
    assert!(request
        .description
        .contains("*Error Message:*\n{code}\nassertion failed\n{code}"));
    assert!(request
        .description
        .contains("*Stack Trace:*\n{code}\ntrace...\n{code}"));
    assert!(request.description.contains("*Duration:* 1.25s"));
}

#[tokio::test]
async fn only_raw_reports_bundled_without_other_evidence() {
    let temp = TempDir::new().unwrap();
    write_report(temp.path(), "TEST-LoginTest.xml", ONE_FAILURE);

    let tracker = MockTracker::new();
    let outcome = run(&tracker, &options(temp.path(), "exit 1"))
        .await
        .unwrap();

    // Only the raw reports directory exists, so it is the only bundle.
    let kinds: Vec<EvidenceKind> = outcome.bundles.iter().map(|b| b.kind).collect();
    assert_eq!(kinds, vec![EvidenceKind::RawReports]);
    assert_eq!(outcome.filed.len(), 1);
}

#[tokio::test]
async fn every_issue_gets_every_bundle_in_order() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write_report(root, "TEST-LoginTest.xml", ONE_FAILURE);
    write_report(
        root,
        "TEST-CartTest.xml",
        r#"<testsuite><testcase classname="CartTest" name="checkout"><error message="boom"/></testcase></testsuite>"#,
    );
    fs::create_dir_all(root.join("target/screenshots")).unwrap();
    fs::write(root.join("target/screenshots/checkout.png"), b"png").unwrap();
    fs::write(root.join("selenium.log"), "driver started").unwrap();

    let tracker = MockTracker::new();
    let outcome = run(&tracker, &options(root, "exit 1")).await.unwrap();

    let kinds: Vec<EvidenceKind> = outcome.bundles.iter().map(|b| b.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EvidenceKind::RawReports,
            EvidenceKind::Screenshots,
            EvidenceKind::Logs
        ]
    );

    // Files are read in name order: CartTest before LoginTest.
    let summaries: Vec<String> = tracker
        .created()
        .into_iter()
        .map(|(_, r)| r.summary)
        .collect();
    assert_eq!(
        summaries,
        vec![
            "[Automated Test Failure] CartTest.checkout",
            "[Automated Test Failure] LoginTest.invalidPassword"
        ]
    );

    let uploads: Vec<(String, String)> = tracker
        .operations()
        .into_iter()
        .filter_map(|op| match op {
            MockOperation::AttachFile { issue_key, path } => Some((
                issue_key,
                path.file_name().unwrap().to_string_lossy().into_owned(),
            )),
            _ => None,
        })
        .collect();
    let expected: Vec<(String, String)> = ["MOCK-1", "MOCK-2"]
        .iter()
        .flat_map(|key| {
            ["surefire-reports.zip", "screenshots.zip", "test-logs.zip"]
                .iter()
                .map(move |name| (key.to_string(), name.to_string()))
        })
        .collect();
    assert_eq!(uploads, expected);

    // Archives stay on disk after the run.
    assert!(root.join("jira_artifacts/test-logs.zip").is_file());
}

#[tokio::test]
async fn attachment_failure_aborts_remaining_filing() {
    let temp = TempDir::new().unwrap();
    write_report(temp.path(), "TEST-LoginTest.xml", ONE_FAILURE);
    write_report(
        temp.path(),
        "TEST-CartTest.xml",
        r#"<testsuite><testcase classname="CartTest" name="checkout"><failure/></testcase></testsuite>"#,
    );

    let tracker = MockTracker::new().fail_on(FailOn::AttachFile(TrackerError::ApiError {
        status: 413,
        message: "attachment too large".to_string(),
    }));
    let err = run(&tracker, &options(temp.path(), "exit 1"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RunError::Tracker(TrackerError::ApiError { status: 413, .. })
    ));
    assert_eq!(tracker.created().len(), 1);
}

#[tokio::test]
async fn test_command_that_cannot_start_is_fatal() {
    let temp = TempDir::new().unwrap();
    let mut opts = options(temp.path(), "exit 0");
    opts.test_command = vec!["faultline-no-such-runner".to_string()];

    let err = run(&MockTracker::new(), &opts).await.unwrap_err();
    assert!(matches!(err, RunError::Exec(_)));
}

#[tokio::test]
async fn report_command_that_cannot_start_is_a_warning() {
    let temp = TempDir::new().unwrap();
    let mut opts = options(temp.path(), "exit 0");
    opts.report_command = vec!["faultline-no-such-renderer".to_string()];

    let outcome = run(&MockTracker::new(), &opts).await.unwrap();
    assert!(outcome.report_failed);
    assert_eq!(outcome.exit_code, 0);
}

#[tokio::test]
async fn skipped_tests_do_not_run_the_test_command() {
    let temp = TempDir::new().unwrap();
    let mut opts = options(temp.path(), "touch ran-tests");
    opts.skip_tests = true;

    let outcome = run(&MockTracker::new(), &opts).await.unwrap();
    assert_eq!(outcome.exit_code, 0);
    assert!(!temp.path().join("ran-tests").exists());
}

#[tokio::test]
async fn corrupt_report_is_fatal() {
    let temp = TempDir::new().unwrap();
    write_report(temp.path(), "TEST-Broken.xml", "<testsuite><testcase>");

    let tracker = MockTracker::new();
    let err = run(&tracker, &options(temp.path(), "exit 1"))
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Report(_)));
    assert!(tracker.created().is_empty());
}
