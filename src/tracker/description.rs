//! tracker::description
//!
//! Renders the issue body for a failed test in Jira wiki markup.

use chrono::Local;

use crate::core::types::FailureRecord;

/// Timestamp layout used in issue bodies.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Build the issue description for one failure.
///
/// The layout is fixed: test facts, the message and stack trace in code
/// blocks, then the evidence list and environment notes.
pub fn build_description(failure: &FailureRecord, timestamp: &str) -> String {
    format!(
        "*Automated Test Failure Report*\n\
         \n\
         *Test Name:* {name}\n\
         *Duration:* {duration}s\n\
         *Timestamp:* {timestamp}\n\
         \n\
         ----\n\
         \n\
         *Error Message:*\n\
         {{code}}\n\
         {message}\n\
         {{code}}\n\
         \n\
         *Stack Trace:*\n\
         {{code}}\n\
         {details}\n\
         {{code}}\n\
         \n\
         ----\n\
         \n\
         *Reports:*\n\
         - Surefire HTML report (target/site)\n\
         - Surefire XML and TXT reports (target/surefire-reports)\n\
         - Cucumber HTML and JSON reports (target/cucumber-reports)\n\
         - Screenshots on failure (target/screenshots)\n\
         - Test logs (selenium.log, test_output.txt, chromedriver.log when available)\n\
         \n\
         *Environment:*\n\
         - Framework: Selenium + Cucumber + JUnit (Maven)\n\
         - Project: selenium-and-cucumber-saucelabs_web\n\
         - Browser: Chrome (incognito/headless)\n",
        name = failure.test_name,
        duration = failure.duration,
        timestamp = timestamp,
        message = failure.message,
        details = failure.details,
    )
}
