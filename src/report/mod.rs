//! report
//!
//! Reads JUnit-style XML result files and extracts failure records.
//!
//! # Contract
//!
//! - Every `TEST-*.xml` file directly inside the reports directory is parsed,
//!   in file-name order.
//! - Each `testcase` with a `failure` or `error` element yields exactly one
//!   [`FailureRecord`]; `failure` wins when both are present.
//! - Records come out in file order, then document order within a file.
//! - A missing reports directory means no tests ran: the result is empty,
//!   not an error.
//! - A file that cannot be read or parsed is fatal. A corrupt report means
//!   the test run itself is broken.
//!
//! # Example
//!
//! ```no_run
//! use faultline::report::parse_failures;
//! use std::path::Path;
//!
//! let failures = parse_failures(Path::new("target/surefire-reports")).unwrap();
//! for failure in &failures {
//!     println!("{}: {}", failure.test_name, failure.message);
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node, ParsingOptions};
use thiserror::Error;

use crate::core::types::FailureRecord;

/// Result files carry this prefix.
const REPORT_PREFIX: &str = "TEST-";

/// Result files carry this extension.
const REPORT_EXTENSION: &str = "xml";

/// Errors from report parsing.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to list report directory '{path}': {source}")]
    ListError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read report '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed report '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Parse every result file in `dir` and collect failures.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or any result file
/// cannot be read or parsed.
pub fn parse_failures(dir: &Path) -> Result<Vec<FailureRecord>, ReportError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut failures = Vec::new();
    for path in report_files(dir)? {
        let contents = fs::read_to_string(&path).map_err(|e| ReportError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        failures.extend(parse_report(&contents).map_err(|message| ReportError::ParseError {
            path: path.clone(),
            message,
        })?);
    }
    Ok(failures)
}

/// List result files in `dir`, sorted by file name.
fn report_files(dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    let list_err = |e: std::io::Error| ReportError::ListError {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let path = entry.map_err(list_err)?.path();
        if is_report_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_report_file(path: &Path) -> bool {
    let name_matches = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(REPORT_PREFIX));
    let ext_matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == REPORT_EXTENSION);
    name_matches && ext_matches && path.is_file()
}

/// Extract failures from one result document.
///
/// Returns the parser's message on malformed XML.
pub fn parse_report(xml: &str) -> Result<Vec<FailureRecord>, String> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options).map_err(|e| e.to_string())?;

    let failures = doc
        .descendants()
        .filter(|n| n.has_tag_name("testcase"))
        .filter_map(|case| {
            let marker =
                first_descendant(case, "failure").or_else(|| first_descendant(case, "error"))?;
            let details = text_content(marker);
            Some(FailureRecord::new(
                case.attribute("classname").unwrap_or(""),
                case.attribute("name").unwrap_or(""),
                case.attribute("time").unwrap_or(""),
                marker.attribute("message"),
                Some(details.as_str()),
            ))
        })
        .collect();

    Ok(failures)
}

fn first_descendant<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .find(|n| n.is_element() && n.has_tag_name(tag))
}

/// All text below `node`, CDATA included, in document order.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
