//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Progress goes to stdout as the run proceeds and respects the quiet flag.
//! Warnings, debug lines and errors go to stderr.

use std::fmt::Display;

use crate::core::types::FiledIssue;

/// Width of section banners.
const BANNER_WIDTH: usize = 80;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    #[default]
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a pre-tagged line such as `[WARNING] ...` to stderr (respects quiet mode).
pub fn notice(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("{}", message);
    }
}

/// Print a section banner (respects quiet mode).
pub fn banner(title: impl Display, verbosity: Verbosity) {
    print(format_banner(title), verbosity);
}

/// Format a section banner: a rule, the title, and another rule.
pub fn format_banner(title: impl Display) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("\n{}\n{}\n{}", rule, title, rule)
}

/// Format the end-of-run table of filed issues.
pub fn format_summary(issues: &[FiledIssue]) -> String {
    let mut out = format_banner("Issues Created");
    if !issues.is_empty() {
        out.push('\n');
        out.push_str(&format_list(issues, "- "));
    }
    out
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}
