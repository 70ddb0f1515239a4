//! Faultline - file an issue-tracker ticket for every failed test
//!
//! Faultline runs a project's test suite, renders its HTML report, reads the
//! JUnit-style XML results, packages the evidence (reports, screenshots,
//! logs) into zip archives and files one Jira issue per failing test with
//! every archive attached.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses flags, loads config)
//! - [`engine`] - Run lifecycle and external command execution
//! - [`core`] - Domain types, configuration and the fixed project layout
//! - [`report`] - JUnit XML result parsing
//! - [`bundle`] - Evidence archiving
//! - [`tracker`] - Issue tracker abstraction (Jira v1)
//! - [`ui`] - Console output
//!
//! # Run guarantees
//!
//! 1. Configuration is validated before any test runs
//! 2. Tracker requests are issued one at a time, in a fixed order
//! 3. The first failed tracker request ends the run; nothing is retried
//! 4. Missing evidence shrinks the upload set and is never an error

pub mod bundle;
pub mod cli;
pub mod core;
pub mod engine;
pub mod report;
pub mod tracker;
pub mod ui;
