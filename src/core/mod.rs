//! core
//!
//! Core domain types, configuration and path routing for faultline.
//!
//! # Modules
//!
//! - [`types`] - Failure records, evidence bundles, issue types, filed issues
//! - [`config`] - Environment overlay, tracker settings, project settings file
//! - [`paths`] - Centralized evidence and artifact locations
//!
//! # Design Principles
//!
//! - Values are immutable once built
//! - Every fixed location is computed in one place
//! - Configuration fails closed and reports everything missing at once

pub mod config;
pub mod paths;
pub mod types;
