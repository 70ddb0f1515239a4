//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Progress, warnings, banners and the run summary
//!
//! # Design
//!
//! All console output goes through this module so verbosity flags are
//! honored in one place.

pub mod output;
