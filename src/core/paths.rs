//! core::paths
//!
//! Centralized path routing for evidence and artifact locations.
//!
//! # Layout
//!
//! Everything is resolved against the project root (the directory the run
//! starts in, or `--cwd`):
//! - `target/site` - rendered HTML report
//! - `target/surefire-reports` - raw XML/TXT result files
//! - `target/cucumber-reports` - Cucumber HTML/JSON reports
//! - `target/screenshots` - screenshots on failure
//! - `selenium.log`, `test_output.txt`, `target/chromedriver.log` - logs
//! - `jira_artifacts/` - holding directory for produced archives
//!
//! **Rule:** no other module joins these names by hand. Everything goes
//! through [`ProjectLayout`].
//!
//! # Example
//!
//! ```
//! use faultline::core::paths::ProjectLayout;
//! use std::path::PathBuf;
//!
//! let layout = ProjectLayout::new("/work/shop");
//! assert_eq!(
//!     layout.raw_reports_dir(),
//!     PathBuf::from("/work/shop/target/surefire-reports")
//! );
//! ```

use std::path::{Path, PathBuf};

use super::types::EvidenceKind;

/// Default holding directory for produced archives.
pub const DEFAULT_ARTIFACTS_DIR: &str = "jira_artifacts";

/// Fixed evidence and artifact locations for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Project root every other path hangs off.
    pub root: PathBuf,
    /// Holding directory for produced archives.
    pub artifacts_dir: PathBuf,
}

impl ProjectLayout {
    /// Layout rooted at `root` with the default artifacts directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let artifacts_dir = root.join(DEFAULT_ARTIFACTS_DIR);
        Self {
            root,
            artifacts_dir,
        }
    }

    /// Override the holding directory (relative paths resolve against root).
    pub fn with_artifacts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.artifacts_dir = self.root.join(dir);
        self
    }

    /// Build output directory.
    pub fn target_dir(&self) -> PathBuf {
        self.root.join("target")
    }

    /// Rendered HTML report directory.
    pub fn site_dir(&self) -> PathBuf {
        self.target_dir().join("site")
    }

    /// Raw structured result files (`TEST-*.xml`, `*.txt`).
    pub fn raw_reports_dir(&self) -> PathBuf {
        self.target_dir().join("surefire-reports")
    }

    /// Behavioral-test reports.
    pub fn behavior_reports_dir(&self) -> PathBuf {
        self.target_dir().join("cucumber-reports")
    }

    /// Screenshots captured on failure.
    pub fn screenshots_dir(&self) -> PathBuf {
        self.target_dir().join("screenshots")
    }

    /// Named log files that may exist after a run, in bundling order.
    ///
    /// `*.txt` files under [`raw_reports_dir`](Self::raw_reports_dir) are
    /// discovered separately by the bundler.
    pub fn log_files(&self) -> Vec<PathBuf> {
        vec![
            self.root.join("selenium.log"),
            self.root.join("test_output.txt"),
            self.target_dir().join("chromedriver.log"),
        ]
    }

    /// Source directory for a directory-based evidence kind.
    ///
    /// Returns `None` for [`EvidenceKind::Logs`], which is file-based.
    pub fn evidence_dir(&self, kind: EvidenceKind) -> Option<PathBuf> {
        match kind {
            EvidenceKind::RenderedReport => Some(self.site_dir()),
            EvidenceKind::RawReports => Some(self.raw_reports_dir()),
            EvidenceKind::BehaviorReports => Some(self.behavior_reports_dir()),
            EvidenceKind::Screenshots => Some(self.screenshots_dir()),
            EvidenceKind::Logs => None,
        }
    }

    /// Archive path for an evidence kind.
    pub fn archive_path(&self, kind: EvidenceKind) -> PathBuf {
        self.artifacts_dir.join(kind.archive_name())
    }

    /// Environment overlay file.
    pub fn env_file(&self) -> PathBuf {
        self.root.join(".env")
    }
}
