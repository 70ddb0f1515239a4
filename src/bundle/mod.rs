//! bundle
//!
//! Packages test evidence into zip archives for upload.
//!
//! # Sources
//!
//! Five sources are bundled independently (see [`ProjectLayout`]):
//! rendered report, raw result files, Cucumber reports, screenshots, and a
//! fixed set of log files. Each produces at most one archive in the holding
//! directory.
//!
//! # Failure policy
//!
//! - A source directory that does not exist produces no archive.
//! - Inside a directory source, a file that cannot be read is skipped and
//!   the rest of the bundle is still written.
//! - A directory source that yields no files produces no archive.
//! - The log bundle is skipped when no log file exists. Once it is being
//!   written, any unreadable log file aborts it.
//!
//! # Entry names
//!
//! Entry names are relative to the source root and always use `/`, so the
//! archives read the same on every platform.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::paths::ProjectLayout;
use crate::core::types::{AttachmentBundle, EvidenceKind};
use crate::ui::output::{self, Verbosity};

/// Extension of plain-text result summaries bundled with the logs.
const TEXT_REPORT_EXTENSION: &str = "txt";

/// Errors from evidence bundling.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("failed to create artifacts directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write archive '{path}': {message}")]
    Archive { path: PathBuf, message: String },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Collects every evidence source for one project.
#[derive(Debug)]
pub struct Bundler<'a> {
    layout: &'a ProjectLayout,
    verbosity: Verbosity,
}

impl<'a> Bundler<'a> {
    pub fn new(layout: &'a ProjectLayout, verbosity: Verbosity) -> Self {
        Self { layout, verbosity }
    }

    /// Produce every archive whose source has content.
    ///
    /// The holding directory is created first. The result lists only the
    /// archives that were actually written, in [`EvidenceKind::all`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if the holding directory cannot be created, an
    /// archive cannot be written, or a listed log file cannot be read.
    pub fn collect(&self) -> Result<Vec<AttachmentBundle>, BundleError> {
        let artifacts_dir = &self.layout.artifacts_dir;
        fs::create_dir_all(artifacts_dir).map_err(|e| BundleError::CreateDir {
            path: artifacts_dir.clone(),
            source: e,
        })?;

        let mut bundles = Vec::new();
        for &kind in EvidenceKind::all() {
            let archive = self.layout.archive_path(kind);
            let entries = match self.layout.evidence_dir(kind) {
                Some(source) => zip_directory(&source, &archive, self.verbosity)?,
                None => zip_files(&self.layout.root, &self.log_files(), &archive)?,
            };

            match entries {
                Some(count) => {
                    output::debug(
                        format!("bundled {} file(s) into {}", count, archive.display()),
                        self.verbosity,
                    );
                    bundles.push(AttachmentBundle::new(archive, kind));
                }
                None => output::debug(format!("no evidence for {}", kind), self.verbosity),
            }
        }
        Ok(bundles)
    }

    /// Log files that exist right now, named ones first.
    pub fn log_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .layout
            .log_files()
            .into_iter()
            .filter(|p| p.exists())
            .collect();

        let reports_dir = self.layout.raw_reports_dir();
        if let Ok(entries) = fs::read_dir(&reports_dir) {
            let mut text_reports: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.is_file()
                        && p.extension()
                            .is_some_and(|ext| ext == TEXT_REPORT_EXTENSION)
                })
                .collect();
            text_reports.sort();
            files.extend(text_reports);
        }
        files
    }
}

/// Zip every regular file under `source` into `archive`.
///
/// Returns the number of entries written, or `None` when no archive was
/// produced (missing source, or nothing readable in it).
pub fn zip_directory(
    source: &Path,
    archive: &Path,
    verbosity: Verbosity,
) -> Result<Option<usize>, BundleError> {
    if !source.is_dir() {
        return Ok(None);
    }

    let mut writer = ArchiveWriter::create(archive)?;
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                output::warn(format!("skipping unreadable entry: {}", e), verbosity);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                output::warn(format!("skipping {}: {}", path.display(), e), verbosity);
                continue;
            }
        };
        let name = entry_name(path.strip_prefix(source).unwrap_or(path));
        writer.add(&name, &data)?;
    }

    writer.finish_non_empty()
}

/// Zip an explicit list of files into `archive`, named relative to `root`.
///
/// Returns `None` without touching the filesystem when `files` is empty.
///
/// # Errors
///
/// Unlike [`zip_directory`], an unreadable file is an error.
pub fn zip_files(
    root: &Path,
    files: &[PathBuf],
    archive: &Path,
) -> Result<Option<usize>, BundleError> {
    if files.is_empty() {
        return Ok(None);
    }

    let mut writer = ArchiveWriter::create(archive)?;
    for path in files {
        let data = fs::read(path).map_err(|e| BundleError::Read {
            path: path.clone(),
            source: e,
        })?;
        let name = entry_name(path.strip_prefix(root).unwrap_or(path));
        writer.add(&name, &data)?;
    }

    writer.finish_non_empty()
}

/// Archive entry name for a relative path, `/`-separated.
///
/// # Example
///
/// ```
/// use faultline::bundle::entry_name;
/// use std::path::Path;
///
/// assert_eq!(entry_name(&Path::new("css").join("site.css")), "css/site.css");
/// ```
pub fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Entries this large need ZIP64 size fields.
fn needs_zip64(len: u64) -> bool {
    len >= u64::from(u32::MAX)
}

/// Thin wrapper that keeps the archive path next to zip errors.
struct ArchiveWriter {
    path: PathBuf,
    zip: ZipWriter<File>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ArchiveWriter {
    fn create(path: &Path) -> Result<Self, BundleError> {
        let file = File::create(path).map_err(|e| BundleError::Archive {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            zip: ZipWriter::new(file),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        })
    }

    fn add(&mut self, name: &str, data: &[u8]) -> Result<(), BundleError> {
        let options = self
            .options
            .large_file(needs_zip64(data.len() as u64));
        self.zip
            .start_file(name, options)
            .map_err(|e| self.error(e))?;
        self.zip.write_all(data).map_err(|e| self.error(e))?;
        self.entries += 1;
        Ok(())
    }

    /// Finish the archive; an archive with no entries is removed.
    fn finish_non_empty(self) -> Result<Option<usize>, BundleError> {
        let Self {
            path, zip, entries, ..
        } = self;
        zip.finish().map_err(|e| BundleError::Archive {
            path: path.clone(),
            message: e.to_string(),
        })?;

        if entries == 0 {
            fs::remove_file(&path).map_err(|e| BundleError::Archive {
                path: path.clone(),
                message: e.to_string(),
            })?;
            return Ok(None);
        }
        Ok(Some(entries))
    }

    fn error(&self, e: impl std::fmt::Display) -> BundleError {
        BundleError::Archive {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }
}
