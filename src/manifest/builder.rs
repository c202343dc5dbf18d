//! Manifest builder: walks a directory tree and hashes every file with an extension.
//!
//! # Partial Failure
//!
//! A file that cannot be stat'ed or hashed, or whose path is not valid UTF-8
//! and so cannot be stored in a manifest, never aborts the scan. The failure is
//! logged with its path, recorded in [`ScrapeReport::skipped`], and the walk
//! moves on to the next entry. Only an invalid scan root is fatal.
//!
//! # Example
//!
//! ```no_run
//! use backdupe::manifest::ManifestBuilder;
//! use backdupe::scanner::{Hasher, WalkerConfig};
//! use std::path::Path;
//!
//! let builder = ManifestBuilder::new(WalkerConfig::default(), Hasher::new());
//! let report = builder.scrape(Path::new("/mnt/backup/photos")).unwrap();
//! for skipped in &report.skipped {
//!     eprintln!("skipped {}: {}", skipped.path.display(), skipped.reason);
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{FileRecord, Manifest, ManifestError};
use crate::progress::{ProgressCallback, PHASE_SCAN};
use crate::scanner::path_utils::{expand_home, file_extension};
use crate::scanner::{Hasher, ScanError, Walker, WalkerConfig};

/// A file the scan could not record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Offending path
    pub path: PathBuf,
    /// Human-readable failure
    pub reason: String,
    /// Whether the failure was the size-related (overflow) class
    pub overflow: bool,
}

impl From<&ScanError> for SkippedFile {
    fn from(err: &ScanError) -> Self {
        Self {
            path: err.path().to_path_buf(),
            reason: err.to_string(),
            overflow: matches!(err, ScanError::Hash(h) if h.is_overflow()),
        }
    }
}

/// Outcome of a directory scan.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// The populated manifest
    pub manifest: Manifest,
    /// Regular files visited, with or without an extension
    pub files_seen: usize,
    /// Files left out because their name has no extension
    pub no_extension: usize,
    /// Files left out because of an error
    pub skipped: Vec<SkippedFile>,
    /// Wall-clock duration of the scan
    pub duration: Duration,
}

impl ScrapeReport {
    fn new(manifest: Manifest) -> Self {
        Self {
            manifest,
            files_seen: 0,
            no_extension: 0,
            skipped: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Whether every file with an extension made it into the manifest.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, err: &ScanError) {
        let skipped = SkippedFile::from(err);
        if skipped.overflow {
            log::warn!("Skipping oversized file: {}", skipped.reason);
        } else {
            log::warn!("Skipping {}: {}", skipped.path.display(), skipped.reason);
        }
        self.skipped.push(skipped);
    }
}

/// Builds manifests by scanning directory trees.
#[derive(Clone, Default)]
pub struct ManifestBuilder {
    walker_config: WalkerConfig,
    hasher: Hasher,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for ManifestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestBuilder")
            .field("walker_config", &self.walker_config)
            .field("hasher", &self.hasher)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl ManifestBuilder {
    /// Create a builder with the given walk settings and hasher.
    #[must_use]
    pub fn new(walker_config: WalkerConfig, hasher: Hasher) -> Self {
        Self {
            walker_config,
            hasher,
            progress: None,
        }
    }

    /// Report per-file progress to `callback`.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Scan `root` recursively and record every file that has an extension.
    ///
    /// # Errors
    ///
    /// - `PathNotFound` if `root` does not exist
    /// - `NotADirectory` if `root` is not a directory
    /// - `Read` if `root` cannot be inspected
    pub fn scrape(&self, root: &Path) -> Result<ScrapeReport, ManifestError> {
        let root = resolve_root(root)?;
        let started = Instant::now();
        log::info!("Scanning {}", root.display());

        let mut report = ScrapeReport::new(Manifest::for_root(root.clone()));
        if let Some(cb) = &self.progress {
            cb.on_phase_start(PHASE_SCAN, 0);
        }

        let walker = Walker::new(&root, self.walker_config.clone());
        for entry in walker.walk() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.skip(&e);
                    continue;
                }
            };

            report.files_seen += 1;
            if let Some(cb) = &self.progress {
                cb.on_progress(report.files_seen, &entry.path.to_string_lossy());
            }

            if entry.path.to_str().is_none() {
                report.skip(&ScanError::NonUtf8Path(entry.path));
                continue;
            }

            let Some(extension) = file_extension(&entry.path) else {
                log::trace!("No extension, not recorded: {}", entry.path.display());
                report.no_extension += 1;
                continue;
            };

            match self.hasher.hash_file(&entry.path) {
                Ok(digest) => {
                    log::debug!(
                        "Adding {} ({} bytes) -> {}",
                        entry.path.display(),
                        entry.size,
                        digest.short()
                    );
                    if let Some(cb) = &self.progress {
                        cb.on_item_completed(entry.size);
                    }
                    report.manifest.insert(FileRecord::new(
                        entry.path,
                        extension,
                        entry.size,
                        digest,
                    ));
                }
                Err(e) => report.skip(&ScanError::Hash(e)),
            }
        }

        report.duration = started.elapsed();
        if let Some(cb) = &self.progress {
            cb.on_phase_end(PHASE_SCAN);
        }

        log::info!(
            "Recorded {} of {} files from {} in {:.2?} ({} skipped, {} without extension)",
            report.manifest.len(),
            report.files_seen,
            root.display(),
            report.duration,
            report.skipped.len(),
            report.no_extension
        );

        Ok(report)
    }
}

/// Expand `~`, check that `root` is a directory, and make it absolute.
fn resolve_root(root: &Path) -> Result<PathBuf, ManifestError> {
    let root = expand_home(root);

    let metadata = fs::metadata(&root).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ManifestError::PathNotFound(root.to_path_buf()),
        _ => ManifestError::Read {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(ManifestError::NotADirectory(root.to_path_buf()));
    }

    let canonical = fs::canonicalize(&root).map_err(|e| ManifestError::Read {
        path: root.to_path_buf(),
        source: e,
    })?;
    if canonical.to_str().is_none() {
        return Err(ManifestError::Read {
            path: canonical,
            source: io::Error::new(io::ErrorKind::InvalidData, "path is not valid UTF-8"),
        });
    }
    Ok(canonical)
}
