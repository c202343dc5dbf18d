//! Confirmed deletion of main-side duplicates.
//!
//! # Overview
//!
//! Given a reviewed [`KillList`], removes the main copy of every pair and keeps
//! the backup copy:
//! - Nothing happens unless the user typed the full word `yes`
//! - Each pair is re-checked against the filesystem before removal
//! - Per-file failures are collected and the batch continues
//! - Permanent removal by default, system trash on request
//!
//! # Safety
//!
//! Backup files are never opened for writing, moved or removed. A main copy is
//! only removed while its backup copy is still present and the main file still
//! has the size recorded at scan time.
//!
//! # Example
//!
//! ```no_run
//! use backdupe::actions::delete::{delete_duplicates, Confirmation, DeleteConfig, DeletionOutcome};
//! use backdupe::duplicates::KillList;
//!
//! let kill_list = KillList::default();
//! let confirmation = Confirmation::parse("yes");
//!
//! match delete_duplicates(&kill_list, confirmation, &DeleteConfig::default(), None) {
//!     DeletionOutcome::Declined => println!("Nothing deleted"),
//!     DeletionOutcome::Completed(report) => println!("{}", report.summary()),
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duplicates::{DuplicatePair, KillList};
use crate::progress::{ProgressCallback, PHASE_DELETE};

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0} - try running with elevated privileges")]
    PermissionDenied(PathBuf),

    /// File size differs from the one recorded at scan time.
    #[error("file modified since scan: {0}")]
    Modified(PathBuf),

    /// The retained backup copy is gone, so the main copy is the only one left.
    #[error("backup copy missing: {0}")]
    BackupMissing(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed {
        /// File that could not be trashed
        path: PathBuf,
        /// Message from the platform trash
        message: String,
    },

    /// Permanent removal failed.
    #[error("failed to remove {path}: {source}")]
    RemoveFailed {
        /// File that could not be removed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// File being checked
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Modified(p)
            | Self::BackupMissing(p)
            | Self::TrashFailed { path: p, .. }
            | Self::RemoveFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// The user's answer to the deletion prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The user typed `yes`.
    Confirmed,
    /// Anything else.
    Declined,
}

impl Confirmation {
    /// Interpret a line of user input.
    ///
    /// Only the full word `yes` confirms, ignoring surrounding whitespace and
    /// case. `y`, `ok` and the empty string all decline.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        if input.trim().eq_ignore_ascii_case("yes") {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }

    /// Whether deletion may proceed.
    #[must_use]
    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Configuration for deletion operations.
#[derive(Debug, Clone)]
pub struct DeleteConfig {
    /// Send files to the system trash instead of removing them.
    pub use_trash: bool,
    /// Refuse to remove a main copy whose size changed since the scan.
    pub verify_size: bool,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            use_trash: false,
            verify_size: true,
        }
    }
}

impl DeleteConfig {
    /// Create config for permanent removal.
    #[must_use]
    pub fn permanent() -> Self {
        Self::default()
    }

    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self {
            use_trash: true,
            ..Self::default()
        }
    }

    /// Enable/disable the size check.
    #[must_use]
    pub fn with_verify_size(mut self, verify: bool) -> Self {
        self.verify_size = verify;
        self
    }
}

/// A main copy that was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedFile {
    /// Path that was removed.
    pub path: PathBuf,
    /// Recorded size of the removed file.
    pub size_bytes: u64,
}

/// A main copy that could not be removed.
#[derive(Debug)]
pub struct DeletionFailure {
    /// Main-side path that was kept.
    pub path: PathBuf,
    /// Why it was kept.
    pub error: DeleteError,
}

/// Results of executing a kill list.
#[derive(Debug, Default)]
pub struct DeletionReport {
    /// Removed main copies, in kill-list order.
    pub deleted: Vec<DeletedFile>,
    /// Main copies that were kept because of an error.
    pub failures: Vec<DeletionFailure>,
    /// Sum of recorded sizes of the removed files.
    pub bytes_removed: u64,
    /// Directories holding the retained backup copies.
    pub backup_dirs: BTreeSet<PathBuf>,
}

impl DeletionReport {
    /// Number of removed files.
    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// Number of failed removals.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let freed = bytesize::ByteSize::b(self.bytes_removed);
        if self.all_succeeded() {
            format!("Deleted {} file(s), freed {}", self.deleted_count(), freed)
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.deleted_count(),
                self.failure_count(),
                freed
            )
        }
    }
}

/// What happened when a kill list was presented for deletion.
#[derive(Debug)]
pub enum DeletionOutcome {
    /// The user did not confirm; the filesystem was not touched.
    Declined,
    /// Deletion ran; see the report for per-file results.
    Completed(DeletionReport),
}

impl DeletionOutcome {
    /// The report, if deletion ran.
    #[must_use]
    pub fn report(&self) -> Option<&DeletionReport> {
        match self {
            Self::Declined => None,
            Self::Completed(report) => Some(report),
        }
    }
}

/// Remove the main copy of every pair in `kill_list`.
///
/// With [`Confirmation::Declined`] this returns immediately without any
/// filesystem access. Otherwise pairs are processed in order; a failing pair
/// is recorded in the report and the next pair is attempted.
pub fn delete_duplicates(
    kill_list: &KillList,
    confirmation: Confirmation,
    config: &DeleteConfig,
    callback: Option<&dyn ProgressCallback>,
) -> DeletionOutcome {
    if !confirmation.is_confirmed() {
        log::info!("Deletion declined, {} file(s) kept", kill_list.len());
        return DeletionOutcome::Declined;
    }

    let mut report = DeletionReport {
        backup_dirs: kill_list.backup_dirs(),
        ..DeletionReport::default()
    };

    if let Some(cb) = callback {
        cb.on_phase_start(PHASE_DELETE, kill_list.len());
    }

    for (index, pair) in kill_list.iter().enumerate() {
        if let Some(cb) = callback {
            cb.on_progress(index + 1, &pair.main.path.to_string_lossy());
        }

        match delete_pair(pair, config) {
            Ok(()) => {
                report.bytes_removed += pair.main.size_bytes;
                report.deleted.push(DeletedFile {
                    path: pair.main.path.clone(),
                    size_bytes: pair.main.size_bytes,
                });
                if let Some(cb) = callback {
                    cb.on_item_completed(pair.main.size_bytes);
                }
            }
            Err(error) => {
                log::warn!("Failed to delete {}: {}", pair.main.path.display(), error);
                report.failures.push(DeletionFailure {
                    path: pair.main.path.clone(),
                    error,
                });
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_phase_end(PHASE_DELETE);
    }

    log::info!("{}", report.summary());

    DeletionOutcome::Completed(report)
}

/// Check one pair against the filesystem and remove its main copy.
///
/// # Errors
///
/// - `BackupMissing` if the backup copy is no longer a file
/// - `NotFound` / `PermissionDenied` / `Io` if the main copy cannot be inspected
/// - `Modified` if the main copy's size changed
/// - `TrashFailed` / `RemoveFailed` if the removal itself fails
pub fn delete_pair(pair: &DuplicatePair, config: &DeleteConfig) -> Result<(), DeleteError> {
    let backup = &pair.backup.path;
    match fs::metadata(backup) {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(DeleteError::BackupMissing(backup.clone())),
    }

    let main = &pair.main.path;
    let metadata = fs::symlink_metadata(main).map_err(|e| DeleteError::from_io(main, e))?;
    if !metadata.is_file() {
        return Err(DeleteError::NotFound(main.clone()));
    }

    if config.verify_size && metadata.len() != pair.main.size_bytes {
        log::warn!(
            "File modified since scan: {} (size changed from {} to {})",
            main.display(),
            pair.main.size_bytes,
            metadata.len()
        );
        return Err(DeleteError::Modified(main.clone()));
    }

    if config.use_trash {
        move_to_trash(main)
    } else {
        remove_permanently(main)
    }
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// Returns `TrashFailed` if the platform trash rejects the file.
pub fn move_to_trash(path: &Path) -> Result<(), DeleteError> {
    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {}", path.display());
    Ok(())
}

/// Permanently remove a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// Returns `RemoveFailed` if the file cannot be removed.
pub fn remove_permanently(path: &Path) -> Result<(), DeleteError> {
    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::RemoveFailed {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    log::info!("Permanently deleted: {}", path.display());
    Ok(())
}
