//! Content-addressed file manifests.
//!
//! A [`Manifest`] maps a content [`Digest`] to the [`FileRecord`] of the file
//! that produced it. Manifests are built by scanning a directory tree
//! ([`builder`]), persisted and merged by [`store`], grouped per comparison
//! side by [`set`], and consumed read-only by the duplicate matcher.
//!
//! # Key Uniqueness
//!
//! Digests are unique within one manifest. When two files in the same tree
//! have identical content, the one inserted last replaces the earlier one
//! (last-scanned wins). Merging manifests follows the same rule by input order.
//!
//! # Example
//!
//! ```no_run
//! use backdupe::manifest::{store, Manifest};
//! use std::path::Path;
//!
//! let manifest = Manifest::scrape(Path::new("~/Pictures")).unwrap();
//! println!("{} files, {} bytes", manifest.len(), manifest.total_bytes());
//! store::save(&manifest, Path::new("pictures.manifest.json")).unwrap();
//! ```

pub mod builder;
pub mod set;
pub mod store;

use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scanner::Digest;

pub use builder::{ManifestBuilder, ScrapeReport, SkippedFile};
pub use set::ManifestSet;

/// One file in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute path of the file at scan time.
    pub path: PathBuf,
    /// Uppercased extension including the leading dot, e.g. `.JPG`.
    pub extension: String,
    /// File size in bytes at scan time.
    pub size_bytes: u64,
    /// BLAKE3 digest of the full file content.
    pub digest: Digest,
}

impl FileRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(path: PathBuf, extension: impl Into<String>, size_bytes: u64, digest: Digest) -> Self {
        Self {
            path,
            extension: extension.into(),
            size_bytes,
            digest,
        }
    }
}

/// A digest-keyed inventory of files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    records: BTreeMap<Digest, FileRecord>,
    root: Option<PathBuf>,
    created_at: Option<DateTime<Utc>>,
}

impl Manifest {
    /// Create an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty manifest for a scan of `root`, stamped with the current time.
    #[must_use]
    pub fn for_root(root: PathBuf) -> Self {
        Self {
            records: BTreeMap::new(),
            root: Some(root),
            created_at: Some(Utc::now()),
        }
    }

    /// Scan `root` with default settings and return the resulting manifest.
    ///
    /// Files that cannot be hashed are logged and left out.
    ///
    /// # Errors
    ///
    /// Fails only if `root` does not exist or is not a directory.
    pub fn scrape(root: &Path) -> Result<Self, ManifestError> {
        Ok(ManifestBuilder::default().scrape(root)?.manifest)
    }

    /// Insert a record keyed by its digest.
    ///
    /// Returns the record it replaced, if any.
    pub fn insert(&mut self, record: FileRecord) -> Option<FileRecord> {
        let replaced = self.records.insert(record.digest, record);
        if let Some(old) = &replaced {
            log::debug!(
                "Digest {} already recorded for {}, keeping the later file",
                old.digest.short(),
                old.path.display()
            );
        }
        replaced
    }

    /// Look up a record by digest.
    #[must_use]
    pub fn get(&self, digest: &Digest) -> Option<&FileRecord> {
        self.records.get(digest)
    }

    /// Whether a digest is present.
    #[must_use]
    pub fn contains(&self, digest: &Digest) -> bool {
        self.records.contains_key(digest)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the manifest has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in digest order.
    pub fn records(&self) -> btree_map::Values<'_, Digest, FileRecord> {
        self.records.values()
    }

    /// `(digest, record)` pairs in digest order.
    pub fn iter(&self) -> btree_map::Iter<'_, Digest, FileRecord> {
        self.records.iter()
    }

    /// Sum of all record sizes.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.records.values().map(|r| r.size_bytes).sum()
    }

    /// Distinct extensions present in the manifest.
    #[must_use]
    pub fn unique_extensions(&self) -> BTreeSet<&str> {
        self.records.values().map(|r| r.extension.as_str()).collect()
    }

    /// Root directory this manifest was scanned from, if known.
    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// When the scan that produced this manifest started, if known.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub(crate) fn from_parts(
        records: BTreeMap<Digest, FileRecord>,
        root: Option<PathBuf>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            records,
            root,
            created_at,
        }
    }

    pub(crate) fn records_map(&self) -> &BTreeMap<Digest, FileRecord> {
        &self.records
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        BTreeMap<Digest, FileRecord>,
        Option<PathBuf>,
        Option<DateTime<Utc>>,
    ) {
        (self.records, self.root, self.created_at)
    }
}

impl Extend<FileRecord> for Manifest {
    fn extend<I: IntoIterator<Item = FileRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<FileRecord> for Manifest {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut manifest = Self::new();
        manifest.extend(iter);
        manifest
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = (&'a Digest, &'a FileRecord);
    type IntoIter = btree_map::Iter<'a, Digest, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Errors raised while scanning, loading or saving manifests.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// A scan root or manifest file does not exist.
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    /// A scan root is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A manifest file or scan root exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File or directory that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A manifest file is malformed, tampered with, or from an unknown version.
    #[error("corrupt manifest {path}: {reason}")]
    CorruptManifest {
        /// Manifest file
        path: PathBuf,
        /// What failed validation
        reason: String,
    },

    /// A manifest could not be written to its destination.
    #[error("failed to write manifest {path}: {source}")]
    WriteFailed {
        /// Destination that could not be written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PathNotFound(p) | Self::NotADirectory(p) => p,
            Self::Read { path, .. }
            | Self::CorruptManifest { path, .. }
            | Self::WriteFailed { path, .. } => path,
        }
    }
}
