//! Persistence and merging of manifests.
//!
//! # File Format
//!
//! Manifests are stored as pretty-printed JSON wrapped in an envelope that
//! carries a SHA256 checksum of the compact serialization of the payload:
//!
//! ```json
//! {
//!   "checksum": "9f2c...",
//!   "manifest": {
//!     "version": 1,
//!     "created_at": "2026-10-19T08:00:00Z",
//!     "root": "/home/user/Pictures",
//!     "records": {
//!       "<64 hex digest>": {
//!         "path": "/home/user/Pictures/a.jpg",
//!         "extension": ".JPG",
//!         "size_bytes": 1024,
//!         "digest": "<64 hex digest>"
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Loading verifies the checksum, the version, and that every record's digest
//! matches its key. Any failure rejects the whole file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use tempfile::NamedTempFile;

use super::{FileRecord, Manifest, ManifestError};
use crate::scanner::path_utils::expand_home;
use crate::scanner::Digest;

/// Current version of the manifest file format.
pub const MANIFEST_VERSION: u32 = 1;

/// Serialized manifest payload.
#[derive(Debug, Serialize, Deserialize)]
struct ManifestData {
    version: u32,
    created_at: Option<DateTime<Utc>>,
    root: Option<PathBuf>,
    records: BTreeMap<Digest, FileRecord>,
}

/// Envelope for manifest files to include an integrity check.
#[derive(Debug, Serialize, Deserialize)]
struct ManifestEnvelope {
    /// SHA256 checksum of the compact JSON of `manifest`.
    checksum: String,
    manifest: ManifestData,
}

fn checksum_of(data: &ManifestData) -> serde_json::Result<String> {
    let compact = serde_json::to_string(data)?;
    let mut hasher = Sha256::new();
    hasher.update(compact.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Serialize a manifest to its JSON envelope.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(manifest: &Manifest) -> serde_json::Result<String> {
    let data = ManifestData {
        version: MANIFEST_VERSION,
        created_at: manifest.created_at(),
        root: manifest.root().map(Path::to_path_buf),
        records: manifest.records_map().clone(),
    };
    let envelope = ManifestEnvelope {
        checksum: checksum_of(&data)?,
        manifest: data,
    };
    serde_json::to_string_pretty(&envelope)
}

/// Parse a manifest from its JSON envelope.
///
/// `source` is only used to label errors.
///
/// # Errors
///
/// Returns `CorruptManifest` for any parse or validation failure.
pub fn from_json(json: &str, source: &Path) -> Result<Manifest, ManifestError> {
    let corrupt = |reason: String| ManifestError::CorruptManifest {
        path: source.to_path_buf(),
        reason,
    };

    let envelope: ManifestEnvelope =
        serde_json::from_str(json).map_err(|e| corrupt(format!("unreadable JSON: {e}")))?;

    let calculated = checksum_of(&envelope.manifest)
        .map_err(|e| corrupt(format!("failed to re-serialize for checksum: {e}")))?;
    if calculated != envelope.checksum {
        return Err(corrupt("checksum mismatch".to_string()));
    }

    let data = envelope.manifest;
    if data.version != MANIFEST_VERSION {
        return Err(corrupt(format!(
            "unsupported version {} (expected {})",
            data.version, MANIFEST_VERSION
        )));
    }

    if let Some((key, record)) = data.records.iter().find(|(k, r)| **k != r.digest) {
        return Err(corrupt(format!(
            "record {} is keyed under {}",
            record.path.display(),
            key
        )));
    }

    Ok(Manifest::from_parts(data.records, data.root, data.created_at))
}

/// Save a manifest to `destination`.
///
/// The manifest is written to a uniquely named temporary file in the same
/// directory and persisted over `destination`, so a failed save never leaves
/// a truncated manifest and never touches other files in that directory.
///
/// # Errors
///
/// Returns `WriteFailed` if any step fails.
pub fn save(manifest: &Manifest, destination: &Path) -> Result<(), ManifestError> {
    let destination = expand_home(destination);
    let write_failed = |source: io::Error| {
        log::error!(
            "Failed to save manifest to {}: {}",
            destination.display(),
            source
        );
        ManifestError::WriteFailed {
            path: destination.to_path_buf(),
            source,
        }
    };

    let json = to_json(manifest).map_err(|e| write_failed(io::Error::other(e)))?;

    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(parent).map_err(write_failed)?;
    temp.write_all(json.as_bytes()).map_err(write_failed)?;
    temp.as_file().sync_all().map_err(write_failed)?;
    temp.persist(&*destination).map_err(|e| write_failed(e.error))?;

    log::info!(
        "Saved manifest with {} records to {}",
        manifest.len(),
        destination.display()
    );
    Ok(())
}

/// Load a manifest from `source`.
///
/// # Errors
///
/// - `PathNotFound` if `source` does not exist
/// - `Read` if it cannot be read
/// - `CorruptManifest` if its content fails validation
pub fn load(source: &Path) -> Result<Manifest, ManifestError> {
    let source = expand_home(source);
    let content = fs::read_to_string(&source).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ManifestError::PathNotFound(source.to_path_buf()),
        io::ErrorKind::InvalidData => ManifestError::CorruptManifest {
            path: source.to_path_buf(),
            reason: "not valid UTF-8".to_string(),
        },
        _ => ManifestError::Read {
            path: source.to_path_buf(),
            source: e,
        },
    })?;

    let manifest = from_json(&content, &source)?;
    log::debug!(
        "Loaded manifest {} ({} records)",
        source.display(),
        manifest.len()
    );
    Ok(manifest)
}

/// Merge manifests into one digest-keyed table.
///
/// Later manifests overwrite earlier ones on digest collision. The merged
/// manifest carries no root or timestamp.
#[must_use]
pub fn merge<I>(manifests: I) -> Manifest
where
    I: IntoIterator<Item = Manifest>,
{
    let mut merged = Manifest::new();
    for manifest in manifests {
        let (records, _, _) = manifest.into_parts();
        merged.extend(records.into_values());
    }
    merged
}

/// Load every manifest in `sources`, in order, and merge them.
///
/// # Errors
///
/// Stops at the first manifest that fails to load; no partial result is returned.
pub fn load_merged<P: AsRef<Path>>(sources: &[P]) -> Result<Manifest, ManifestError> {
    let manifests = sources
        .iter()
        .map(|p| load(p.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge(manifests))
}
