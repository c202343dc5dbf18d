//! JSON output formatter for review results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "pairs": [
//!     {
//!       "digest": "abc123...",
//!       "size_bytes": 1024,
//!       "extension": ".JPG",
//!       "main": "/home/me/Pictures/a.jpg",
//!       "backup": "/mnt/nas/Pictures/a.jpg"
//!     }
//!   ],
//!   "summary": {
//!     "pairs": 1,
//!     "total_bytes": 1024,
//!     "filtered": 0,
//!     "same_path": 0
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicatePair, MatchResult};

/// A single duplicate pair in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonPair {
    /// BLAKE3 digest as hexadecimal string (64 characters)
    pub digest: String,
    /// Size of the main copy in bytes
    pub size_bytes: u64,
    /// Extension of the main copy
    pub extension: String,
    /// Path of the copy that would be deleted
    pub main: String,
    /// Path of the copy that is kept
    pub backup: String,
}

impl From<&DuplicatePair> for JsonPair {
    fn from(pair: &DuplicatePair) -> Self {
        Self {
            digest: pair.digest().to_hex(),
            size_bytes: pair.size_bytes(),
            extension: pair.main.extension.clone(),
            main: pair.main.path.to_string_lossy().into_owned(),
            backup: pair.backup.path.to_string_lossy().into_owned(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of pairs on the kill list
    pub pairs: usize,
    /// Bytes freed if every main copy is deleted
    pub total_bytes: u64,
    /// Shared digests dropped by the extension filters
    pub filtered: usize,
    /// Shared digests dropped because both sides recorded the same path
    pub same_path: usize,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate pairs in review order
    pub pairs: Vec<JsonPair>,
    /// Totals
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build JSON output from a match result.
    #[must_use]
    pub fn new(result: &MatchResult) -> Self {
        Self {
            pairs: result.pairs.iter().map(JsonPair::from).collect(),
            summary: JsonSummary {
                pairs: result.pairs.len(),
                total_bytes: result.total_bytes(),
                filtered: result.filtered,
                same_path: result.same_path,
            },
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}
