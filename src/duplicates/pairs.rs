//! Duplicate pairs and the kill list built from them.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::manifest::FileRecord;
use crate::scanner::path_utils::{display_name, parent_dir};
use crate::scanner::Digest;

/// A main-side file and a backup-side file with identical content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    /// Record from the main side (the copy that would be deleted)
    pub main: FileRecord,
    /// Record from the backup side (the copy that is always kept)
    pub backup: FileRecord,
}

impl DuplicatePair {
    /// Pair two records.
    ///
    /// Callers are expected to pass records with the same digest.
    #[must_use]
    pub fn new(main: FileRecord, backup: FileRecord) -> Self {
        debug_assert_eq!(main.digest, backup.digest);
        Self { main, backup }
    }

    /// Shared content digest.
    #[must_use]
    pub fn digest(&self) -> &Digest {
        &self.main.digest
    }

    /// Bytes freed by deleting the main copy.
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.main.size_bytes
    }

    /// File name of the main copy.
    #[must_use]
    pub fn main_name(&self) -> Cow<'_, str> {
        display_name(&self.main.path)
    }

    /// File name of the backup copy.
    #[must_use]
    pub fn backup_name(&self) -> Cow<'_, str> {
        display_name(&self.backup.path)
    }

    /// Whether both copies have the same file name.
    #[must_use]
    pub fn same_file_name(&self) -> bool {
        self.main.path.file_name() == self.backup.path.file_name()
    }
}

/// Reviewed, filtered duplicate pairs slated for deletion.
///
/// Order is the order in which the pairs were shown to the user and the order
/// in which main copies are deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillList {
    pairs: Vec<DuplicatePair>,
}

impl KillList {
    /// Wrap an ordered list of pairs.
    #[must_use]
    pub fn new(pairs: Vec<DuplicatePair>) -> Self {
        Self { pairs }
    }

    /// Pairs in order.
    #[must_use]
    pub fn pairs(&self) -> &[DuplicatePair] {
        &self.pairs
    }

    /// Iterate pairs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicatePair> {
        self.pairs.iter()
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there is nothing to delete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Bytes freed if every main copy is deleted.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.pairs.iter().map(DuplicatePair::size_bytes).sum()
    }

    /// Distinct directories holding the retained backup copies.
    #[must_use]
    pub fn backup_dirs(&self) -> BTreeSet<PathBuf> {
        self.pairs
            .iter()
            .map(|p| parent_dir(&p.backup.path))
            .collect()
    }
}

impl<'a> IntoIterator for &'a KillList {
    type Item = &'a DuplicatePair;
    type IntoIter = std::slice::Iter<'a, DuplicatePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
