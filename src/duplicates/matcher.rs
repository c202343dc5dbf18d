//! Cross-manifest duplicate matcher.
//!
//! # Overview
//!
//! Joins a main manifest and a backup manifest on content digest. Because
//! digests are unique within a manifest, the join is one-to-one: each shared
//! digest yields exactly one [`DuplicatePair`].
//!
//! The matcher is a pure function of its inputs. It is re-run on every review
//! so the result always reflects the current manifests and filter rules.
//!
//! # Ordering
//!
//! Pairs are sorted by main path, then backup path. The same inputs always
//! produce the same order, which is the order shown for review and the order
//! used for deletion.
//!
//! # Example
//!
//! ```no_run
//! use backdupe::duplicates::{find_duplicates_in_sets, FilterRules};
//! use backdupe::manifest::ManifestSet;
//!
//! let main = ManifestSet::from_paths(["laptop.manifest.json"]).unwrap();
//! let backup = ManifestSet::from_paths(["nas.manifest.json"]).unwrap();
//! let rules = FilterRules::ignoring([".tmp"]).unwrap();
//!
//! let result = find_duplicates_in_sets(&main, &backup, &rules).unwrap();
//! println!("{} duplicates, {} bytes", result.pairs.len(), result.total_bytes());
//! ```

use super::filter::FilterRules;
use super::pairs::{DuplicatePair, KillList};
use crate::manifest::{Manifest, ManifestError, ManifestSet};

/// Result of matching two manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Pairs that passed the filter rules, in review order
    pub pairs: Vec<DuplicatePair>,
    /// Shared digests dropped by the filter rules
    pub filtered: usize,
    /// Shared digests dropped because both sides recorded the same path
    pub same_path: usize,
}

impl MatchResult {
    /// Bytes freed if every main copy is deleted.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.pairs.iter().map(DuplicatePair::size_bytes).sum()
    }

    /// Whether no pair survived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Turn the pairs into a kill list, keeping their order.
    #[must_use]
    pub fn into_kill_list(self) -> KillList {
        KillList::new(self.pairs)
    }
}

/// Find files present in both manifests.
///
/// Pairs whose main-side extension is rejected by `rules` are dropped, as are
/// pairs where both sides recorded the same path (the same tree was selected
/// on both sides, so there is no second copy to keep).
#[must_use]
pub fn find_duplicates(main: &Manifest, backup: &Manifest, rules: &FilterRules) -> MatchResult {
    let mut result = MatchResult::default();

    for (digest, main_record) in main {
        let Some(backup_record) = backup.get(digest) else {
            continue;
        };

        if main_record.path == backup_record.path {
            log::warn!(
                "{} appears on both sides, it will not be deleted",
                main_record.path.display()
            );
            result.same_path += 1;
            continue;
        }

        if !rules.allows(&main_record.extension) {
            log::trace!(
                "Filtered out {} ({})",
                main_record.path.display(),
                main_record.extension
            );
            result.filtered += 1;
            continue;
        }

        result
            .pairs
            .push(DuplicatePair::new(main_record.clone(), backup_record.clone()));
    }

    result
        .pairs
        .sort_by(|a, b| (&a.main.path, &a.backup.path).cmp(&(&b.main.path, &b.backup.path)));

    log::debug!(
        "Matched {} duplicates ({} filtered, {} same path)",
        result.pairs.len(),
        result.filtered,
        result.same_path
    );

    result
}

/// Load and merge each side, then find duplicates.
///
/// # Errors
///
/// Propagates the first manifest that fails to load.
pub fn find_duplicates_in_sets(
    main: &ManifestSet,
    backup: &ManifestSet,
    rules: &FilterRules,
) -> Result<MatchResult, ManifestError> {
    let main = main.load_merged()?;
    let backup = backup.load_merged()?;
    Ok(find_duplicates(&main, &backup, rules))
}
