//! Duplicate detection across a main and a backup manifest set.
//!
//! This module provides functionality for:
//! - Extension filter rules (ignored and sought sets)
//! - Digest join between two merged manifests
//! - Duplicate pairs and the kill list built from them

pub mod filter;
pub mod matcher;
pub mod pairs;

pub use filter::{normalize_extension, ExtensionSet, FilterError, FilterRules};
pub use matcher::{find_duplicates, find_duplicates_in_sets, MatchResult};
pub use pairs::{DuplicatePair, KillList};
