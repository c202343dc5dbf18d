//! Extension filter rules applied to duplicate pairs.
//!
//! Extensions are normalized on insertion (trimmed, uppercased, with a leading
//! dot), so `jpg`, `.jpg` and `.JPG` are the same rule. Two sets exist:
//!
//! - **ignored**: pairs whose main-side extension is listed are never deleted.
//! - **sought**: when non-empty, only pairs whose main-side extension is
//!   listed are kept.
//!
//! An extension may not be both ignored and sought. Additions that would create
//! such a conflict are rejected as a whole with [`FilterError::Conflict`].

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Errors raised when building filter rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// Extensions that would be both ignored and sought.
    #[error("extensions both ignored and sought: {}", .0.join(", "))]
    Conflict(Vec<String>),

    /// An extension that is empty after normalization or looks like a path.
    #[error("invalid extension: '{0}'")]
    Invalid(String),
}

/// Normalize a user-supplied extension to the `.UPPER` form used in manifests.
///
/// # Errors
///
/// Returns `Invalid` for empty input, bare dots, whitespace inside the
/// extension, or path separators.
pub fn normalize_extension(raw: &str) -> Result<String, FilterError> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('.').unwrap_or(trimmed);

    if body.is_empty()
        || body.starts_with('.')
        || body.contains(|c: char| c == '/' || c == '\\' || c.is_whitespace())
    {
        return Err(FilterError::Invalid(raw.to_string()));
    }

    Ok(format!(".{}", body.to_uppercase()))
}

/// A set of normalized extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whitespace-separated list such as `".jpeg .PNG mov"`.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for the first entry that fails normalization.
    pub fn parse(list: &str) -> Result<Self, FilterError> {
        Self::try_from_iter(list.split_whitespace())
    }

    /// Build a set from raw extension strings.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for the first entry that fails normalization.
    pub fn try_from_iter<I, S>(items: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .map(|s| normalize_extension(s.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// Insert an extension. Returns `true` if it was not present.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` if the extension fails normalization.
    pub fn insert(&mut self, raw: &str) -> Result<bool, FilterError> {
        Ok(self.0.insert(normalize_extension(raw)?))
    }

    /// Remove an extension. Returns `true` if it was present.
    pub fn remove(&mut self, raw: &str) -> bool {
        normalize_extension(raw).is_ok_and(|ext| self.0.remove(&ext))
    }

    /// Whether the set holds `ext`, compared case-insensitively.
    #[must_use]
    pub fn contains(&self, ext: &str) -> bool {
        normalize_extension(ext).is_ok_and(|ext| self.0.contains(&ext))
    }

    /// Number of extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extensions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Remove every extension.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    fn intersection(&self, other: &Self) -> Vec<String> {
        self.0.intersection(&other.0).cloned().collect()
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, ext) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ext}")?;
        }
        write!(f, "}}")
    }
}

/// Ignored and sought extension sets, guaranteed disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRules {
    ignored: ExtensionSet,
    sought: ExtensionSet,
}

impl FilterRules {
    /// Rules that keep every pair.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Build rules from the two sets.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if any extension is in both sets.
    pub fn new(ignored: ExtensionSet, sought: ExtensionSet) -> Result<Self, FilterError> {
        let conflicts = ignored.intersection(&sought);
        if !conflicts.is_empty() {
            return Err(FilterError::Conflict(conflicts));
        }
        Ok(Self { ignored, sought })
    }

    /// Rules that only ignore the given extensions.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` if an extension fails normalization.
    pub fn ignoring<I, S>(extensions: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(ExtensionSet::try_from_iter(extensions)?, ExtensionSet::new())
    }

    /// Ignored extensions.
    #[must_use]
    pub fn ignored(&self) -> &ExtensionSet {
        &self.ignored
    }

    /// Sought extensions.
    #[must_use]
    pub fn sought(&self) -> &ExtensionSet {
        &self.sought
    }

    /// Add ignored extensions. Nothing is added if any of them conflicts.
    ///
    /// Returns how many were newly added.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` or `Conflict`; the rules are unchanged in both cases.
    pub fn add_ignored(&mut self, extensions: &ExtensionSet) -> Result<usize, FilterError> {
        let conflicts = extensions.intersection(&self.sought);
        if !conflicts.is_empty() {
            return Err(FilterError::Conflict(conflicts));
        }
        Ok(extensions
            .iter()
            .filter(|ext| self.ignored.0.insert((*ext).to_string()))
            .count())
    }

    /// Add sought extensions. Nothing is added if any of them conflicts.
    ///
    /// Returns how many were newly added.
    ///
    /// # Errors
    ///
    /// Returns `Conflict`; the rules are unchanged.
    pub fn add_sought(&mut self, extensions: &ExtensionSet) -> Result<usize, FilterError> {
        let conflicts = extensions.intersection(&self.ignored);
        if !conflicts.is_empty() {
            return Err(FilterError::Conflict(conflicts));
        }
        Ok(extensions
            .iter()
            .filter(|ext| self.sought.0.insert((*ext).to_string()))
            .count())
    }

    /// Stop ignoring an extension. Returns `true` if it was ignored.
    pub fn remove_ignored(&mut self, ext: &str) -> bool {
        self.ignored.remove(ext)
    }

    /// Stop seeking an extension. Returns `true` if it was sought.
    pub fn remove_sought(&mut self, ext: &str) -> bool {
        self.sought.remove(ext)
    }

    /// Drop all rules.
    pub fn clear(&mut self) {
        self.ignored.clear();
        self.sought.clear();
    }

    /// Whether no rule is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ignored.is_empty() && self.sought.is_empty()
    }

    /// Whether a file with `extension` may be put on the kill list.
    #[must_use]
    pub fn allows(&self, extension: &str) -> bool {
        if self.ignored.contains(extension) {
            return false;
        }
        self.sought.is_empty() || self.sought.contains(extension)
    }
}
