//! Ordered selections of manifest files for one side of a comparison.

use std::path::{Path, PathBuf};

use super::{store, Manifest, ManifestError};
use crate::scanner::path_utils::expand_home;

/// Manifest files selected for the main or the backup side.
///
/// Order matters: when the set is merged, later manifests win on digest
/// collision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSet {
    paths: Vec<PathBuf>,
}

impl ManifestSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from paths, validating each one.
    ///
    /// # Errors
    ///
    /// Returns `PathNotFound` for the first path that is not an existing file.
    pub fn from_paths<I, P>(paths: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = Self::new();
        for path in paths {
            set.add(path.as_ref())?;
        }
        Ok(set)
    }

    /// Append a manifest file.
    ///
    /// Returns `false` if the path was already selected.
    ///
    /// # Errors
    ///
    /// Returns `PathNotFound` if `path` is not an existing file.
    pub fn add(&mut self, path: &Path) -> Result<bool, ManifestError> {
        let path = expand_home(path).into_owned();
        if !path.is_file() {
            return Err(ManifestError::PathNotFound(path));
        }
        if self.paths.contains(&path) {
            log::debug!("Manifest already selected: {}", path.display());
            return Ok(false);
        }
        self.paths.push(path);
        Ok(true)
    }

    /// Remove a manifest file. Returns `false` if it was not selected.
    pub fn remove(&mut self, path: &Path) -> bool {
        let path = expand_home(path);
        let before = self.paths.len();
        self.paths.retain(|p| p.as_path() != &*path);
        self.paths.len() != before
    }

    /// Selected paths in order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of selected manifests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Forget every selection.
    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Load every selected manifest and merge them in order.
    ///
    /// # Errors
    ///
    /// Propagates the first load failure.
    pub fn load_merged(&self) -> Result<Manifest, ManifestError> {
        store::load_merged(&self.paths)
    }
}
