//! Interactive deduplication session.
//!
//! A [`DedupeSession`] owns everything the menu shell works on: the main and
//! backup manifest selections, the extension filters, and the kill list from
//! the last review. It also tracks which step the user is in.
//!
//! # Rules
//!
//! * Changing either manifest selection or the filters discards the kill list.
//! * [`DedupeSession::review`] always recomputes the kill list from the
//!   current selections and filters.
//! * Deleting needs a reviewed, non-empty kill list and an explicit
//!   confirmation step.
//! * A confirmed deletion clears the kill list and the main selection. A
//!   declined one keeps both. Either way the session goes back to
//!   [`SessionState::Idle`].

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::actions::delete::{delete_duplicates, Confirmation, DeleteConfig, DeletionOutcome};
use crate::duplicates::{find_duplicates_in_sets, ExtensionSet, FilterError, FilterRules, KillList, MatchResult};
use crate::manifest::{ManifestError, ManifestSet};
use crate::progress::ProgressCallback;

/// Which side of the comparison a manifest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The tree whose duplicate copies are deleted.
    Main,
    /// The tree whose copies are kept.
    Backup,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("main"),
            Self::Backup => f.write_str("backup"),
        }
    }
}

/// Step the session is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Top-level menu.
    #[default]
    Idle,
    /// Editing the main manifest selection.
    SelectingMain,
    /// Editing the backup manifest selection.
    SelectingBackup,
    /// Editing the extension filters.
    SettingFilters,
    /// A fresh kill list is available.
    Reviewing,
    /// Waiting for the user to type `yes`.
    AwaitingConfirmation,
}

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Review needs at least one manifest on each side.
    #[error("select at least one main and one backup manifest first")]
    MissingManifests,

    /// Delete was requested before a review.
    #[error("review the duplicates before deleting")]
    NotReviewed,

    /// The reviewed kill list is empty.
    #[error("no duplicates to delete")]
    NothingToDelete,

    /// Confirmation was given outside the confirmation step.
    #[error("no deletion is awaiting confirmation (state: {0:?})")]
    NotAwaitingConfirmation(SessionState),

    /// Removing a manifest that is not selected.
    #[error("{side} manifest not selected: {path}")]
    NotSelected {
        /// Side that was edited
        side: Side,
        /// Path that was not found in the selection
        path: PathBuf,
    },

    /// A manifest could not be selected or loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A filter edit was rejected.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// State of one interactive deduplication run.
#[derive(Debug, Default)]
pub struct DedupeSession {
    main: ManifestSet,
    backup: ManifestSet,
    filters: FilterRules,
    kill_list: Option<KillList>,
    state: SessionState,
}

impl DedupeSession {
    /// Start an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with preset filters.
    #[must_use]
    pub fn with_filters(filters: FilterRules) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Current step.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Selected manifests for a side.
    #[must_use]
    pub fn manifests(&self, side: Side) -> &ManifestSet {
        match side {
            Side::Main => &self.main,
            Side::Backup => &self.backup,
        }
    }

    /// Current extension filters.
    #[must_use]
    pub fn filters(&self) -> &FilterRules {
        &self.filters
    }

    /// Kill list from the last review, if still valid.
    #[must_use]
    pub fn kill_list(&self) -> Option<&KillList> {
        self.kill_list.as_ref()
    }

    /// Enter manifest editing for a side.
    pub fn select(&mut self, side: Side) {
        self.state = match side {
            Side::Main => SessionState::SelectingMain,
            Side::Backup => SessionState::SelectingBackup,
        };
    }

    /// Enter filter editing.
    pub fn edit_filters(&mut self) {
        self.state = SessionState::SettingFilters;
    }

    /// Return to the top-level menu.
    pub fn finish_editing(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Add a manifest file to a side.
    ///
    /// Returns `false` if it was already selected.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Manifest` if `path` is not an existing file.
    pub fn add_manifest(&mut self, side: Side, path: &Path) -> Result<bool, SessionError> {
        let added = self.side_mut(side).add(path)?;
        if added {
            log::debug!("Selected {} manifest {}", side, path.display());
            self.invalidate();
        }
        Ok(added)
    }

    /// Remove a manifest file from a side.
    ///
    /// # Errors
    ///
    /// Returns `NotSelected` if `path` was not selected.
    pub fn remove_manifest(&mut self, side: Side, path: &Path) -> Result<(), SessionError> {
        if !self.side_mut(side).remove(path) {
            return Err(SessionError::NotSelected {
                side,
                path: path.to_path_buf(),
            });
        }
        self.invalidate();
        Ok(())
    }

    /// Add space-separated extensions to the ignored set.
    ///
    /// Returns how many were new.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Filter` if the list is malformed or names a
    /// sought extension.
    pub fn add_ignored(&mut self, list: &str) -> Result<usize, SessionError> {
        let set = ExtensionSet::parse(list)?;
        let added = self.filters.add_ignored(&set)?;
        self.invalidate();
        Ok(added)
    }

    /// Add space-separated extensions to the sought set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Filter` if the list is malformed or names an
    /// ignored extension.
    pub fn add_sought(&mut self, list: &str) -> Result<usize, SessionError> {
        let set = ExtensionSet::parse(list)?;
        let added = self.filters.add_sought(&set)?;
        self.invalidate();
        Ok(added)
    }

    /// Drop every filter.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.invalidate();
    }

    /// Recompute duplicates from the current selections and filters.
    ///
    /// # Errors
    ///
    /// Returns `MissingManifests` if either side is empty, or
    /// `SessionError::Manifest` if a selected manifest fails to load.
    pub fn review(&mut self) -> Result<MatchResult, SessionError> {
        if self.main.is_empty() || self.backup.is_empty() {
            return Err(SessionError::MissingManifests);
        }

        self.kill_list = None;
        let result = find_duplicates_in_sets(&self.main, &self.backup, &self.filters)?;
        self.kill_list = Some(KillList::new(result.pairs.clone()));
        self.state = SessionState::Reviewing;

        log::info!(
            "Reviewed {} duplicate(s), {} reclaimable",
            result.pairs.len(),
            bytesize::ByteSize::b(result.total_bytes())
        );
        Ok(result)
    }

    /// Ask for confirmation to delete the reviewed kill list.
    ///
    /// # Errors
    ///
    /// Returns `NotReviewed` if there is no current review, or
    /// `NothingToDelete` if it found no duplicates.
    pub fn begin_delete(&mut self) -> Result<&KillList, SessionError> {
        let kill_list = self.kill_list.as_ref().ok_or(SessionError::NotReviewed)?;
        if kill_list.is_empty() {
            return Err(SessionError::NothingToDelete);
        }
        self.state = SessionState::AwaitingConfirmation;
        Ok(kill_list)
    }

    /// Act on the user's answer to the deletion prompt.
    ///
    /// # Errors
    ///
    /// Returns `NotAwaitingConfirmation` unless [`begin_delete`] was called
    /// first.
    ///
    /// [`begin_delete`]: Self::begin_delete
    pub fn confirm_delete(
        &mut self,
        confirmation: Confirmation,
        config: &DeleteConfig,
        callback: Option<&dyn ProgressCallback>,
    ) -> Result<DeletionOutcome, SessionError> {
        if self.state != SessionState::AwaitingConfirmation {
            return Err(SessionError::NotAwaitingConfirmation(self.state));
        }
        let kill_list = self.kill_list.as_ref().ok_or(SessionError::NotReviewed)?;

        let outcome = delete_duplicates(kill_list, confirmation, config, callback);
        if let DeletionOutcome::Completed(_) = outcome {
            self.kill_list = None;
            self.main.clear();
        }
        self.state = SessionState::Idle;
        Ok(outcome)
    }

    fn side_mut(&mut self, side: Side) -> &mut ManifestSet {
        match side {
            Side::Main => &mut self.main,
            Side::Backup => &mut self.backup,
        }
    }

    fn invalidate(&mut self) {
        if self.kill_list.take().is_some() {
            log::debug!("Selection changed, discarding reviewed duplicates");
        }
        if matches!(
            self.state,
            SessionState::Reviewing | SessionState::AwaitingConfirmation
        ) {
            self.state = SessionState::Idle;
        }
    }
}
