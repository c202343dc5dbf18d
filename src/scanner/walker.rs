//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and collecting file metadata. Traversal is single-threaded and synchronous.
//!
//! # Features
//!
//! - Recursive traversal, directories are descended but never yielded
//! - Optional symlink following (walkdir reports link loops as errors)
//! - Hidden file filtering
//! - Per-entry errors are yielded, never fatal to the walk
//!
//! # Example
//!
//! ```no_run
//! use backdupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Pictures"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding regular files.
    ///
    /// Entries are visited in file-name order within each directory.
    /// Errors are yielded as [`ScanError`] values rather than stopping iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && entry.depth() > 0 && is_hidden(entry)))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => Some(Err(self.convert_walk_error(e))),
            })
    }

    /// Turn a walkdir entry into a [`FileEntry`] if it is a regular file.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        if file_type.is_symlink() {
            // Only reachable when not following links.
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        if !file_type.is_file() {
            log::trace!("Skipping special file: {}", entry.path().display());
            return None;
        }

        match entry.metadata() {
            Ok(metadata) => Some(Ok(FileEntry::new(
                entry.path().to_path_buf(),
                metadata.len(),
            ))),
            Err(e) => Some(Err(self.convert_walk_error(e))),
        }
    }

    fn convert_walk_error(&self, e: walkdir::Error) -> ScanError {
        let path = e
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = e.loop_ancestor() {
            log::warn!(
                "Symlink loop at {} (points back to {})",
                path.display(),
                ancestor.display()
            );
        }

        match e.into_io_error() {
            Some(io_err) => handle_io_error(path, io_err),
            None => ScanError::Io {
                path,
                source: io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
            },
        }
    }
}

fn handle_io_error(path: PathBuf, e: io::Error) -> ScanError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(path),
        io::ErrorKind::NotFound => ScanError::NotFound(path),
        _ => ScanError::Io { path, source: e },
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
