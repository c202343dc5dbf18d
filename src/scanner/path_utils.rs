//! Path helpers shared by the scanner, the manifest store and the CLI.
//!
//! # Example
//!
//! ```
//! use backdupe::scanner::path_utils::file_extension;
//! use std::path::Path;
//!
//! assert_eq!(file_extension(Path::new("/pics/beach.jpg")).as_deref(), Some(".JPG"));
//! assert_eq!(file_extension(Path::new("/docs/README")), None);
//! ```

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Uppercased extension of `path`, including the leading dot.
///
/// Only the final suffix counts (`archive.tar.gz` gives `.GZ`). Returns `None`
/// for names without a suffix, for dot-files such as `.bashrc`, and for names
/// ending in a bare dot.
#[must_use]
pub fn file_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy();
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_uppercase()))
}

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without a leading `~` (and `~user` forms) are returned unchanged.
#[must_use]
pub fn expand_home(path: &Path) -> Cow<'_, Path> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Cow::Borrowed(path);
    };

    match BaseDirs::new() {
        Some(dirs) => Cow::Owned(dirs.home_dir().join(rest)),
        None => {
            log::warn!(
                "Could not determine home directory, using {} as given",
                path.display()
            );
            Cow::Borrowed(path)
        }
    }
}

/// File name of `path` for display, falling back to the whole path.
#[must_use]
pub fn display_name(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy())
}

/// Parent directory of `path`, or `path` itself when it has none.
#[must_use]
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
        .to_path_buf()
}
