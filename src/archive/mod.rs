//! Uniform read access to the files of an export.
//!
//! An export is either the original `.zip` download or the directory tree it
//! unpacks to. Both are exposed through the [`ArchiveSource`] capability so
//! nothing downstream knows which one is active.
//!
//! Paths are logical and `/`-separated, relative to the export root:
//! `users.json`, `channels.json`, `general/2024-01-15.json`.
//!
//! # Example
//!
//! ```rust,no_run
//! use slackpack::archive::{ArchiveSource, open_source};
//! use std::path::Path;
//!
//! let source = open_source(Path::new("export.zip"))?;
//! let users = source.read_text("users.json")?;
//! for entry in source.list_entries("general")? {
//!     println!("{entry}");
//! }
//! # Ok::<(), slackpack::SlackpackError>(())
//! ```

mod dir_source;
mod zip_source;

pub use dir_source::DirectorySource;
pub use zip_source::ZipArchiveSource;

use std::path::{Component, Path};

use crate::error::{Result, SlackpackError};

/// Read-only access to the named entries of an export.
pub trait ArchiveSource: std::fmt::Debug + Send + Sync {
    /// Returns the text content of the entry at `path`.
    ///
    /// # Errors
    ///
    /// - [`SlackpackError::EntryNotFound`] when no entry matches
    /// - [`SlackpackError::EntryTooLarge`] when the entry exceeds the configured limit
    /// - [`SlackpackError::Utf8`] when the content is not UTF-8
    fn read_text(&self, path: &str) -> Result<String>;

    /// Returns the logical paths of every file below `folder`, sorted.
    ///
    /// A folder that doesn't exist yields an empty list.
    fn list_entries(&self, folder: &str) -> Result<Vec<String>>;

    /// Short human-readable description of the backing store, for logs.
    fn describe(&self) -> String;
}

impl<T: ArchiveSource + ?Sized> ArchiveSource for Box<T> {
    fn read_text(&self, path: &str) -> Result<String> {
        (**self).read_text(path)
    }

    fn list_entries(&self, folder: &str) -> Result<Vec<String>> {
        (**self).list_entries(folder)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Opens an export from disk, choosing the backend by what `path` is.
///
/// A directory is read in place; anything else is loaded as a zip archive.
pub fn open_source(path: &Path) -> Result<Box<dyn ArchiveSource>> {
    if path.is_dir() {
        Ok(Box::new(DirectorySource::new(path)?))
    } else {
        Ok(Box::new(ZipArchiveSource::open(path)?))
    }
}

/// Decodes entry bytes as UTF-8, dropping a leading byte-order mark.
pub(crate) fn decode_text(path: &str, bytes: Vec<u8>) -> Result<String> {
    let text = String::from_utf8(bytes).map_err(|e| SlackpackError::utf8(format!("entry {path}"), e))?;
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(text),
    }
}

/// Returns `true` if `path` is a non-empty relative path made only of plain
/// names: no root, no `.` or `..`, no drive prefix.
pub(crate) fn is_contained(path: &str) -> bool {
    let mut components = Path::new(path).components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

/// Returns `true` if `entry` lies somewhere below `folder`.
pub(crate) fn is_under_folder(entry: &str, folder: &str) -> bool {
    is_contained(folder)
        && is_contained(entry)
        && entry
            .strip_prefix(folder)
            .is_some_and(|rest| rest.len() > 1 && rest.starts_with('/'))
}
