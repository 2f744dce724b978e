//! Extracted-directory backend.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{ArchiveSource, decode_text, is_contained};
use crate::config::ArchiveConfig;
use crate::error::{Result, SlackpackError};

/// An export that has already been unpacked to a directory tree.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    config: ArchiveConfig,
}

impl DirectorySource {
    /// Roots a source at `root` with the default configuration.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(root, ArchiveConfig::default())
    }

    /// Roots a source at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`SlackpackError::Io`] if `root` is not a directory.
    pub fn with_config(root: impl AsRef<Path>, config: ArchiveConfig) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", root.display()),
            )
            .into());
        }
        Ok(Self { root, config })
    }

    /// Returns the export root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Joins the components of a root-relative path with `/`.
fn logical_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl ArchiveSource for DirectorySource {
    fn read_text(&self, path: &str) -> Result<String> {
        if !is_contained(path) {
            return Err(SlackpackError::entry_not_found(path));
        }
        let full = self.root.join(path);
        let metadata = match fs::metadata(&full) {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(SlackpackError::entry_not_found(path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SlackpackError::entry_not_found(path));
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.len() > self.config.max_entry_size {
            return Err(SlackpackError::EntryTooLarge {
                path: path.to_string(),
                max_size: self.config.max_entry_size,
                actual_size: metadata.len(),
            });
        }

        let bytes = fs::read(&full)?;
        debug!(path, bytes = bytes.len(), "read file");
        decode_text(path, bytes)
    }

    fn list_entries(&self, folder: &str) -> Result<Vec<String>> {
        if !is_contained(folder) {
            return Ok(Vec::new());
        }
        let dir = self.root.join(folder);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.root).map_err(io::Error::other)?;
            entries.push(logical_path(relative));
        }
        entries.sort();
        Ok(entries)
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}
