//! In-memory zip archive backend.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use super::{ArchiveSource, decode_text, is_contained, is_under_folder};
use crate::config::ArchiveConfig;
use crate::error::{Result, SlackpackError};

/// An export held in memory as raw zip bytes.
///
/// The central directory is parsed once at construction. Entry content is
/// never cached: every [`read_text`](ArchiveSource::read_text) works on a
/// cheap clone of the indexed archive and decompresses the entry again.
#[derive(Clone)]
pub struct ZipArchiveSource {
    archive: ZipArchive<Cursor<Arc<[u8]>>>,
    entries: Vec<String>,
    size: usize,
    config: ArchiveConfig,
}

impl std::fmt::Debug for ZipArchiveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipArchiveSource")
            .field("len", &self.size)
            .field("entries", &self.entries.len())
            .field("config", &self.config)
            .finish()
    }
}

impl ZipArchiveSource {
    /// Wraps raw archive bytes with the default configuration.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::with_config(bytes, ArchiveConfig::default())
    }

    /// Wraps raw archive bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SlackpackError::Archive`] if the bytes are not a readable
    /// zip container.
    pub fn with_config(bytes: Vec<u8>, config: ArchiveConfig) -> Result<Self> {
        let size = bytes.len();
        let archive = ZipArchive::new(Cursor::new(Arc::<[u8]>::from(bytes)))?;
        let mut entries: Vec<String> = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect();
        entries.sort();
        debug!(entries = entries.len(), size, "opened zip archive");

        Ok(Self {
            archive,
            entries,
            size,
            config,
        })
    }

    /// Reads a `.zip` file from disk into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Returns all file entries in the archive, sorted.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl ArchiveSource for ZipArchiveSource {
    fn read_text(&self, path: &str) -> Result<String> {
        if !is_contained(path) {
            return Err(SlackpackError::entry_not_found(path));
        }
        // Shares the parsed central directory; only the cursor is new.
        let mut archive = self.archive.clone();
        let file = match archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(SlackpackError::entry_not_found(path)),
            Err(e) => return Err(e.into()),
        };

        let max_size = self.config.max_entry_size;
        if file.size() > max_size {
            return Err(SlackpackError::EntryTooLarge {
                path: path.to_string(),
                max_size,
                actual_size: file.size(),
            });
        }

        // The declared size can lie; cap what we actually inflate.
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.take(max_size + 1).read_to_end(&mut buf)?;
        if buf.len() as u64 > max_size {
            return Err(SlackpackError::EntryTooLarge {
                path: path.to_string(),
                max_size,
                actual_size: buf.len() as u64,
            });
        }

        debug!(path, bytes = buf.len(), "read zip entry");
        decode_text(path, buf)
    }

    fn list_entries(&self, folder: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| is_under_folder(entry, folder))
            .cloned()
            .collect())
    }

    fn describe(&self) -> String {
        format!("zip archive ({} entries)", self.entries.len())
    }
}
