//! Unified error types for slackpack.
//!
//! This module provides a single [`SlackpackError`] enum that covers every
//! failure the pipeline can produce, from opening the archive to rendering
//! a channel.
//!
//! # Failure model
//!
//! - **Library users** get typed errors they can match on
//!   ([`SlackpackError::ChannelNotFound`] is the one callers usually handle)
//! - **Application users** get messages that name the offending file
//! - A request either produces the whole channel or fails; there are no
//!   partial results

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for slackpack operations.
///
/// # Example
///
/// ```rust
/// use slackpack::error::Result;
/// use slackpack::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, SlackpackError>;

/// The error type for all slackpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SlackpackError {
    /// An I/O error occurred.
    ///
    /// Typically the input path doesn't exist or can't be read.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The container could not be opened as a zip archive.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// No entry with this logical path exists in the archive.
    #[error("Entry not found in archive: {path}")]
    EntryNotFound {
        /// The logical, `/`-separated path that was requested
        path: String,
    },

    /// A single entry decompresses to more bytes than allowed.
    #[error("Entry {path} is too large: {actual_size} bytes (maximum: {max_size} bytes)")]
    EntryTooLarge {
        /// The logical path of the entry
        path: String,
        /// Maximum allowed size in bytes
        max_size: u64,
        /// Declared uncompressed size of the entry
        actual_size: u64,
    },

    /// Entry content is not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// JSON content does not match the expected schema.
    ///
    /// `what` names the kind of document (`users.json`, `channels.json`,
    /// `message file`) and `path` the entry, when known.
    #[error("Failed to parse {what}{}: {source}", path.as_ref().map(|p| format!(" (file: {p})")).unwrap_or_default())]
    Parse {
        /// The kind of document being parsed
        what: &'static str,
        /// The entry path, if available
        path: Option<String>,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// No channel matches the requested name (case-insensitive).
    #[error("Channel {name} not found")]
    ChannelNotFound {
        /// The name the caller asked for
        name: String,
    },

    /// A thread group does not contain exactly one root record.
    ///
    /// The export guarantees that a thread root's own `thread_ts` equals its
    /// `ts`. A group with zero or several such records means the archive is
    /// malformed.
    #[error("Thread {thread_ts} has {roots} root messages (expected exactly one)")]
    DataConsistency {
        /// The group key (the thread's root timestamp)
        thread_ts: f64,
        /// How many records in the group carry `ts == thread_ts`
        roots: usize,
    },

    /// A value does not match an expected format (output format names, etc.).
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// JSON serialization error while writing output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl SlackpackError {
    /// Creates a parse error for a named document.
    pub fn parse(what: &'static str, path: Option<String>, source: serde_json::Error) -> Self {
        SlackpackError::Parse { what, path, source }
    }

    /// Creates an entry-not-found error.
    pub fn entry_not_found(path: impl Into<String>) -> Self {
        SlackpackError::EntryNotFound { path: path.into() }
    }

    /// Creates a channel-not-found error.
    pub fn channel_not_found(name: impl Into<String>) -> Self {
        SlackpackError::ChannelNotFound { name: name.into() }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        SlackpackError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a UTF-8 error for the given entry.
    pub fn utf8(context: impl Into<String>, source: std::string::FromUtf8Error) -> Self {
        SlackpackError::Utf8 {
            context: context.into(),
            source,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, SlackpackError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, SlackpackError::Parse { .. })
    }

    /// Returns `true` if the requested channel does not exist.
    pub fn is_channel_not_found(&self) -> bool {
        matches!(self, SlackpackError::ChannelNotFound { .. })
    }

    /// Returns `true` if an archive entry was missing.
    pub fn is_entry_not_found(&self) -> bool {
        matches!(self, SlackpackError::EntryNotFound { .. })
    }

    /// Returns `true` if a thread group was malformed.
    pub fn is_data_consistency(&self) -> bool {
        matches!(self, SlackpackError::DataConsistency { .. })
    }
}
