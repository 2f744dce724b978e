//! Configuration types for archive access and rendering.
//!
//! These are plain structs with builder methods, usable without any CLI
//! framework.
//!
//! - [`ArchiveConfig`] - limits applied while reading archive entries
//! - [`RenderConfig`] - how messages are turned into HTML
//!
//! # Example
//!
//! ```rust
//! use slackpack::config::RenderConfig;
//!
//! let config = RenderConfig::new()
//!     .with_date_format("%Y-%m-%d %H:%M")
//!     .with_reply_indent(24);
//! assert_eq!(config.reply_indent_px, 24);
//! ```

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlackpackError};

/// Default cap on a single decompressed entry (100 MB).
pub const DEFAULT_MAX_ENTRY_SIZE: u64 = 100 * 1024 * 1024;

/// Default header date format, e.g. `5 Mar 14:07`.
pub const DEFAULT_DATE_FORMAT: &str = "%-d %b %H:%M";

/// Configuration for reading entries out of an export archive.
///
/// # Example
///
/// ```rust
/// use slackpack::config::ArchiveConfig;
///
/// let config = ArchiveConfig::new().with_max_entry_size(1024 * 1024);
/// assert_eq!(config.max_entry_size, 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Largest uncompressed entry that will be read, in bytes (default: 100MB)
    pub max_entry_size: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum entry size.
    #[must_use]
    pub fn with_max_entry_size(mut self, size: u64) -> Self {
        self.max_entry_size = size;
        self
    }
}

/// Configuration for HTML rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// `chrono` strftime pattern for the header timestamp (default: `%-d %b %H:%M`)
    pub date_format: String,

    /// Left margin of the reply container, in pixels (default: 15)
    pub reply_indent_px: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            reply_indent_px: 15,
        }
    }
}

impl RenderConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header date format.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Sets the reply indentation.
    #[must_use]
    pub fn with_reply_indent(mut self, px: u32) -> Self {
        self.reply_indent_px = px;
        self
    }

    /// Checks that `date_format` only uses known strftime specifiers.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(SlackpackError::invalid_format(
                "date",
                format!("unsupported pattern '{}'", self.date_format),
            ));
        }
        Ok(())
    }
}
