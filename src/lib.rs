//! # Slackpack
//!
//! Turn a Slack workspace export into a threaded, readable rendering of one
//! channel.
//!
//! ## Overview
//!
//! An export is a zip archive (or the directory it unpacks to) holding
//! `users.json`, `channels.json` and one folder of per-day message files
//! per channel. Slackpack reads it in one synchronous pass:
//!
//! 1. [`archive`] — uniform access to zip or directory exports
//! 2. [`metadata`] — the user table and channel list
//! 3. [`parsing`] — raw records from each day file
//! 4. [`thread`] — roots and their replies, rebuilt from flat records
//! 5. [`render`] — HTML with `<@USER>` mentions replaced by display names
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slackpack::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let reader = ExportReader::open(Path::new("export.zip"))?;
//!     let threads = reader.render_channel("general", &RenderConfig::default())?;
//!     println!("{} threads", threads.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`reader`] — [`ExportReader`](reader::ExportReader), the entry point
//! - [`config`] — [`ArchiveConfig`](config::ArchiveConfig), [`RenderConfig`](config::RenderConfig)
//! - [`format`] — JSON / HTML / text writers
//! - [`cli`] — CLI types (with the `cli` feature)
//! - [`error`] — [`SlackpackError`], [`Result`]

pub mod archive;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod message;
pub mod metadata;
pub mod parsing;
pub mod reader;
pub mod render;
pub mod thread;

// Re-export the main types at the crate root for convenience
pub use error::{Result, SlackpackError};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use slackpack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;

    pub use crate::error::{Result, SlackpackError};

    pub use crate::archive::{ArchiveSource, DirectorySource, ZipArchiveSource, open_source};

    pub use crate::config::{ArchiveConfig, RenderConfig};

    pub use crate::metadata::{Channel, User, UserTable};

    pub use crate::parsing::RawRecord;

    pub use crate::reader::{ExportReader, render_channel_from_bytes};

    pub use crate::render::{render_html, substitute_mentions};

    pub use crate::thread::reconstruct_threads;

    pub use crate::format::{OutputFormat, to_format, write_to_format};
}
