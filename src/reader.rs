//! Single entry point for turning an export into rendered threads.
//!
//! [`ExportReader`] loads the user table and channel list once, then reads
//! channels on demand. Everything is synchronous and eager: a call either
//! returns the complete channel or an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use slackpack::config::RenderConfig;
//! use slackpack::reader::ExportReader;
//! use std::path::Path;
//!
//! let reader = ExportReader::open(Path::new("export.zip"))?;
//! for html in reader.render_channel("general", &RenderConfig::default())? {
//!     println!("{html}");
//! }
//! # Ok::<(), slackpack::SlackpackError>(())
//! ```

use std::path::Path;

use tracing::info;

use crate::Message;
use crate::archive::{ArchiveSource, ZipArchiveSource, open_source};
use crate::config::RenderConfig;
use crate::error::{Result, SlackpackError};
use crate::metadata::{self, Channel, UserTable};
use crate::parsing::read_channel_records;
use crate::render::render_all;
use crate::thread::{reconstruct_threads, sort_by_date};

/// Reads channels out of one export.
#[derive(Debug)]
pub struct ExportReader<S: ArchiveSource> {
    source: S,
    users: UserTable,
    channels: Vec<Channel>,
}

impl<S: ArchiveSource> ExportReader<S> {
    /// Loads `users.json` and `channels.json` from `source`.
    pub fn new(source: S) -> Result<Self> {
        let users = metadata::load_users(&source)?;
        let channels = metadata::load_channels(&source)?;
        info!(
            source = %source.describe(),
            users = users.len(),
            channels = channels.len(),
            "opened export"
        );
        Ok(Self {
            source,
            users,
            channels,
        })
    }

    /// Returns the backing source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the user table.
    pub fn users(&self) -> &UserTable {
        &self.users
    }

    /// Returns all channels in `channels.json` order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Looks a channel up by name, ignoring case.
    ///
    /// # Errors
    ///
    /// [`SlackpackError::ChannelNotFound`] when nothing matches.
    pub fn find_channel(&self, name: &str) -> Result<&Channel> {
        metadata::find_channel(&self.channels, name)
            .ok_or_else(|| SlackpackError::channel_not_found(name))
    }

    /// Reads a channel's threads in encounter order (unsorted).
    pub fn read(&self, channel: &Channel) -> Result<Vec<Message>> {
        let records = read_channel_records(&self.source, channel)?;
        reconstruct_threads(&records, &self.users)
    }

    /// Reads a channel by name, with threads sorted oldest first.
    pub fn read_channel(&self, name: &str) -> Result<Vec<Message>> {
        let channel = self.find_channel(name)?;
        let mut messages = self.read(channel)?;
        sort_by_date(&mut messages);
        info!(channel = %channel.name, threads = messages.len(), "read channel");
        Ok(messages)
    }

    /// Reads a channel by name and renders each thread as HTML, oldest first.
    pub fn render_channel(&self, name: &str, config: &RenderConfig) -> Result<Vec<String>> {
        let messages = self.read_channel(name)?;
        Ok(render_all(&messages, &self.users, config))
    }
}

impl ExportReader<ZipArchiveSource> {
    /// Reads an export from raw zip bytes.
    pub fn from_zip_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::new(ZipArchiveSource::from_bytes(bytes)?)
    }
}

impl ExportReader<Box<dyn ArchiveSource>> {
    /// Opens a `.zip` export or an extracted export directory.
    pub fn open(path: &Path) -> Result<Self> {
        Self::new(open_source(path)?)
    }
}

/// Renders one channel of a zipped export with default settings.
///
/// This is the whole pipeline in one call: archive bytes and a channel name
/// in, HTML fragments sorted by date out.
pub fn render_channel_from_bytes(bytes: Vec<u8>, channel: &str) -> Result<Vec<String>> {
    ExportReader::from_zip_bytes(bytes)?.render_channel(channel, &RenderConfig::default())
}
