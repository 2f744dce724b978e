//! Rendering-ready message type.
//!
//! A [`Message`] is a [`RawRecord`](crate::parsing::RawRecord) with its author
//! resolved to a display name and its timestamp converted to local time.
//! Thread roots carry their replies; replies never carry replies of their
//! own, so a tree is exactly two levels deep.
//!
//! Messages hold no reference to the user table. Mention substitution needs
//! it, so the renderer takes the table as an explicit argument.
//!
//! # Example
//!
//! ```
//! use slackpack::Message;
//! use slackpack::message::local_time;
//!
//! let reply = Message::new("Bob", local_time(1705314660.0), "agreed");
//! let root = Message::new("Alice", local_time(1705314600.0), "ship it?")
//!     .with_replies(vec![reply]);
//!
//! assert_eq!(root.reply_count(), 1);
//! assert!(root.to_string().contains("Alice: ship it?"));
//! ```

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::metadata::UserTable;
use crate::parsing::RawRecord;

/// A message with its author resolved, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the author, or the raw identifier when unknown.
    pub author: String,

    /// When the message was posted, in local time.
    pub timestamp: DateTime<Local>,

    /// Body text with mention tokens still in place.
    pub text: String,

    /// Replies in the order they were read from the export.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Message>,
}

/// Converts export seconds (with fraction) to local wall-clock time.
///
/// Values outside chrono's range map to the Unix epoch. Day files never
/// produce them: [`parse_day_file`](crate::parsing::parse_day_file) rejects
/// such timestamps.
pub fn local_time(ts: f64) -> DateTime<Local> {
    let secs = ts.floor();
    let mut whole = secs as i64;
    let mut nanos = ((ts - secs) * 1e9).round() as u32;
    if nanos >= 1_000_000_000 {
        whole += 1;
        nanos = 0;
    }
    DateTime::<Utc>::from_timestamp(whole, nanos)
        .unwrap_or_default()
        .with_timezone(&Local)
}

impl Message {
    /// Creates a message without replies.
    pub fn new(author: impl Into<String>, timestamp: DateTime<Local>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            timestamp,
            text: text.into(),
            replies: Vec::new(),
        }
    }

    /// Converts a raw record, resolving its author through `users`.
    ///
    /// Unknown authors keep their raw identifier; records without a `user`
    /// get an empty author.
    pub fn from_record(record: &RawRecord, users: &UserTable) -> Self {
        let author = record
            .user
            .as_deref()
            .map(|id| users.display_name(id).to_string())
            .unwrap_or_default();
        Self::new(author, local_time(record.ts), record.text.clone())
    }

    /// Builder method to attach replies.
    #[must_use]
    pub fn with_replies(mut self, replies: Vec<Message>) -> Self {
        self.replies = replies;
        self
    }

    /// Returns the author's display name.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the local timestamp.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Returns the raw body text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the replies, empty for leaves and replies.
    pub fn replies(&self) -> &[Message] {
        &self.replies
    }

    /// Returns `true` if this message starts a thread with replies.
    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty()
    }

    /// Number of replies.
    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}: {}",
            self.timestamp.format("%-d %b"),
            self.author,
            self.text
        )
    }
}
