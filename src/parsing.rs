//! Per-day message files of a channel.
//!
//! Every channel folder holds one JSON file per day of activity, each an
//! array of message objects:
//!
//! ```json
//! [
//!   {"type": "message", "user": "U1", "text": "hi <@U2>", "ts": "1705314600.000100"},
//!   {"type": "message", "user": "U2", "text": "hey", "ts": "1705314660.000200",
//!    "thread_ts": "1705314600.000100"},
//!   {"type": "message", "subtype": "channel_join", "user": "U3", "text": "<@U3> has joined",
//!    "ts": "1705314700.000300"}
//! ]
//! ```
//!
//! Timestamps double as message identifiers, so they are kept at full
//! precision: thread membership is decided by exact equality.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::archive::ArchiveSource;
use crate::error::{Result, SlackpackError};
use crate::metadata::Channel;

/// One message object exactly as it appears in a day file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Message body; may contain `<@USERID>` mention tokens.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub text: String,

    /// Seconds since the epoch, with sub-second precision.
    #[serde(deserialize_with = "deserialize_ts")]
    pub ts: f64,

    /// Timestamp of the thread root; present on replies and on roots of threads.
    #[serde(default, deserialize_with = "deserialize_opt_ts")]
    pub thread_ts: Option<f64>,

    /// Author identifier; absent for some system records.
    #[serde(default)]
    pub user: Option<String>,

    /// Non-null for events such as `channel_join`.
    #[serde(default)]
    pub subtype: Option<String>,
}

impl RawRecord {
    /// Creates a plain conversational record.
    pub fn new(ts: f64, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ts,
            thread_ts: None,
            user: None,
            subtype: None,
        }
    }

    /// Builder method to set the author.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Builder method to attach the record to a thread.
    #[must_use]
    pub fn with_thread_ts(mut self, thread_ts: f64) -> Self {
        self.thread_ts = Some(thread_ts);
        self
    }

    /// Builder method to mark the record as a system event.
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Returns `true` for real messages (no subtype).
    pub fn is_conversational(&self) -> bool {
        self.subtype.is_none()
    }

    /// The conversation this record belongs to: its thread root, or itself.
    pub fn group_key(&self) -> f64 {
        self.thread_ts.unwrap_or(self.ts)
    }
}

/// Exports write timestamps as strings (`"1705314600.000100"`), older tools
/// as numbers. Accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum TsRepr {
    Number(f64),
    Text(String),
}

impl TsRepr {
    fn into_seconds<E: de::Error>(self) -> std::result::Result<f64, E> {
        let value = match self {
            TsRepr::Number(n) => n,
            TsRepr::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid timestamp '{s}'")))?,
        };
        if value.is_finite() && DateTime::<Utc>::from_timestamp(value.floor() as i64, 0).is_some() {
            Ok(value)
        } else {
            Err(E::custom(format!("timestamp out of range: {value}")))
        }
    }
}

fn deserialize_ts<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    TsRepr::deserialize(deserializer)?.into_seconds()
}

fn deserialize_opt_ts<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    Option::<TsRepr>::deserialize(deserializer)?
        .map(TsRepr::into_seconds)
        .transpose()
}

fn deserialize_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses one day file.
///
/// Empty or whitespace-only content yields no records; exports write such
/// placeholders for days without activity.
pub fn parse_day_file(path: &str, content: &str) -> Result<Vec<RawRecord>> {
    if content.trim().is_empty() {
        debug!(path, "skipping empty day file");
        return Ok(Vec::new());
    }
    serde_json::from_str(content)
        .map_err(|e| SlackpackError::parse("message file", Some(path.to_string()), e))
}

/// Reads every record of every day file of `channel`, in file order.
///
/// Any unreadable or unparsable file fails the whole read.
pub fn read_channel_records<S: ArchiveSource + ?Sized>(
    source: &S,
    channel: &Channel,
) -> Result<Vec<RawRecord>> {
    let files = source.list_entries(&channel.name)?;
    let mut records = Vec::new();
    for path in &files {
        let content = source.read_text(path)?;
        records.extend(parse_day_file(path, &content)?);
    }
    debug!(
        channel = %channel.name,
        files = files.len(),
        records = records.len(),
        "read channel records"
    );
    Ok(records)
}
