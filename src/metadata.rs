//! Workspace metadata: the user table and the channel list.
//!
//! Both live at the root of an export:
//!
//! ```json
//! // users.json
//! [{"id": "U1", "profile": {"display_name": "bob", "real_name": "Bob Smith"}}]
//!
//! // channels.json
//! [{"id": "C1", "name": "general", "is_archived": false}]
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::archive::ArchiveSource;
use crate::error::{Result, SlackpackError};

/// A workspace member, as far as rendering is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Workspace-unique identifier, e.g. `U024BE7LH`.
    pub id: String,
    /// Display name, then real name, then the raw id.
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: String,
    #[serde(default)]
    profile: RawProfile,
}

#[derive(Debug, Default, Deserialize)]
struct RawProfile {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    real_name: Option<String>,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        let display_name = [raw.profile.display_name, raw.profile.real_name]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| raw.id.clone());
        Self {
            id: raw.id,
            display_name,
        }
    }
}

/// Identifier → [`User`] lookup, built once per export and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTable {
    users: HashMap<String, User>,
}

impl UserTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user with this identifier, if known.
    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    /// Returns the display name for `id`, or `id` itself when unknown.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.users.get(id).map_or(id, |u| u.display_name.as_str())
    }

    /// Number of users in the table.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no users are loaded.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterates over all users in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }
}

impl FromIterator<User> for UserTable {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }
}

/// A channel of the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel identifier, e.g. `C024BE91L`.
    pub id: String,
    /// Channel name; also the name of its folder in the export.
    pub name: String,
    /// Whether the channel was archived at export time.
    #[serde(default)]
    pub is_archived: bool,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Parses the content of `users.json`.
pub fn parse_users(content: &str) -> Result<UserTable> {
    let raw: Vec<RawUser> =
        serde_json::from_str(content).map_err(|e| SlackpackError::parse("users.json", None, e))?;
    Ok(raw.into_iter().map(User::from).collect())
}

/// Parses the content of `channels.json`.
pub fn parse_channels(content: &str) -> Result<Vec<Channel>> {
    serde_json::from_str(content).map_err(|e| SlackpackError::parse("channels.json", None, e))
}

/// Loads the user table from `users.json`.
pub fn load_users<S: ArchiveSource + ?Sized>(source: &S) -> Result<UserTable> {
    let users = parse_users(&source.read_text("users.json")?)?;
    debug!(count = users.len(), "loaded users");
    Ok(users)
}

/// Loads the channel list from `channels.json`, in file order.
pub fn load_channels<S: ArchiveSource + ?Sized>(source: &S) -> Result<Vec<Channel>> {
    let channels = parse_channels(&source.read_text("channels.json")?)?;
    debug!(count = channels.len(), "loaded channels");
    Ok(channels)
}

/// Finds a channel by name, ignoring case. The first match wins.
pub fn find_channel<'a>(channels: &'a [Channel], name: &str) -> Option<&'a Channel> {
    let wanted = name.to_lowercase();
    channels.iter().find(|c| c.name.to_lowercase() == wanted)
}
