//! Output formats for rendered channels.
//!
//! - [`Json`](OutputFormat::Json) - a JSON array of HTML fragments, one per thread
//! - [`Html`](OutputFormat::Html) - a standalone HTML page
//! - [`Text`](OutputFormat::Text) - one summary line per message, replies indented
//!
//! # Example
//!
//! ```rust
//! use slackpack::config::RenderConfig;
//! use slackpack::format::{OutputFormat, to_format};
//! use slackpack::message::local_time;
//! use slackpack::metadata::UserTable;
//! use slackpack::Message;
//!
//! let messages = vec![Message::new("Alice", local_time(0.0), "Hello!")];
//! let json = to_format(&messages, &UserTable::new(), OutputFormat::Json, &RenderConfig::default())?;
//! assert!(json.starts_with('['));
//!
//! let format = OutputFormat::from_path("out.html")?;
//! assert_eq!(format, OutputFormat::Html);
//! # Ok::<(), slackpack::SlackpackError>(())
//! ```

use std::fs;

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::config::RenderConfig;
use crate::error::{Result, SlackpackError};
use crate::metadata::UserTable;
use crate::render::render_all;

/// Output format for a rendered channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// JSON array of HTML fragments (default)
    #[default]
    Json,

    /// Standalone HTML document
    Html,

    /// Plain text, one line per message
    Text,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::Text => "txt",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["json", "html", "htm", "text", "txt"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Json, OutputFormat::Html, OutputFormat::Text]
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Html => "text/html",
            OutputFormat::Text => "text/plain",
        }
    }

    /// Detects format from a file path based on extension.
    pub fn from_path(path: &str) -> Result<Self> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();

        match ext.as_str() {
            "json" => Ok(OutputFormat::Json),
            "html" | "htm" => Ok(OutputFormat::Html),
            "txt" | "text" => Ok(OutputFormat::Text),
            _ => Err(SlackpackError::invalid_format(
                "output",
                format!(
                    "Unknown file extension: '.{}'. Expected one of: json, html, txt",
                    ext
                ),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Html => write!(f, "HTML"),
            OutputFormat::Text => write!(f, "Text"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "html" | "htm" => Ok(OutputFormat::Html),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Wraps rendered fragments into a complete HTML page.
pub fn to_html_document(fragments: &[String]) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset='utf-8'>\n<title>Conversation</title>\n</head>\n<body>\n",
    );
    for fragment in fragments {
        out.push_str("<div class='message' style='margin-bottom: 10px'>");
        out.push_str(fragment);
        out.push_str("</div>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// One [`Display`](std::fmt::Display) line per message; replies indented by two spaces.
pub fn to_text(messages: &[Message]) -> String {
    let mut out = String::new();
    for msg in messages {
        out.push_str(&format!("{msg}\n"));
        for reply in msg.replies() {
            out.push_str(&format!("  {reply}\n"));
        }
    }
    out
}

/// Converts messages to a string in the given format.
pub fn to_format(
    messages: &[Message],
    users: &UserTable,
    format: OutputFormat,
    config: &RenderConfig,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&render_all(messages, users, config))?),
        OutputFormat::Html => Ok(to_html_document(&render_all(messages, users, config))),
        OutputFormat::Text => Ok(to_text(messages)),
    }
}

/// Writes messages to a file in the given format.
pub fn write_to_format(
    messages: &[Message],
    users: &UserTable,
    output_path: &str,
    format: OutputFormat,
    config: &RenderConfig,
) -> Result<()> {
    let content = to_format(messages, users, format, config)?;
    fs::write(output_path, content)?;
    Ok(())
}
