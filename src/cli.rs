//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options
//!
//! The binary plays the part of the request adapter: it supplies the export
//! and a channel name, and writes out whatever the library renders.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_DATE_FORMAT, RenderConfig};

/// Render one channel of a Slack export as threaded HTML.
#[derive(Parser, Debug, Clone)]
#[command(name = "slackpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    slackpack export.zip general
    slackpack export.zip General -o general.html
    slackpack ./export-dir random --format text
    slackpack export.zip --list-channels")]
pub struct Args {
    /// Path to the export (.zip file or extracted directory)
    pub input: String,

    /// Channel to render (case-insensitive)
    #[arg(required_unless_present = "list_channels")]
    pub channel: Option<String>,

    /// Path to output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (default: from the output extension, else json)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// List the channels of the export and exit
    #[arg(long)]
    pub list_channels: bool,

    /// strftime pattern for message timestamps
    #[arg(long, value_name = "PATTERN", default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    /// Reply indentation in pixels
    #[arg(long, value_name = "PX", default_value_t = 15)]
    pub indent: u32,

    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds the render configuration from the flags.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new()
            .with_date_format(self.date_format.clone())
            .with_reply_indent(self.indent)
    }

    /// Picks the output format: explicit flag, then output extension, then JSON.
    pub fn resolve_format(&self) -> crate::format::OutputFormat {
        if let Some(format) = self.format {
            return format.into();
        }
        self.output
            .as_deref()
            .and_then(|path| crate::format::OutputFormat::from_path(path).ok())
            .unwrap_or_default()
    }
}

/// Output format options.
///
/// - [`Json`](OutputFormat::Json) - array of HTML fragments, one per thread
/// - [`Html`](OutputFormat::Html) - standalone page
/// - [`Text`](OutputFormat::Text) - one line per message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array of HTML fragments
    #[default]
    Json,

    /// Standalone HTML document
    #[value(alias = "htm")]
    Html,

    /// Plain text summary
    #[value(alias = "txt")]
    Text,
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

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Html => crate::format::OutputFormat::Html,
            OutputFormat::Text => crate::format::OutputFormat::Text,
        }
    }
}
