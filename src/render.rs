//! HTML rendering of threaded messages.
//!
//! Each root message becomes one self-contained HTML fragment:
//!
//! ```text
//! <div ...><span ...>Alice</span> 15 Jan 10:30</div>hi Bob
//! <br/>second line<div style='margin-left: 15px'><div style='margin-top: 5px'>...reply...</div></div>
//! ```
//!
//! Rendering is a pure function of the message, the user table and the
//! [`RenderConfig`]; the same input always yields the same bytes.
//!
//! # Example
//!
//! ```
//! use slackpack::config::RenderConfig;
//! use slackpack::message::local_time;
//! use slackpack::metadata::{User, UserTable};
//! use slackpack::render::render_html;
//! use slackpack::Message;
//!
//! let users: UserTable = vec![User { id: "U1".into(), display_name: "Bob".into() }]
//!     .into_iter()
//!     .collect();
//! let msg = Message::new("Bob", local_time(100.0), "hi <@U1>");
//!
//! let html = render_html(&msg, &users, &RenderConfig::default());
//! assert!(html.contains("hi Bob"));
//! ```

use std::borrow::Cow;
use std::fmt::Write;
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::{Captures, Regex};

use crate::Message;
use crate::config::{DEFAULT_DATE_FORMAT, RenderConfig};
use crate::metadata::UserTable;

/// `<@U024BE7LH>`; labelled forms such as `<@U1|bob>` are not matched.
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@([^<>|\s]+)>").expect("mention pattern is valid"));

/// Replaces `<@USERID>` tokens of known users with their display names.
///
/// Tokens for identifiers missing from `users` are left untouched.
pub fn substitute_mentions<'t>(text: &'t str, users: &UserTable) -> Cow<'t, str> {
    MENTION.replace_all(text, |caps: &Captures<'_>| match users.get(&caps[1]) {
        Some(user) => user.display_name.clone(),
        None => caps[0].to_string(),
    })
}

/// Formats a timestamp, falling back to the default pattern if `pattern`
/// contains an unknown specifier.
fn format_date(timestamp: &DateTime<Local>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", timestamp.format(DEFAULT_DATE_FORMAT));
    }
    out
}

/// Renders a message body: mentions substituted, newlines turned into `<br/>`.
pub fn render_body(text: &str, users: &UserTable) -> String {
    substitute_mentions(text, users).replace('\n', "\n<br/>")
}

/// Renders one message, and its replies nested below it, as HTML.
pub fn render_html(message: &Message, users: &UserTable, config: &RenderConfig) -> String {
    let mut out = format!(
        "<div style='font-size: smaller; margin-bottom: 1px'>\
         <span style='font-weight: bold; padding-right: 15px'>{}</span> {}</div>{}",
        message.author(),
        format_date(&message.timestamp, &config.date_format),
        render_body(message.text(), users),
    );

    if message.has_replies() {
        out.push_str(&format!(
            "<div style='margin-left: {}px'>",
            config.reply_indent_px
        ));
        for reply in message.replies() {
            out.push_str("<div style='margin-top: 5px'>");
            out.push_str(&render_html(reply, users, config));
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }

    out
}

/// Renders every message in order.
pub fn render_all(messages: &[Message], users: &UserTable, config: &RenderConfig) -> Vec<String> {
    messages
        .iter()
        .map(|m| render_html(m, users, config))
        .collect()
}
