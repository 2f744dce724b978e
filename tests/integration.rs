//! Integration tests for slackpack.
//!
//! These tests build small exports in memory (zip) and on disk (directory)
//! and run the complete pipeline through the public API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//! ```

use std::fs;
use std::io::{Cursor, Write};

use slackpack::prelude::*;
use slackpack::message::local_time;
use slackpack::thread::sort_by_date;
use tempfile::{TempDir, tempdir};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

// ============================================================================
// Fixtures
// ============================================================================

const USERS: &str = r#"[
  {"id": "U1", "name": "bob", "profile": {"display_name": "Bob", "real_name": "Robert Smith"}},
  {"id": "U2", "name": "alice", "profile": {"display_name": "", "real_name": "Alice Jones"}},
  {"id": "U3", "name": "carol"}
]"#;

const CHANNELS: &str = r#"[
  {"id": "C1", "name": "general", "is_archived": false},
  {"id": "C2", "name": "random", "is_archived": true}
]"#;

fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Export with the standard users and channels plus the given day files.
fn export_zip(days: &[(&str, &str)]) -> Vec<u8> {
    let mut files = vec![("users.json", USERS), ("channels.json", CHANNELS)];
    files.extend_from_slice(days);
    zip_bytes(&files)
}

fn export_dir(days: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("users.json"), USERS).unwrap();
    fs::write(dir.path().join("channels.json"), CHANNELS).unwrap();
    for (name, content) in days {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn header(author: &str, ts: f64) -> String {
    format!(
        "<div style='font-size: smaller; margin-bottom: 1px'>\
         <span style='font-weight: bold; padding-right: 15px'>{}</span> {}</div>",
        author,
        local_time(ts).format("%-d %b %H:%M")
    )
}

// ============================================================================
// End-to-end rendering
// ============================================================================

#[test]
fn test_single_message_with_mention() {
    let bytes = export_zip(&[(
        "general/2024-01-15.json",
        r#"[{"type": "message", "text": "hi <@U1>", "ts": "100.0", "user": "U1"}]"#,
    )]);

    let rendered = render_channel_from_bytes(bytes, "general").unwrap();

    assert_eq!(rendered, vec![format!("{}hi Bob", header("Bob", 100.0))]);
}

#[test]
fn test_channel_name_is_case_insensitive() {
    let bytes = export_zip(&[(
        "general/2024-01-15.json",
        r#"[{"text": "hello", "ts": "100.0", "user": "U2"}]"#,
    )]);

    let rendered = render_channel_from_bytes(bytes, "GeNeRaL").unwrap();
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains(">Alice Jones</span>"));
}

#[test]
fn test_thread_rendered_with_nested_replies() {
    let bytes = export_zip(&[(
        "general/2024-01-15.json",
        r#"[
          {"text": "question", "ts": "1.0", "thread_ts": "1.0", "user": "U1"},
          {"text": "answer one", "ts": "2.0", "thread_ts": "1.0", "user": "U2"},
          {"text": "answer two", "ts": "3.0", "thread_ts": "1.0", "user": "U1"}
        ]"#,
    )]);

    let rendered = render_channel_from_bytes(bytes, "general").unwrap();

    let expected = format!(
        "{}question<div style='margin-left: 15px'>\
         <div style='margin-top: 5px'>{}answer one</div>\
         <div style='margin-top: 5px'>{}answer two</div></div>",
        header("Bob", 1.0),
        header("Alice Jones", 2.0),
        header("Bob", 3.0),
    );
    assert_eq!(rendered, vec![expected]);
}

#[test]
fn test_roots_sorted_across_day_files() {
    let bytes = export_zip(&[
        ("general/2024-01-03.json", r#"[{"text": "three", "ts": "3.0", "user": "U1"}]"#),
        (
            "general/2024-01-01.json",
            r#"[{"text": "one", "ts": "1.0", "user": "U1"}, {"text": "two", "ts": "2.0", "user": "U1"}]"#,
        ),
    ]);

    let reader = ExportReader::from_zip_bytes(bytes).unwrap();
    let messages = reader.read_channel("general").unwrap();
    let texts: Vec<_> = messages.iter().map(Message::text).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[test]
fn test_sort_is_by_date_not_encounter() {
    let bytes = export_zip(&[(
        "general/2024-01-01.json",
        r#"[
          {"text": "c", "ts": "3.0", "user": "U1"},
          {"text": "a", "ts": "1.0", "user": "U1"},
          {"text": "b", "ts": "2.0", "user": "U1"}
        ]"#,
    )]);

    let reader = ExportReader::from_zip_bytes(bytes).unwrap();
    let channel = reader.find_channel("general").unwrap().clone();

    let unsorted = reader.read(&channel).unwrap();
    let texts: Vec<_> = unsorted.iter().map(Message::text).collect();
    assert_eq!(texts, vec!["c", "a", "b"]);

    let mut sorted = unsorted;
    sort_by_date(&mut sorted);
    let texts: Vec<_> = sorted.iter().map(Message::text).collect();
    assert_eq!(texts, vec!["a", "b", "c"]);
}

#[test]
fn test_replies_in_later_day_file() {
    let bytes = export_zip(&[
        (
            "general/2024-01-01.json",
            r#"[{"text": "root", "ts": "10.5", "thread_ts": "10.5", "user": "U1"}]"#,
        ),
        (
            "general/2024-01-02.json",
            r#"[{"text": "late reply", "ts": "90000.0", "thread_ts": "10.5", "user": "U3"}]"#,
        ),
    ]);

    let reader = ExportReader::from_zip_bytes(bytes).unwrap();
    let messages = reader.read_channel("general").unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].reply_count(), 1);
    // U3 has no profile: falls back to the identifier
    assert_eq!(messages[0].replies()[0].author(), "U3");
}

#[test]
fn test_system_records_are_dropped() {
    let bytes = export_zip(&[(
        "general/2024-01-01.json",
        r#"[
          {"subtype": "channel_join", "text": "<@U2> has joined", "ts": "1.0", "user": "U2"},
          {"text": "hello", "ts": "2.0", "user": "U1"},
          {"subtype": "bot_message", "text": "beep", "ts": "3.0"}
        ]"#,
    )]);

    let rendered = render_channel_from_bytes(bytes, "general").unwrap();
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].ends_with("hello"));
}

#[test]
fn test_whitespace_day_file_contributes_nothing() {
    let bytes = export_zip(&[
        ("general/2024-01-01.json", "  \n\t "),
        ("general/2024-01-02.json", r#"[{"text": "hi", "ts": "5.0", "user": "U1"}]"#),
    ]);

    let rendered = render_channel_from_bytes(bytes, "general").unwrap();
    assert_eq!(rendered.len(), 1);
}

#[test]
fn test_channel_without_folder_is_empty() {
    let bytes = export_zip(&[]);
    let rendered = render_channel_from_bytes(bytes, "random").unwrap();
    assert!(rendered.is_empty());
}

#[test]
fn test_unknown_mention_left_verbatim() {
    let bytes = export_zip(&[(
        "general/2024-01-01.json",
        r#"[{"text": "ping <@U999> and <@U1>", "ts": "1.0", "user": "U1"}]"#,
    )]);

    let rendered = render_channel_from_bytes(bytes, "general").unwrap();
    assert!(rendered[0].ends_with("ping <@U999> and Bob"));
}

#[test]
fn test_multiline_body() {
    let bytes = export_zip(&[(
        "general/2024-01-01.json",
        r#"[{"text": "line one\nline two", "ts": "1.0", "user": "U1"}]"#,
    )]);

    let rendered = render_channel_from_bytes(bytes, "general").unwrap();
    assert!(rendered[0].ends_with("line one\n<br/>line two"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_channel_not_found() {
    let bytes = export_zip(&[]);
    let err = render_channel_from_bytes(bytes, "nope").unwrap_err();
    assert!(err.is_channel_not_found());
    assert_eq!(err.to_string(), "Channel nope not found");
}

#[test]
fn test_orphan_replies_are_data_consistency_error() {
    let bytes = export_zip(&[(
        "general/2024-01-01.json",
        r#"[
          {"text": "reply a", "ts": "6.0", "thread_ts": "5.0", "user": "U1"},
          {"text": "reply b", "ts": "7.0", "thread_ts": "5.0", "user": "U2"}
        ]"#,
    )]);

    let err = render_channel_from_bytes(bytes, "general").unwrap_err();
    assert!(err.is_data_consistency());
    match err {
        SlackpackError::DataConsistency { thread_ts, roots } => {
            assert_eq!(thread_ts, 5.0);
            assert_eq!(roots, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_day_file_names_the_file() {
    let bytes = export_zip(&[
        ("general/2024-01-01.json", r#"[{"text": "fine", "ts": "1.0"}]"#),
        ("general/2024-01-02.json", r#"[{"text": "broken", "ts": }]"#),
    ]);

    let err = render_channel_from_bytes(bytes, "general").unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("general/2024-01-02.json"));
}

#[test]
fn test_missing_users_json() {
    let bytes = zip_bytes(&[("channels.json", CHANNELS)]);
    let err = render_channel_from_bytes(bytes, "general").unwrap_err();
    assert!(err.is_entry_not_found());
    assert!(err.to_string().contains("users.json"));
}

#[test]
fn test_not_a_zip() {
    let err = render_channel_from_bytes(b"definitely not a zip".to_vec(), "general").unwrap_err();
    assert!(matches!(err, SlackpackError::Archive(_)));
}

#[test]
fn test_entry_size_limit() {
    let day = r#"[{"text": "a fairly long message body", "ts": "1.0"}]"#;
    let bytes = export_zip(&[("general/2024-01-01.json", day)]);
    let source = ZipArchiveSource::with_config(bytes, ArchiveConfig::new().with_max_entry_size(16)).unwrap();

    let err = source.read_text("general/2024-01-01.json").unwrap_err();
    assert!(matches!(err, SlackpackError::EntryTooLarge { .. }));
}

// ============================================================================
// Backends
// ============================================================================

#[test]
fn test_directory_and_zip_render_identically() {
    let days = [
        (
            "general/2024-01-01.json",
            r#"[{"text": "root <@U2>", "ts": "1.0", "thread_ts": "1.0", "user": "U1"}]"#,
        ),
        (
            "general/2024-01-02.json",
            r#"[{"text": "reply", "ts": "2.0", "thread_ts": "1.0", "user": "U2"},
                {"text": "solo", "ts": "1.5", "user": "U3"}]"#,
        ),
    ];
    let config = RenderConfig::default();

    let from_zip = ExportReader::from_zip_bytes(export_zip(&days))
        .unwrap()
        .render_channel("general", &config)
        .unwrap();

    let dir = export_dir(&days);
    let from_dir = ExportReader::open(dir.path())
        .unwrap()
        .render_channel("general", &config)
        .unwrap();

    assert_eq!(from_zip, from_dir);
    assert_eq!(from_zip.len(), 2);
}

#[test]
fn test_open_zip_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("export.zip");
    fs::write(
        &path,
        export_zip(&[("general/2024-01-01.json", r#"[{"text": "x", "ts": "1.0"}]"#)]),
    )
    .unwrap();

    let reader = ExportReader::open(&path).unwrap();
    assert_eq!(reader.channels().len(), 2);
    assert!(reader.channels()[1].is_archived);
    assert_eq!(reader.read_channel("general").unwrap().len(), 1);
}

#[test]
fn test_list_entries_matches_across_backends() {
    let days = [
        ("general/2024-01-02.json", "[]"),
        ("general/2024-01-01.json", "[]"),
        ("random/2024-01-01.json", "[]"),
    ];
    let zip = ZipArchiveSource::from_bytes(export_zip(&days)).unwrap();
    let dir = export_dir(&days);
    let directory = DirectorySource::new(dir.path()).unwrap();

    let expected = vec!["general/2024-01-01.json", "general/2024-01-02.json"];
    assert_eq!(zip.list_entries("general").unwrap(), expected);
    assert_eq!(directory.list_entries("general").unwrap(), expected);
}

#[test]
fn test_channel_name_cannot_leave_export_root() {
    let channels = r#"[{"id": "C9", "name": "../secret"}]"#;
    let outer = tempdir().unwrap();
    let root = outer.path().join("export");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(outer.path().join("secret")).unwrap();
    fs::write(root.join("users.json"), USERS).unwrap();
    fs::write(root.join("channels.json"), channels).unwrap();
    fs::write(
        outer.path().join("secret/2024-01-01.json"),
        r#"[{"text": "outside root", "ts": "1.0", "user": "U1"}]"#,
    )
    .unwrap();

    let config = RenderConfig::default();
    let from_dir = ExportReader::open(&root)
        .unwrap()
        .render_channel("../secret", &config)
        .unwrap();
    let zipped = zip_bytes(&[("users.json", USERS), ("channels.json", channels)]);
    let from_zip = ExportReader::from_zip_bytes(zipped)
        .unwrap()
        .render_channel("../secret", &config)
        .unwrap();

    assert_eq!(from_dir, from_zip);
    assert!(from_dir.is_empty());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_custom_render_config() {
    let bytes = export_zip(&[(
        "general/2024-01-01.json",
        r#"[{"text": "r", "ts": "1.0", "thread_ts": "1.0", "user": "U1"},
            {"text": "s", "ts": "2.0", "thread_ts": "1.0", "user": "U1"}]"#,
    )]);
    let config = RenderConfig::new().with_date_format("%Y").with_reply_indent(40);

    let rendered = ExportReader::from_zip_bytes(bytes)
        .unwrap()
        .render_channel("general", &config)
        .unwrap();

    assert!(rendered[0].contains("margin-left: 40px"));
    assert!(rendered[0].contains(&format!("</span> {}</div>", local_time(1.0).format("%Y"))));
}

#[test]
fn test_json_output_round_trips_as_string_array() {
    let bytes = export_zip(&[(
        "general/2024-01-01.json",
        r#"[{"text": "quote \" and <b>", "ts": "1.0", "user": "U1"}]"#,
    )]);
    let reader = ExportReader::from_zip_bytes(bytes).unwrap();
    let messages = reader.read_channel("general").unwrap();

    let json = to_format(&messages, reader.users(), OutputFormat::Json, &RenderConfig::default()).unwrap();
    let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, reader.render_channel("general", &RenderConfig::default()).unwrap());
}
