//! Integration tests for the bracketed text encoder
//!
//! These tests verify:
//! - Full line layout: preamble, fields, message, terminator
//! - Column gating via structural keys
//! - Clone determinism and concurrent encoding
//! - Stack trace handling

use bracket_log::encoder::{
    bracket_time_formatter, plain_level_formatter, trimmed_caller_formatter, EncoderConfig,
    TextEncoder,
};
use bracket_log::{Entry, Field, FieldValue, LogLevel};
use chrono::{Local, TimeZone};
use std::sync::Arc;

fn sample_config() -> EncoderConfig {
    EncoderConfig {
        encode_time: Some(bracket_time_formatter("%Y-%m-%d %H:%M:%S")),
        encode_level: Some(plain_level_formatter(true, true)),
        encode_caller: Some(trimmed_caller_formatter()),
        ..EncoderConfig::default()
    }
}

fn sample_entry() -> Entry {
    let timestamp = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    Entry::new(LogLevel::Info, "server started")
        .with_timestamp(timestamp)
        .with_field(Field::new("port", 8080))
}

#[test]
fn test_full_line_layout() {
    let encoder = TextEncoder::new(Arc::new(sample_config()));
    let line = encoder.encode_entry(&sample_entry()).unwrap();
    let text = std::str::from_utf8(line.as_bytes()).unwrap();

    assert_eq!(
        text,
        "[2024-01-02 03:04:05][INFO] [port: 8080] - server started\n"
    );
}

#[test]
fn test_line_column_order() {
    let entry = sample_entry()
        .with_name("[gateway]")
        .with_caller("src/server/main.rs", 10);
    let encoder = TextEncoder::new(Arc::new(sample_config()));
    let line = encoder.encode_entry(&entry).unwrap();
    let text = std::str::from_utf8(line.as_bytes()).unwrap();

    let time_at = text.find("[2024-01-02 03:04:05]").unwrap();
    let level_at = text.find("[INFO]").unwrap();
    let name_at = text.find("[gateway]").unwrap();
    let caller_at = text.find(" main.rs:10").unwrap();
    let field_at = text.find("[port: 8080]").unwrap();
    let message_at = text.find(" - server started").unwrap();

    assert!(time_at < level_at);
    assert!(level_at < name_at);
    assert!(name_at < caller_at);
    assert!(caller_at < field_at);
    assert!(field_at < message_at);
    assert!(text.ends_with('\n'));
}

#[test]
fn test_zero_fields_no_stray_separator() {
    let entry = Entry::new(LogLevel::Info, "bare")
        .with_timestamp(Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    let encoder = TextEncoder::new(Arc::new(sample_config()));
    let line = encoder.encode_entry(&entry).unwrap();
    let text = std::str::from_utf8(line.as_bytes()).unwrap();

    assert_eq!(text, "[2024-01-02 03:04:05][INFO] - bare\n");
}

#[test]
fn test_disabled_message_key_omits_message_segment() {
    let config = EncoderConfig {
        message_key: String::new(),
        ..sample_config()
    };
    let encoder = TextEncoder::new(Arc::new(config));
    let line = encoder.encode_entry(&sample_entry()).unwrap();
    let text = std::str::from_utf8(line.as_bytes()).unwrap();

    assert_eq!(text, "[2024-01-02 03:04:05][INFO] [port: 8080]\n");
    assert!(!text.contains(" - "));
}

#[test]
fn test_disabled_time_and_level_keys() {
    let config = EncoderConfig {
        time_key: String::new(),
        level_key: String::new(),
        ..sample_config()
    };
    let encoder = TextEncoder::new(Arc::new(config));
    let line = encoder.encode_entry(&sample_entry()).unwrap();
    let text = std::str::from_utf8(line.as_bytes()).unwrap();

    assert_eq!(text, " [port: 8080] - server started\n");
}

#[test]
fn test_caller_skipped_when_undefined() {
    let encoder = TextEncoder::new(Arc::new(sample_config()));
    let line = encoder.encode_entry(&sample_entry()).unwrap();
    let text = std::str::from_utf8(line.as_bytes()).unwrap();
    assert!(!text.contains(".rs:"));
}

#[test]
fn test_custom_line_ending() {
    let config = EncoderConfig {
        line_ending: "\r\n".to_string(),
        ..sample_config()
    };
    let encoder = TextEncoder::new(Arc::new(config));
    let line = encoder.encode_entry(&sample_entry()).unwrap();
    assert!(line.as_bytes().ends_with(b"\r\n"));
}

#[test]
fn test_clone_determinism() {
    let base = TextEncoder::new(Arc::new(sample_config()));
    let entry = sample_entry().with_field(Field::new("attempt", 3u32));

    let first = base.clone().encode_entry(&entry).unwrap();
    let second = base.clone().encode_entry(&entry).unwrap();

    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_concurrent_encoding_against_shared_config() {
    let base = Arc::new(TextEncoder::new(Arc::new(sample_config())));
    let entry = Arc::new(
        sample_entry()
            .with_field(Field::new("worker", "pool"))
            .with_field(Field::new("attempt", 1)),
    );
    let expected = base.encode_entry(&entry).unwrap();
    let expected = expected.as_bytes().to_vec();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let base = Arc::clone(&base);
            let entry = Arc::clone(&entry);
            let expected = expected.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let line = base.clone().encode_entry(&entry).unwrap();
                    assert_eq!(line.as_bytes(), expected.as_slice());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_stack_trace_appended_after_message() {
    let entry = sample_entry().with_stack("0: handler\n1: runtime");
    let encoder = TextEncoder::new(Arc::new(sample_config()));
    let line = encoder.encode_entry(&entry).unwrap();
    let text = std::str::from_utf8(line.as_bytes()).unwrap();

    assert!(text.ends_with(" - server started\n0: handler\n1: runtime\n"));
}

#[test]
fn test_marshal_error_propagates_through_encode() {
    let entry = sample_entry().with_field(Field::object(
        "ctx",
        Arc::new(|_: &mut TextEncoder| -> bracket_log::Result<()> {
            Err(bracket_log::LoggerError::marshal("ctx", "unserializable"))
        }),
    ));
    let encoder = TextEncoder::new(Arc::new(sample_config()));
    let err = encoder.encode_entry(&entry).unwrap_err();
    assert!(err.to_string().contains("unserializable"));
}

#[test]
fn test_heterogeneous_fields_in_order() {
    let entry = Entry::new(LogLevel::Debug, "mixed")
        .with_timestamp(Local.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        .with_field(Field::new("flag", true))
        .with_field(Field::new("count", -3i32))
        .with_field(Field::new("ratio", 2.5f64))
        .with_field(Field::byte_string("raw", b"a\xFFb".to_vec()))
        .with_field(Field::binary("blob", vec![1u8, 2, 3]))
        .with_field(Field::array(
            "xs",
            vec![FieldValue::Int(1), FieldValue::Int(2)],
        ));
    let encoder = TextEncoder::new(Arc::new(sample_config()));
    let line = encoder.encode_entry(&entry).unwrap();
    let text = std::str::from_utf8(line.as_bytes()).unwrap();

    assert!(text.contains(
        "[flag: true], [count: -3], [ratio: 2.5], [raw: \"a\\ufffdb\"], [blob: AQID], [xs: [1, 2]]"
    ));
}
