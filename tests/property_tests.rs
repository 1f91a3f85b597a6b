//! Property-based tests for unilog using proptest

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::Value;
use unilog::appenders::error_file_name;
use unilog::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// LogLevel string conversions roundtrip, in any letter case
    #[test]
    fn test_log_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let text = if lower { level.to_str().to_lowercase() } else { level.to_str().to_string() };
        let parsed: LogLevel = text.parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(LogLevel::parse_or_default(&text), level);
    }

    /// Ordering agrees with the numeric discriminants
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1.passes(level2), val1 >= val2);
    }

    /// Anything that isn't a level name means INFO
    #[test]
    fn test_unknown_level_defaults_to_info(text in "[a-z]{6,12}") {
        prop_assume!(text != "warning");
        prop_assert!(text.parse::<LogLevel>().is_err());
        prop_assert_eq!(LogLevel::parse_or_default(&text), LogLevel::Info);
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

fn field_key() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}"
}

fn field_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<String>().prop_map(FieldValue::String),
        any::<i64>().prop_map(FieldValue::Int),
        (-1.0e12f64..1.0e12).prop_map(FieldValue::Float),
    ]
}

proptest! {
    /// Any message and field set renders as exactly one parseable JSON line
    #[test]
    fn test_render_is_single_json_line(
        level in any_level(),
        message in any::<String>(),
        line in any::<u32>(),
        fields in prop::collection::btree_map(field_key(), field_value(), 0..6),
    ) {
        let event = LogEvent::new(level, message.clone())
            .with_timestamp(Utc.with_ymd_and_hms(2025, 1, 22, 12, 0, 0).unwrap())
            .with_line(line)
            .with_fields(fields.clone().into_iter().collect());

        let bytes = JsonFormatter::named("prop").render(&event).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        prop_assert!(text.ends_with('\n'));
        prop_assert_eq!(text.matches('\n').count(), 1);

        let parsed: Value = serde_json::from_str(text.trim_end()).unwrap();
        prop_assert_eq!(parsed["msg"].as_str().unwrap(), message.as_str());
        prop_assert_eq!(parsed["level"].as_str().unwrap(), level.to_str());
        prop_assert_eq!(parsed["line"].as_u64().unwrap(), u64::from(line));
        prop_assert_eq!(parsed["logger"].as_str().unwrap(), "prop");

        for (key, value) in &fields {
            let reserved = matches!(key.as_str(), "time" | "level" | "logger" | "line" | "msg");
            let rendered_key = if reserved { format!("fields.{}", key) } else { key.clone() };
            let rendered = &parsed[rendered_key.as_str()];
            match value {
                FieldValue::String(s) => prop_assert_eq!(rendered.as_str().unwrap(), s.as_str()),
                FieldValue::Int(i) => prop_assert_eq!(rendered.as_i64().unwrap(), *i),
                FieldValue::Float(f) => prop_assert!((rendered.as_f64().unwrap() - f).abs() <= f.abs() * 1e-12),
                _ => unreachable!(),
            }
        }
    }

    /// Anonymous formatters never write a `logger` key
    #[test]
    fn test_anonymous_render_has_no_logger_key(message in ".*") {
        let bytes = JsonFormatter::new().render(&LogEvent::new(LogLevel::Info, message)).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        prop_assert!(parsed.get("logger").is_none());
    }
}

// ============================================================================
// Error File Name Tests
// ============================================================================

proptest! {
    /// `stem.ext` becomes `stem_error.ext`
    #[test]
    fn test_error_file_name_keeps_extension(stem in "[a-z][a-z0-9_.]{0,10}", ext in "[a-z]{1,4}") {
        let name = format!("{}.{}", stem, ext);
        prop_assert_eq!(error_file_name(&name), format!("{}_error.{}", stem, ext));
    }

    /// Names without an extension get the suffix appended
    #[test]
    fn test_error_file_name_without_extension(name in "[a-z][a-z0-9_]{0,12}") {
        prop_assert_eq!(error_file_name(&name), format!("{}_error", name));
    }
}
