//! JSON-lines formatter
//!
//! Renders a [`LogEvent`] as a single JSON object terminated by `\n`:
//!
//! ```text
//! {"time":"2025-01-22T12:00:00.000000000Z","level":"INFO","logger":"example_logger","line":34,"msg":"Application started"}
//! ```
//!
//! `time`, `level`, `logger` (named loggers only), `line` and `msg` come first, followed by
//! the structured fields in key order. Integers and floats are written as JSON numbers;
//! every other field value is written as a JSON string of its text representation.

use super::error::{LoggerError, Result};
use super::fields::FieldValue;
use super::log_event::LogEvent;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;

/// Substituted for field values that cannot be represented in JSON
pub const PLACEHOLDER: &str = "<unencodable>";

const RESERVED_KEYS: [&str; 5] = ["time", "level", "logger", "line", "msg"];

/// Stateless JSON-lines formatter, shared between a logger and its error mirror
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonFormatter {
    logger_name: Option<String>,
}

impl JsonFormatter {
    /// Formatter for an anonymous logger (no `logger` key)
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatter that stamps every line with `"logger":"<name>"`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            logger_name: Some(name.into()),
        }
    }

    pub fn logger_name(&self) -> Option<&str> {
        self.logger_name.as_deref()
    }

    /// Render an event, failing if any field value cannot be encoded
    pub fn render(&self, event: &LogEvent) -> Result<Vec<u8>> {
        self.build(event, true).map(|(line, _)| line)
    }

    /// Render an event, replacing unencodable field values with [`PLACEHOLDER`]
    ///
    /// Returns the first encoding error alongside the line so callers can report it.
    pub fn render_lossy(&self, event: &LogEvent) -> (Vec<u8>, Option<LoggerError>) {
        match self.build(event, false) {
            Ok(rendered) => rendered,
            // build() only fails in strict mode
            Err(e) => (Vec::new(), Some(e)),
        }
    }

    fn build(&self, event: &LogEvent, strict: bool) -> Result<(Vec<u8>, Option<LoggerError>)> {
        let mut out = String::with_capacity(128 + event.message.len());
        let mut first_error = None;

        out.push_str("{\"time\":\"");
        out.push_str(&format_timestamp(&event.timestamp));
        out.push_str("\",\"level\":\"");
        out.push_str(event.level.to_str());
        out.push('"');

        if let Some(ref name) = self.logger_name {
            out.push_str(",\"logger\":");
            push_json_string(&mut out, name);
        }

        let _ = write!(out, ",\"line\":{}", event.line);
        out.push_str(",\"msg\":");
        push_json_string(&mut out, &event.message);

        for (key, value) in event.fields.iter() {
            out.push(',');
            if RESERVED_KEYS.contains(&key.as_str()) {
                push_json_string(&mut out, &format!("fields.{}", key));
            } else {
                push_json_string(&mut out, key);
            }
            out.push(':');

            match encode_value(key, value) {
                Ok(encoded) => out.push_str(&encoded),
                Err(e) if strict => return Err(e),
                Err(e) => {
                    first_error.get_or_insert(e);
                    push_json_string(&mut out, PLACEHOLDER);
                }
            }
        }

        out.push_str("}\n");
        Ok((out.into_bytes(), first_error))
    }
}

/// RFC 3339 with nanosecond precision, always UTC with a `Z` suffix
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn push_json_string(out: &mut String, s: &str) {
    out.push_str(&serde_json::Value::from(s).to_string());
}

fn json_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn encode_value(key: &str, value: &FieldValue) -> Result<String> {
    match value {
        FieldValue::Int(i) => Ok(i.to_string()),
        FieldValue::UInt(u) => Ok(u.to_string()),
        FieldValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(|n| n.to_string())
            .ok_or_else(|| LoggerError::encoding(key, format!("{} is not a finite number", f))),
        FieldValue::String(s) => Ok(json_string(s)),
        FieldValue::Bool(b) => Ok(json_string(if *b { "true" } else { "false" })),
        FieldValue::Map(_) => {
            if value.is_encodable() {
                Ok(json_string(&value.to_string()))
            } else {
                Err(LoggerError::encoding(key, "nested map holds a non-finite number"))
            }
        }
    }
}
