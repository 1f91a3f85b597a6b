//! Log event structure

use super::fields::LogFields;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};

/// A single log event, immutable once handed to a logger
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Call-site line, 0 when unknown
    pub line: u32,
    pub fields: LogFields,
}

impl LogEvent {
    /// Create an event stamped with the current time
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            line: 0,
            fields: LogFields::new(),
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: LogFields) -> Self {
        self.fields = fields;
        self
    }
}
