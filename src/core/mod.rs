//! Core logger types and traits

pub mod config;
pub mod error;
pub mod fields;
pub mod formatter;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod sink;

pub use config::{LoggerConfig, DEFAULT_DIRECTORY, DEFAULT_FILE_NAME};
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, LogFields};
pub use formatter::{format_timestamp, JsonFormatter, PLACEHOLDER};
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use logger::{ErrorCallback, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use registry::LoggerRegistry;
pub use sink::{DiscardSink, Sink};
