//! # unilog
//!
//! Structured JSON-lines logging with size-based file rotation and a process-wide
//! registry of named loggers.
//!
//! ## Features
//!
//! - **One JSON object per line**: `time`, `level`, `logger`, `line`, `msg`, then fields
//! - **Rotation**: size-triggered, numbered backups with optional gzip and age pruning
//! - **Error mirror**: ERROR and FATAL events optionally copied to `<name>_error.<ext>`
//! - **Registry**: idempotent, thread-safe named loggers plus a lazily built default
//!
//! ## Quick start
//!
//! ```no_run
//! use unilog::prelude::*;
//! use unilog::info;
//!
//! let registry = LoggerRegistry::global();
//! let logger = registry.init_named("payments", "info", "logs").unwrap();
//!
//! info!(logger, "Application started");
//! logger.info_with_fields(
//!     "charge accepted",
//!     LogFields::new().with_field("amount", 1250).with_field("currency", "EUR"),
//! );
//! ```

pub mod appenders;
pub mod core;
pub mod healthcheck;
pub mod macros;
pub mod messages;

pub mod prelude {
    pub use crate::appenders::{RotatingFileSink, RotationPolicy};
    pub use crate::core::{
        DiscardSink, ErrorCallback, FieldValue, JsonFormatter, LogEvent, LogFields, LogLevel,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, LoggerRegistry, Result,
        Sink,
    };
}

pub use crate::appenders::{ErrorMirror, RotatingFileSink, RotationPolicy};
pub use crate::core::{
    DiscardSink, ErrorCallback, FieldValue, JsonFormatter, LogEvent, LogFields, LogLevel, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, LoggerRegistry, Result, Sink,
};
