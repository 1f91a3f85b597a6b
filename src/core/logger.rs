//! Main logger implementation

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    fields::LogFields,
    formatter::JsonFormatter,
    log_event::LogEvent,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::{DiscardSink, Sink},
};
use crate::appenders::error_mirror::ErrorMirror;
use crate::appenders::rotating_file::RotatingFileSink;
use parking_lot::Mutex;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Receives every per-event error (write, rotation, mirror, encoding)
///
/// Without a callback these go to stderr as `[LOGGER ERROR] ...` lines.
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// A level-gated JSON logger bound to one primary sink and an optional error mirror
///
/// Every logging method funnels into [`Logger::emit`]. Concurrent callers are serialized
/// on the primary sink, so lines never interleave and a rotation is never observed
/// half-done.
///
/// # Example
///
/// ```no_run
/// use unilog::{Logger, LoggerConfig, LogFields};
///
/// let logger = Logger::from_config(
///     &LoggerConfig::named("api").with_directory("/var/log/api").with_error_split(true),
/// ).unwrap();
///
/// logger.info("listening");
/// logger.error_with_fields("upstream failed", LogFields::new().with_field("status", 502));
/// ```
pub struct Logger {
    name: Option<String>,
    min_level: LogLevel,
    formatter: Arc<JsonFormatter>,
    sink: Mutex<Box<dyn Sink>>,
    mirror: Option<ErrorMirror>,
    metrics: LoggerMetrics,
    on_error: Option<ErrorCallback>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Open the configured files and build the logger
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config is invalid or a log file or its
    /// directory cannot be created.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        Ok(LoggerBuilder::from_config(config)?.build())
    }

    /// A logger that accepts everything and writes nothing
    #[must_use]
    pub fn discard() -> Self {
        LoggerBuilder::new().build()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.passes(self.min_level)
    }

    pub fn has_error_mirror(&self) -> bool {
        self.mirror.is_some()
    }

    pub fn formatter(&self) -> &Arc<JsonFormatter> {
        &self.formatter
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Emit an event, recording the caller's line
    ///
    /// Returns the primary sink's error, if any. Every error (including error-mirror
    /// failures, which are not returned) is also passed to the error callback and counted
    /// in [`LoggerMetrics`].
    #[track_caller]
    pub fn emit(&self, level: LogLevel, message: impl Into<String>, fields: LogFields) -> Result<()> {
        let line = Location::caller().line();
        self.emit_at(level, message, fields, line)
    }

    /// Emit an event with an explicit call-site line (0 = unknown)
    pub fn emit_at(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        fields: LogFields,
        line: u32,
    ) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }

        let event = LogEvent::new(level, message)
            .with_line(line)
            .with_fields(fields);
        self.dispatch(&event)
    }

    /// Write an already-built event, keeping its timestamp
    pub fn log_event(&self, event: &LogEvent) -> Result<()> {
        if !self.enabled(event.level) {
            return Ok(());
        }
        self.dispatch(event)
    }

    fn dispatch(&self, event: &LogEvent) -> Result<()> {
        let (line, encoding_error) = self.formatter.render_lossy(event);
        if let Some(e) = encoding_error {
            self.metrics.record_encoding_failure();
            self.report(&e);
        }

        let primary = self.sink.lock().append(&line);
        match primary {
            Ok(()) => {
                self.metrics.record_logged();
            }
            // The line reached the file; only the rotation that followed failed
            Err(ref e @ LoggerError::Rotation { .. }) => {
                self.metrics.record_logged();
                self.metrics.record_rotation_failure();
                self.report(e);
            }
            Err(ref e) => {
                self.metrics.record_write_failure();
                self.report(e);
            }
        }

        // Best effort: a mirror failure never touches the primary result
        if let Some(ref mirror) = self.mirror {
            match mirror.maybe_forward(event) {
                Ok(true) => {
                    self.metrics.record_mirrored();
                }
                Ok(false) => {}
                Err(e) => {
                    self.metrics.record_mirror_failure();
                    self.report(&e);
                }
            }
        }

        primary
    }

    fn report(&self, error: &LoggerError) {
        match self.on_error {
            Some(ref callback) => callback(error),
            None => eprintln!(
                "[LOGGER ERROR] {}: {}",
                self.name.as_deref().unwrap_or("default"),
                error
            ),
        }
    }

    /// Flush the primary sink and the error mirror
    pub fn flush(&self) -> Result<()> {
        let primary = self.sink.lock().flush();
        let mirror = match self.mirror {
            Some(ref mirror) => mirror.flush(),
            None => Ok(()),
        };
        primary.and(mirror)
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let _ = self.emit(level, message, LogFields::new());
    }

    /// Log with structured fields
    #[track_caller]
    pub fn log_with_fields(&self, level: LogLevel, message: impl Into<String>, fields: LogFields) {
        let _ = self.emit(level, message, fields);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    #[track_caller]
    pub fn debug_with_fields(&self, message: impl Into<String>, fields: LogFields) {
        self.log_with_fields(LogLevel::Debug, message, fields);
    }

    #[track_caller]
    pub fn info_with_fields(&self, message: impl Into<String>, fields: LogFields) {
        self.log_with_fields(LogLevel::Info, message, fields);
    }

    #[track_caller]
    pub fn warn_with_fields(&self, message: impl Into<String>, fields: LogFields) {
        self.log_with_fields(LogLevel::Warn, message, fields);
    }

    #[track_caller]
    pub fn error_with_fields(&self, message: impl Into<String>, fields: LogFields) {
        self.log_with_fields(LogLevel::Error, message, fields);
    }

    #[track_caller]
    pub fn fatal_with_fields(&self, message: impl Into<String>, fields: LogFields) {
        self.log_with_fields(LogLevel::Fatal, message, fields);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("error_mirror", &self.mirror.is_some())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Logger`]
///
/// Sinks default to discarding output, which makes the builder handy for wiring custom
/// sinks in tests.
pub struct LoggerBuilder {
    name: Option<String>,
    min_level: LogLevel,
    sink: Option<Box<dyn Sink>>,
    mirror_sink: Option<Box<dyn Sink>>,
    on_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            min_level: LogLevel::Info,
            sink: None,
            mirror_sink: None,
            on_error: None,
        }
    }

    /// Open the files described by `config` into a builder
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;

        let sink = RotatingFileSink::open(config.log_path(), config.rotation.clone())?;
        let mut builder = Self::new().min_level(config.level).sink(Box::new(sink));

        if let Some(ref name) = config.name {
            builder = builder.name(name.clone());
        }
        if let Some(error_path) = config.error_log_path() {
            let mirror = RotatingFileSink::open(error_path, config.rotation.clone())?;
            builder = builder.error_mirror(Box::new(mirror));
        }
        Ok(builder)
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Mirror ERROR and FATAL events into `sink`
    #[must_use]
    pub fn error_mirror(mut self, sink: Box<dyn Sink>) -> Self {
        self.mirror_sink = Some(sink);
        self
    }

    #[must_use]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    #[must_use]
    pub fn build(self) -> Logger {
        let formatter = Arc::new(match self.name {
            Some(ref name) => JsonFormatter::named(name.clone()),
            None => JsonFormatter::new(),
        });
        let mirror = self
            .mirror_sink
            .map(|sink| ErrorMirror::new(Arc::clone(&formatter), sink));

        Logger {
            name: self.name,
            min_level: self.min_level,
            formatter,
            sink: Mutex::new(self.sink.unwrap_or_else(|| Box::new(DiscardSink))),
            mirror,
            metrics: LoggerMetrics::new(),
            on_error: self.on_error,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
