//! Severity-based mirroring of ERROR and FATAL events into a second file
//!
//! The mirror file sits next to the primary one, named by inserting `_error` before the
//! extension: `app.log` -> `app_error.log`, `service` -> `service_error`.

use crate::core::error::Result;
use crate::core::formatter::JsonFormatter;
use crate::core::log_event::LogEvent;
use crate::core::log_level::LogLevel;
use crate::core::sink::Sink;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const ERROR_FILE_SUFFIX: &str = "_error";

/// Derive the error-mirror file name from the primary file name
///
/// ```
/// use unilog::appenders::error_file_name;
///
/// assert_eq!(error_file_name("service.log"), "service_error.log");
/// assert_eq!(error_file_name("service"), "service_error");
/// ```
pub fn error_file_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        // A leading dot marks a hidden file, not an extension
        Some(dot) if dot > 0 => format!(
            "{}{}{}",
            &file_name[..dot],
            ERROR_FILE_SUFFIX,
            &file_name[dot..]
        ),
        _ => format!("{}{}", file_name, ERROR_FILE_SUFFIX),
    }
}

/// Error-mirror path in the same directory as `primary`
pub fn error_path(primary: &Path) -> PathBuf {
    let file_name = primary
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    primary.with_file_name(error_file_name(&file_name))
}

/// Duplicates events at or above ERROR into a secondary sink
///
/// The mirror is best-effort: the logger writes the primary sink first and only reports
/// mirror failures, it never rolls the primary write back.
pub struct ErrorMirror {
    formatter: Arc<JsonFormatter>,
    sink: Mutex<Box<dyn Sink>>,
}

impl ErrorMirror {
    pub const THRESHOLD: LogLevel = LogLevel::Error;

    pub fn new(formatter: Arc<JsonFormatter>, sink: Box<dyn Sink>) -> Self {
        Self {
            formatter,
            sink: Mutex::new(sink),
        }
    }

    #[inline]
    pub fn accepts(&self, level: LogLevel) -> bool {
        level.passes(Self::THRESHOLD)
    }

    /// Re-render and forward `event` if it is severe enough; returns whether it was forwarded
    pub fn maybe_forward(&self, event: &LogEvent) -> Result<bool> {
        if !self.accepts(event.level) {
            return Ok(false);
        }

        // Encoding problems were already reported on the primary path
        let (line, _) = self.formatter.render_lossy(event);
        self.sink.lock().append(&line)?;
        Ok(true)
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }
}

impl std::fmt::Debug for ErrorMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorMirror")
            .field("threshold", &Self::THRESHOLD)
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}
