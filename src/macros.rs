//! Logging macros for formatted messages.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The call-site line
//! lands in the `line` key of the JSON output.
//!
//! # Examples
//!
//! ```
//! use unilog::prelude::*;
//! use unilog::info;
//!
//! let logger = Logger::discard();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a formatted message at an explicit level.
///
/// # Examples
///
/// ```
/// # use unilog::prelude::*;
/// # let logger = Logger::discard();
/// use unilog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// ```
/// # use unilog::prelude::*;
/// # let logger = Logger::discard();
/// use unilog::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// # use unilog::prelude::*;
/// # let logger = Logger::discard();
/// use unilog::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use unilog::prelude::*;
/// # let logger = Logger::discard();
/// use unilog::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use unilog::prelude::*;
/// # let logger = Logger::discard();
/// use unilog::error;
/// error!(logger, "Health check failed: {}", "timeout");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Only logs; it does not exit the process.
///
/// ```
/// # use unilog::prelude::*;
/// # let logger = Logger::discard();
/// use unilog::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger, LoggerConfig};
    use std::fs;
    use tempfile::tempdir;

    fn read_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_macros_format_and_filter() {
        let dir = tempdir().unwrap();
        let config = LoggerConfig::named("macros")
            .with_directory(dir.path())
            .with_level(LogLevel::Info);
        let logger = Logger::from_config(&config).unwrap();

        debug!(logger, "hidden {}", 1);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        fatal!(logger, "Critical failure: {}", "system");
        log!(logger, LogLevel::Info, "plain");

        let lines = read_lines(&dir.path().join("macros.log"));
        let messages: Vec<&str> = lines.iter().map(|l| l["msg"].as_str().unwrap()).collect();
        assert_eq!(
            messages,
            vec!["Items: 100", "Retry 1 of 3", "Code: 500", "Critical failure: system", "plain"]
        );
    }

    #[test]
    fn test_macro_records_invocation_line() {
        let dir = tempdir().unwrap();
        let config = LoggerConfig::named("lines").with_directory(dir.path());
        let logger = Logger::from_config(&config).unwrap();

        let expected = line!() + 1;
        info!(logger, "where am I? {}", "here");

        let lines = read_lines(&dir.path().join("lines.log"));
        assert_eq!(lines[0]["line"], expected);
    }
}
