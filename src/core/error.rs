//! Error types for the logging subsystem

use std::sync::Arc;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Log directory or file could not be created/opened at construction time
    #[error("Configuration error for '{path}': {message}")]
    Configuration {
        path: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A structured field could not be serialized
    #[error("Encoding error for field '{field}': {message}")]
    Encoding { field: String, message: String },

    /// I/O failure while appending or flushing
    #[error("Write error for '{path}': {message}")]
    Write {
        path: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    /// Lookup of a logger that was never initialized and no default exists
    #[error("Logger '{name}' is not initialized and no default logger is configured")]
    NotInitialized { name: String },

    /// Unrecognized level string
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// The one-time default logger construction failed; replayed to every caller
    #[error("Default logger initialization failed: {0}")]
    DefaultInitFailed(#[source] Arc<LoggerError>),

    /// JSON error (configuration parsing)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LoggerError {
    /// Create a configuration error for an unusable path
    pub fn config(
        path: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::Configuration {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(field: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Encoding {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a write error with the failing path
    pub fn write(
        path: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::Write {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a file rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn not_initialized(name: impl Into<String>) -> Self {
        LoggerError::NotInitialized { name: name.into() }
    }

    /// Whether this error was produced while setting a logger up (as opposed to per-event)
    pub fn is_configuration(&self) -> bool {
        match self {
            LoggerError::Configuration { .. }
            | LoggerError::InvalidConfiguration { .. }
            | LoggerError::Json(_) => true,
            LoggerError::DefaultInitFailed(inner) => inner.is_configuration(),
            _ => false,
        }
    }
}
