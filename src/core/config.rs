//! Logger configuration
//!
//! A [`LoggerConfig`] is supplied once when a logger is created and never changes
//! afterward. It can be built in code or read from JSON:
//!
//! ```
//! use unilog::{LoggerConfig, LogLevel};
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "name": "payments",
//!     "level": "warn",
//!     "directory": "/var/log/payments",
//!     "rotation": { "max_size": 1048576, "max_backups": 3, "compress": true },
//!     "error_split": true
//! }"#).unwrap();
//!
//! assert_eq!(config.level, LogLevel::Warn);
//! assert_eq!(config.file_name, "payments.log");
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use crate::appenders::error_mirror::error_path;
use crate::appenders::rotating_file::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DIRECTORY: &str = "logs";
pub const DEFAULT_FILE_NAME: &str = "app.log";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLoggerConfig")]
pub struct LoggerConfig {
    /// Registry key and value of the `logger` key; `None` for an anonymous logger
    pub name: Option<String>,
    /// Events below this level are dropped
    pub level: LogLevel,
    /// Created on first use if missing
    pub directory: PathBuf,
    pub file_name: String,
    pub rotation: RotationPolicy,
    /// Mirror ERROR and FATAL events into `<stem>_error.<ext>`
    pub error_split: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: None,
            level: LogLevel::Info,
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            file_name: DEFAULT_FILE_NAME.to_string(),
            rotation: RotationPolicy::default(),
            error_split: false,
        }
    }
}

impl LoggerConfig {
    /// Anonymous logger writing to `logs/app.log`
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Named logger writing to `logs/<name>.log`
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            file_name: format!("{}.log", name),
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the level from text; unrecognized values mean `info`
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_level_str(mut self, level: &str) -> Self {
        self.level = LogLevel::parse_or_default(level);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_error_split(mut self, enabled: bool) -> Self {
        self.error_split = enabled;
        self
    }

    /// Check the invariants file I/O can't catch
    pub fn validate(&self) -> Result<()> {
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err(LoggerError::invalid_config(
                    "LoggerConfig",
                    "logger name must not be empty",
                ));
            }
        }

        let file_name = Path::new(&self.file_name);
        if self.file_name.is_empty() || file_name.file_name() != Some(file_name.as_os_str()) {
            return Err(LoggerError::invalid_config(
                "LoggerConfig",
                format!("'{}' is not a plain file name", self.file_name),
            ));
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    /// Path of the error mirror, when error splitting is enabled
    pub fn error_log_path(&self) -> Option<PathBuf> {
        self.error_split.then(|| error_path(&self.log_path()))
    }
}

// Wire shape: the file name defaults from the logger name when omitted.
#[derive(Deserialize)]
#[serde(default)]
struct RawLoggerConfig {
    name: Option<String>,
    level: LogLevel,
    directory: PathBuf,
    file_name: Option<String>,
    rotation: RotationPolicy,
    error_split: bool,
}

impl Default for RawLoggerConfig {
    fn default() -> Self {
        let defaults = LoggerConfig::default();
        Self {
            name: None,
            level: defaults.level,
            directory: defaults.directory,
            file_name: None,
            rotation: defaults.rotation,
            error_split: defaults.error_split,
        }
    }
}

impl From<RawLoggerConfig> for LoggerConfig {
    fn from(raw: RawLoggerConfig) -> Self {
        let file_name = raw.file_name.unwrap_or_else(|| match raw.name {
            Some(ref name) => format!("{}.log", name),
            None => DEFAULT_FILE_NAME.to_string(),
        });
        Self {
            name: raw.name,
            level: raw.level,
            directory: raw.directory,
            file_name,
            rotation: raw.rotation,
            error_split: raw.error_split,
        }
    }
}
