//! Registry of named loggers with a lazily initialized default
//!
//! The registry is append-only: a name is bound to a logger by the first successful
//! initialization and keeps that logger (and its configuration) for the registry's
//! lifetime. Later initializations of the same name return the existing logger untouched.
//!
//! Every file a logger writes (its primary file and, with error splitting, its mirror) is
//! claimed for that logger alone. A configuration that would reuse a claimed file is
//! rejected, since two sinks rotating the same file would rename it out from under each
//! other.
//!
//! # Example
//!
//! ```no_run
//! use unilog::LoggerRegistry;
//!
//! let registry = LoggerRegistry::new();
//! registry.init_default("info", "/var/log/app").unwrap();
//! registry.init_named("billing", "debug", "/var/log/app").unwrap();
//!
//! registry.lookup("billing").unwrap().debug("invoice sent");
//! // Unknown names fall back to the default logger
//! registry.lookup("anything-else").unwrap().info("hello");
//! ```

use super::config::LoggerConfig;
use super::error::{LoggerError, Result};
use super::logger::{ErrorCallback, Logger, LoggerBuilder};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

type DefaultSlot = std::result::Result<Arc<Logger>, Arc<LoggerError>>;

/// Owner recorded for files claimed by the default logger
const DEFAULT_OWNER: &str = "<default>";

pub struct LoggerRegistry {
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
    /// Per-name construction gates so one slow initialization doesn't block other names
    pending: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Canonical sink path -> owning logger
    claimed: Mutex<HashMap<PathBuf, String>>,
    default: OnceLock<DefaultSlot>,
    discard: OnceLock<Arc<Logger>>,
    on_error: Option<ErrorCallback>,
}

impl LoggerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loggers: RwLock::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            claimed: Mutex::new(HashMap::new()),
            default: OnceLock::new(),
            discard: OnceLock::new(),
            on_error: None,
        }
    }

    /// Registry whose loggers all report per-event errors to `callback`
    #[must_use]
    pub fn with_error_callback(callback: ErrorCallback) -> Self {
        Self {
            on_error: Some(callback),
            ..Self::new()
        }
    }

    /// Process-wide registry for callers that don't pass one around
    pub fn global() -> &'static LoggerRegistry {
        static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();
        GLOBAL.get_or_init(LoggerRegistry::new)
    }

    /// Create `<directory>/<name>.log` for `name` unless it already exists
    ///
    /// `level` is parsed leniently: anything unrecognized means `info`.
    pub fn init_named(
        &self,
        name: &str,
        level: &str,
        directory: impl AsRef<Path>,
    ) -> Result<Arc<Logger>> {
        let config = LoggerConfig::named(name)
            .with_level_str(level)
            .with_directory(directory.as_ref());
        self.init_named_with(config)
    }

    /// Register a logger built from `config`, keyed by its name
    ///
    /// Idempotent: if the name is taken, the existing logger is returned and `config`
    /// is ignored. Concurrent callers for the same name construct it exactly once.
    ///
    /// # Errors
    ///
    /// [`LoggerError::InvalidConfiguration`] for an empty name or when one of the logger's
    /// files already belongs to another logger; [`LoggerError::Configuration`] when the
    /// files can't be created. A failed initialization may be retried.
    pub fn init_named_with(&self, config: LoggerConfig) -> Result<Arc<Logger>> {
        let name = match config.name {
            Some(ref name) if !name.trim().is_empty() => name.clone(),
            _ => {
                return Err(LoggerError::invalid_config(
                    "LoggerRegistry",
                    "named loggers need a non-empty name",
                ))
            }
        };

        if let Some(existing) = self.loggers.read().get(&name) {
            return Ok(Arc::clone(existing));
        }

        let gate = Arc::clone(self.pending.lock().entry(name.clone()).or_default());
        let result = {
            let _constructing = gate.lock();
            self.construct_named(&name, &config)
        };
        self.release_gate(&name, &gate);
        result
    }

    fn construct_named(&self, name: &str, config: &LoggerConfig) -> Result<Arc<Logger>> {
        // Another caller may have finished while we waited on the gate
        if let Some(existing) = self.loggers.read().get(name) {
            return Ok(Arc::clone(existing));
        }

        // Built outside the map lock; only a fully constructed logger becomes visible
        let logger = Arc::new(self.claim_and_build(name, config)?);
        Ok(Arc::clone(
            self.loggers
                .write()
                .entry(name.to_string())
                .or_insert(logger),
        ))
    }

    /// Drop the construction gate for `name` unless another caller is still waiting on it
    fn release_gate(&self, name: &str, gate: &Arc<Mutex<()>>) {
        let mut pending = self.pending.lock();
        // One reference in the map, one held by the caller
        if Arc::strong_count(gate) <= 2 {
            pending.remove(name);
        }
    }

    /// Initialize the anonymous default logger at `<directory>/app.log`
    pub fn init_default(&self, level: &str, directory: impl AsRef<Path>) -> Result<Arc<Logger>> {
        let config = LoggerConfig::anonymous()
            .with_level_str(level)
            .with_directory(directory.as_ref());
        self.init_default_with(config)
    }

    /// Initialize the default logger once
    ///
    /// Only the first call constructs anything; every caller, including concurrent ones,
    /// gets that call's outcome. A failed construction is permanent for this registry.
    pub fn init_default_with(&self, config: LoggerConfig) -> Result<Arc<Logger>> {
        let slot = self.default.get_or_init(|| {
            self.claim_and_build(DEFAULT_OWNER, &config)
                .map(Arc::new)
                .map_err(Arc::new)
        });

        match slot {
            Ok(logger) => Ok(Arc::clone(logger)),
            Err(e) => Err(LoggerError::DefaultInitFailed(Arc::clone(e))),
        }
    }

    /// Reserve the files `config` writes, then build; the claim is undone if building fails
    fn claim_and_build(&self, owner: &str, config: &LoggerConfig) -> Result<Logger> {
        let paths = self.claim(owner, config)?;
        self.build(config).map_err(|e| {
            let mut claimed = self.claimed.lock();
            for path in &paths {
                claimed.remove(path);
            }
            e
        })
    }

    fn claim(&self, owner: &str, config: &LoggerConfig) -> Result<Vec<PathBuf>> {
        config.validate()?;
        let paths = sink_paths(config)?;

        let mut claimed = self.claimed.lock();
        if let Some((path, holder)) = paths
            .iter()
            .find_map(|path| claimed.get(path).map(|holder| (path, holder)))
        {
            return Err(LoggerError::invalid_config(
                "LoggerRegistry",
                format!(
                    "{} is already written by logger '{}'",
                    path.display(),
                    holder
                ),
            ));
        }
        for path in &paths {
            claimed.insert(path.clone(), owner.to_string());
        }
        Ok(paths)
    }

    fn build(&self, config: &LoggerConfig) -> Result<Logger> {
        let mut builder = LoggerBuilder::from_config(config)?;
        if let Some(ref callback) = self.on_error {
            builder = builder.on_error(Arc::clone(callback));
        }
        Ok(builder.build())
    }

    /// Named logger, else the default logger, else [`LoggerError::NotInitialized`]
    pub fn lookup(&self, name: &str) -> Result<Arc<Logger>> {
        if let Some(logger) = self.loggers.read().get(name) {
            return Ok(Arc::clone(logger));
        }
        self.default_logger()
            .ok_or_else(|| LoggerError::not_initialized(name))
    }

    /// Like [`lookup`](Self::lookup), but falls back to a shared logger that discards output
    pub fn lookup_or_discard(&self, name: &str) -> Arc<Logger> {
        self.lookup(name).unwrap_or_else(|_| {
            Arc::clone(self.discard.get_or_init(|| Arc::new(Logger::discard())))
        })
    }

    /// The default logger, if it was initialized successfully
    pub fn default_logger(&self) -> Option<Arc<Logger>> {
        match self.default.get() {
            Some(Ok(logger)) => Some(Arc::clone(logger)),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.read().contains_key(name)
    }

    /// Number of named loggers (the default logger is not counted)
    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Flush every registered logger, returning the first error
    pub fn flush_all(&self) -> Result<()> {
        let loggers: Vec<Arc<Logger>> = self.loggers.read().values().cloned().collect();
        let mut first_error = None;

        for logger in loggers.iter().chain(self.default_logger().as_ref()) {
            if let Err(e) = logger.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("names", &self.names())
            .field("default", &self.default_logger().is_some())
            .finish_non_exhaustive()
    }
}

/// Files a logger built from `config` would write, keyed by canonical directory
///
/// The directory is created first so equivalent spellings (`logs`, `./logs`, symlinks)
/// resolve to the same key.
fn sink_paths(config: &LoggerConfig) -> Result<Vec<PathBuf>> {
    let dir_error = |e| {
        LoggerError::config(
            config.directory.display().to_string(),
            "failed to create log directory",
            e,
        )
    };
    let directory = if config.directory.as_os_str().is_empty() {
        Path::new(".")
    } else {
        config.directory.as_path()
    };
    fs::create_dir_all(directory).map_err(dir_error)?;
    let directory = fs::canonicalize(directory).map_err(dir_error)?;

    let canonical = config.clone().with_directory(directory);
    let mut paths = vec![canonical.log_path()];
    paths.extend(canonical.error_log_path());
    Ok(paths)
}
