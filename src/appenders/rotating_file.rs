//! Size-based rotating file sink
//!
//! Appends rendered lines to a file and, once the file grows past the configured size,
//! moves it to a numbered backup (`app.log.1`, `app.log.2`, ...), optionally gzips the
//! backup (`app.log.1.gz`) and prunes backups by count and by age.

use crate::core::error::{LoggerError, Result};
use crate::core::sink::Sink;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Rotation thresholds and retention for a [`RotatingFileSink`]
///
/// # Examples
///
/// ```
/// use unilog::appenders::RotationPolicy;
///
/// // 50 MB files, keep 7 gzipped backups no older than 30 days
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_max_age_days(30)
///     .with_compression(true);
/// assert!(policy.rotates());
///
/// // Plain append-only file
/// assert!(!RotationPolicy::never().rotates());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Rotate once the file exceeds this many bytes; 0 disables rotation
    pub max_size: u64,
    /// Number of backups to keep; 0 keeps all
    pub max_backups: usize,
    /// Delete backups older than this many days; 0 keeps them regardless of age
    pub max_age_days: u32,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size: 10 * 1024 * 1024, // 10 MB
            max_backups: 5,
            max_age_days: 0,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append-only file, never rotated
    #[must_use]
    pub fn never() -> Self {
        Self {
            max_size: 0,
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(self, megabytes: u64) -> Self {
        self.with_max_size(megabytes * 1024 * 1024)
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    pub fn rotates(&self) -> bool {
        self.max_size > 0
    }

    fn max_age(&self) -> Option<Duration> {
        (self.max_age_days > 0)
            .then(|| Duration::from_secs(u64::from(self.max_age_days) * SECONDS_PER_DAY))
    }
}

/// A rotated file sitting next to the live log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub index: usize,
    pub path: PathBuf,
    pub compressed: bool,
}

/// File sink with size-based rotation
///
/// Not internally synchronized: the owning logger holds it behind a mutex, so an append
/// and the rotation it triggers happen as one step.
///
/// # Examples
///
/// ```no_run
/// use unilog::appenders::{RotatingFileSink, RotationPolicy};
/// use unilog::Sink;
///
/// let policy = RotationPolicy::new().with_max_size(1024 * 1024).with_max_backups(3);
/// let mut sink = RotatingFileSink::open("/var/log/svc/app.log", policy).unwrap();
/// sink.append(b"{\"msg\":\"hello\"}\n").unwrap();
/// ```
#[derive(Debug)]
pub struct RotatingFileSink {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    current_size: u64,
    rotations: u64,
}

impl RotatingFileSink {
    /// Open (or create) the log file, creating its directory if needed
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::Configuration`] if the directory or file cannot be created
    pub fn open<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::config(
                    parent.display().to_string(),
                    "failed to create log directory",
                    e,
                )
            })?;
        }

        let (file, current_size) = open_append(&path).map_err(|e| {
            LoggerError::config(path.display().to_string(), "failed to open log file", e)
        })?;

        Ok(Self {
            path,
            policy,
            file: Some(file),
            current_size,
            rotations: 0,
        })
    }

    /// Rotate if the size threshold has been crossed; returns whether a rotation happened
    pub fn rotate_if_needed(&mut self) -> Result<bool> {
        if !self.should_rotate() {
            return Ok(false);
        }

        if let Err(e) = self.rotate() {
            // Keep logging into whatever file is at the base path
            if self.file.is_none() {
                if let Ok((file, size)) = open_append(&self.path) {
                    self.file = Some(file);
                    self.current_size = size;
                }
            }
            // Allow the file to grow past the limit rather than retrying on every append
            self.current_size = 0;
            return Err(e);
        }
        Ok(true)
    }

    fn should_rotate(&self) -> bool {
        self.policy.rotates() && self.current_size > self.policy.max_size
    }

    /// Move the live file to backup slot 1 and start a fresh file
    pub fn rotate(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                LoggerError::rotation(
                    self.path.display().to_string(),
                    format!("failed to flush before rotation: {}", e),
                )
            })?;
        }

        self.shift_backups()?;

        let first = self.backup_path(1);
        if self.path.exists() {
            fs::rename(&self.path, &first).map_err(|e| {
                LoggerError::rotation(
                    self.path.display().to_string(),
                    format!("failed to move current log file aside: {}", e),
                )
            })?;
        }

        let (file, size) = open_append(&self.path).map_err(|e| {
            LoggerError::rotation(
                self.path.display().to_string(),
                format!("failed to create new log file: {}", e),
            )
        })?;
        self.file = Some(file);
        self.current_size = size;
        self.rotations += 1;

        // The live file is back; what follows only affects archived data
        if self.policy.compress && first.exists() {
            compress_file(&first)?;
        }
        self.prune_backups()
    }

    /// Renumber existing backups N -> N+1, highest first
    fn shift_backups(&self) -> Result<()> {
        let mut backups = self.backups();
        backups.sort_by(|a, b| b.index.cmp(&a.index));

        for backup in backups {
            let target = with_gz(self.backup_path(backup.index + 1), backup.compressed);
            fs::rename(&backup.path, &target).map_err(|e| {
                LoggerError::rotation(
                    backup.path.display().to_string(),
                    format!("failed to renumber backup: {}", e),
                )
            })?;
        }
        Ok(())
    }

    /// Delete backups beyond `max_backups` or older than `max_age_days`
    fn prune_backups(&self) -> Result<()> {
        let cutoff = self
            .policy
            .max_age()
            .and_then(|age| SystemTime::now().checked_sub(age));
        let mut failed = Vec::new();

        for backup in self.backups() {
            let too_many =
                self.policy.max_backups > 0 && backup.index > self.policy.max_backups;
            let too_old = cutoff.is_some_and(|cutoff| {
                fs::metadata(&backup.path)
                    .and_then(|m| m.modified())
                    .map(|modified| modified < cutoff)
                    .unwrap_or(false)
            });

            if too_many || too_old {
                if let Err(e) = fs::remove_file(&backup.path) {
                    failed.push(format!("{}: {}", backup.path.display(), e));
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::rotation(
                self.path.display().to_string(),
                format!("failed to delete old backups ({})", failed.join(", ")),
            ))
        }
    }

    /// Existing backups for this file, in no particular order
    pub fn backups(&self) -> Vec<Backup> {
        let Some(base) = self.path.file_name().and_then(|n| n.to_str()) else {
            return Vec::new();
        };
        let prefix = format!("{}.", base);

        let entries = match fs::read_dir(self.directory()) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let suffix = name.strip_prefix(&prefix)?;
                let (digits, compressed) = match suffix.strip_suffix(".gz") {
                    Some(digits) => (digits, true),
                    None => (suffix, false),
                };
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                Some(Backup {
                    index: digits.parse().ok()?,
                    path: entry.path(),
                    compressed,
                })
            })
            .collect()
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Uncompressed backup path for a slot
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Bytes in the live file as tracked by this sink
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn rotation_count(&self) -> u64 {
        self.rotations
    }
}

impl Sink for RotatingFileSink {
    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        if self.file.is_none() {
            let (file, size) = open_append(&self.path).map_err(|e| {
                LoggerError::write(self.path.display().to_string(), "failed to reopen log file", e)
            })?;
            self.file = Some(file);
            self.current_size = size;
        }

        if let Some(ref mut file) = self.file {
            file.write_all(bytes).map_err(|e| {
                LoggerError::write(self.path.display().to_string(), "failed to write log line", e)
            })?;
            self.current_size += bytes.len() as u64;
        }

        self.rotate_if_needed().map(|_| ())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush().map_err(|e| {
                LoggerError::write(self.path.display().to_string(), "failed to flush", e)
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }
}

fn open_append(path: &Path) -> io::Result<(File, u64)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok((file, size))
}

fn with_gz(path: PathBuf, compressed: bool) -> PathBuf {
    if !compressed {
        return path;
    }
    let mut name = path.into_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz`, removing the original only once the archive is complete
fn compress_file(path: &Path) -> Result<()> {
    let gz_path = with_gz(path.to_path_buf(), true);
    let mut tmp_name = gz_path.clone().into_os_string();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let cleanup = |e: io::Error, what: &str| {
        let _ = fs::remove_file(&tmp_path);
        LoggerError::rotation(
            path.display().to_string(),
            format!("failed to {}: {}", what, e),
        )
    };

    let input = File::open(path).map_err(|e| cleanup(e, "open backup for compression"))?;
    let output = File::create(&tmp_path).map_err(|e| cleanup(e, "create compressed file"))?;

    let mut reader = BufReader::with_capacity(64 * 1024, input);
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );
    io::copy(&mut reader, &mut encoder).map_err(|e| cleanup(e, "compress backup"))?;
    encoder
        .finish()
        .and_then(|mut writer| writer.flush())
        .map_err(|e| cleanup(e, "finish compression"))?;

    fs::rename(&tmp_path, &gz_path).map_err(|e| cleanup(e, "move compressed file into place"))?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compressed {} but failed to remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}
