//! Logger metrics for observability
//!
//! Per-event failures never propagate out of the convenience logging calls, so these
//! counters (together with the logger's error callback) are how operators see them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing what a logger has done
///
/// Events filtered out by the minimum level are not counted anywhere.
///
/// # Example
///
/// ```
/// use unilog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_logged();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Events written to the primary sink
    total_logged: AtomicU64,

    /// Events whose primary write failed
    write_failures: AtomicU64,

    /// Events that were written but whose follow-up rotation failed
    rotation_failures: AtomicU64,

    /// Events duplicated to the error mirror
    mirrored: AtomicU64,

    /// Events the error mirror failed to write
    mirror_failures: AtomicU64,

    /// Events written with at least one placeholder field value
    encoding_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            rotation_failures: AtomicU64::new(0),
            mirrored: AtomicU64::new(0),
            mirror_failures: AtomicU64::new(0),
            encoding_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotation_failures(&self) -> u64 {
        self.rotation_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn mirrored(&self) -> u64 {
        self.mirrored.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn mirror_failures(&self) -> u64 {
        self.mirror_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn encoding_failures(&self) -> u64 {
        self.encoding_failures.load(Ordering::Relaxed)
    }

    /// Record a successful primary write; returns the previous count
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rotation_failure(&self) -> u64 {
        self.rotation_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_mirrored(&self) -> u64 {
        self.mirrored.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_mirror_failure(&self) -> u64 {
        self.mirror_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_encoding_failure(&self) -> u64 {
        self.encoding_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of attempted primary writes that failed, as a percentage (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.total_logged() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            write_failures: AtomicU64::new(self.write_failures()),
            rotation_failures: AtomicU64::new(self.rotation_failures()),
            mirrored: AtomicU64::new(self.mirrored()),
            mirror_failures: AtomicU64::new(self.mirror_failures()),
            encoding_failures: AtomicU64::new(self.encoding_failures()),
        }
    }
}
