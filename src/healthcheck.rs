//! Periodic health checks reported through a logger
//!
//! Runs a check on a background thread at a fixed interval and logs `INFO "OK!"` when it
//! passes or `ERROR "Health check failed: <reason>"` when it doesn't.

use crate::core::error::{LoggerError, Result};
use crate::core::logger::Logger;
use crossbeam_channel::{bounded, select, tick, Sender};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to a running health monitor; stops the ticker when dropped
pub struct HealthMonitor {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl HealthMonitor {
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop ticking and wait for an in-flight check to finish
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Disconnecting the channel wakes the worker
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for HealthMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthMonitor")
            .field("interval", &self.interval)
            .field("running", &self.handle.is_some())
            .finish()
    }
}

/// Run `check` every `interval` on a background thread, logging each outcome
///
/// The first check runs one interval after the call.
///
/// # Errors
///
/// Returns an invalid-configuration error for a zero interval.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use unilog::{healthcheck::monitor_health, Logger};
///
/// let logger = Arc::new(Logger::discard());
/// let monitor = monitor_health(logger, Duration::from_secs(30), || -> Result<(), String> {
///     Ok(())
/// })
/// .unwrap();
/// // ...
/// monitor.stop();
/// ```
pub fn monitor_health<F, E>(
    logger: Arc<Logger>,
    interval: Duration,
    mut check: F,
) -> Result<HealthMonitor>
where
    F: FnMut() -> std::result::Result<(), E> + Send + 'static,
    E: fmt::Display + 'static,
{
    if interval.is_zero() {
        return Err(LoggerError::invalid_config(
            "HealthMonitor",
            "interval must be greater than zero",
        ));
    }

    let (stop_tx, stop_rx) = bounded::<()>(0);
    let ticker = tick(interval);

    let handle = thread::spawn(move || loop {
        select! {
            recv(ticker) -> _ => match check() {
                Ok(()) => logger.info("OK!"),
                Err(e) => logger.error(format!("Health check failed: {}", e)),
            },
            recv(stop_rx) -> _ => break,
        }
    });

    Ok(HealthMonitor {
        stop: Some(stop_tx),
        handle: Some(handle),
        interval,
    })
}
