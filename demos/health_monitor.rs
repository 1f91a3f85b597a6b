//! Health monitor example
//!
//! Runs a periodic check that fails every third time and logs each outcome.
//!
//! Run with: cargo run --example health_monitor

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use unilog::healthcheck::monitor_health;
use unilog::prelude::*;

fn main() -> Result<()> {
    println!("=== unilog - Health Monitor Example ===\n");

    let registry = LoggerRegistry::global();
    let logger = registry.init_named_with(
        LoggerConfig::named("health")
            .with_directory("demo_logs")
            .with_error_split(true),
    )?;

    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);
    let monitor = monitor_health(Arc::clone(&logger), Duration::from_millis(200), move || {
        let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
        if n % 3 == 0 {
            Err(format!("upstream timed out on attempt {}", n))
        } else {
            Ok(())
        }
    })?;

    thread::sleep(Duration::from_secs(2));
    monitor.stop();
    logger.flush()?;

    println!("Ran {} checks", attempts.load(Ordering::Relaxed));
    println!("See demo_logs/health.log and demo_logs/health_error.log");
    Ok(())
}
