//! Registry example
//!
//! Initializes a default logger and two named loggers once, then looks them up by
//! name from worker threads.
//!
//! Run with: cargo run --example registry_usage

use std::sync::Arc;
use std::thread;

use unilog::prelude::*;

fn main() -> Result<()> {
    println!("=== unilog - Registry Example ===\n");

    let registry = LoggerRegistry::global();

    registry.init_default("info", "demo_logs")?;
    registry.init_named("orders", "debug", "demo_logs")?;
    registry.init_named_with(
        LoggerConfig::named("payments")
            .with_directory("demo_logs")
            .with_level_str("warn")
            .with_error_split(true),
    )?;

    // A second init is a no-op that returns the registered logger
    let orders = registry.init_named("orders", "error", "demo_logs")?;
    println!("orders level stays {}", orders.min_level());
    println!("registered: {:?}", registry.names());

    let handles: Vec<_> = ["orders", "payments", "shipping"]
        .into_iter()
        .enumerate()
        .map(|(worker, name)| {
            thread::spawn(move || {
                // "shipping" was never registered and falls back to the default logger
                let logger: Arc<Logger> = LoggerRegistry::global().lookup_or_discard(name);
                logger.info_with_fields(
                    "worker started",
                    LogFields::new().with_field("worker", worker),
                );
                logger.error(format!("{} worker hit a retryable error", name));
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("worker panicked");
        }
    }

    registry.flush_all()?;
    println!("\nSee demo_logs/app.log, orders.log, payments.log and payments_error.log");
    Ok(())
}
