//! File logging example
//!
//! Demonstrates size-based rotation, gzip-compressed backups and the error mirror.
//!
//! Run with: cargo run --example file_logging

use unilog::prelude::*;
use unilog::{error, info, warn};

fn main() -> Result<()> {
    println!("=== unilog - File Logging Example ===\n");

    let config = LoggerConfig::named("file_demo")
        .with_directory("demo_logs")
        .with_level(LogLevel::Debug)
        .with_error_split(true)
        .with_rotation(
            RotationPolicy::new()
                .with_max_size(4 * 1024)
                .with_max_backups(3)
                .with_compression(true),
        );
    let logger = Logger::from_config(&config)?;

    println!("1. Writing to {}", config.log_path().display());
    info!(logger, "Application started");
    logger.debug("Loading configuration...");
    warn!(logger, "Using default settings for {} options", 2);
    error!(logger, "Failed to load optional plugin: {}", "metrics");

    println!("2. Writing enough events to trigger rotation");
    for i in 0..200 {
        logger.info_with_fields(
            "request served",
            LogFields::new()
                .with_field("request_id", i)
                .with_field("path", "/api/orders")
                .with_field("latency_ms", 3.5),
        );
    }
    logger.flush()?;

    let metrics = logger.metrics();
    println!("\n=== Metrics ===");
    println!("Logged:   {}", metrics.total_logged());
    println!("Mirrored: {}", metrics.mirrored());
    println!("Failures: {}", metrics.write_failures());

    if let Some(error_log) = config.error_log_path() {
        println!("\nErrors were mirrored to {}", error_log.display());
    }
    println!("Backups are named file_demo.log.1.gz, file_demo.log.2.gz, ...");

    Ok(())
}
