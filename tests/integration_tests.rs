//! Integration tests for unilog
//!
//! These tests verify:
//! - JSON-lines output and key order
//! - Level filtering and lenient level parsing
//! - Error mirroring into `<name>_error.<ext>`
//! - Size-based rotation
//! - Registry idempotency, default fallback, and error reporting

use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

use parking_lot::Mutex;
use serde_json::Value;
use tempfile::TempDir;
use unilog::appenders::error_file_name;
use unilog::prelude::*;
use unilog::{error, info, warn};

fn read_json_lines(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| serde_json::from_str(line).expect("every line is a JSON object"))
        .collect()
}

fn messages(lines: &[Value]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l["msg"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_event_round_trips_through_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();
    let logger = registry
        .init_named("payments", "debug", temp_dir.path())
        .expect("Failed to init logger");

    logger.info_with_fields(
        "charge accepted",
        LogFields::new()
            .with_field("amount", 1250)
            .with_field("currency", "EUR")
            .with_field("ratio", 0.5),
    );
    logger.flush().unwrap();

    let raw = fs::read_to_string(temp_dir.path().join("payments.log")).unwrap();
    assert!(raw.ends_with('\n'));
    assert_eq!(raw.lines().count(), 1);

    let line: Value = serde_json::from_str(raw.trim_end()).unwrap();
    assert_eq!(line["level"], "INFO");
    assert_eq!(line["logger"], "payments");
    assert_eq!(line["msg"], "charge accepted");
    assert_eq!(line["amount"], 1250);
    assert_eq!(line["currency"], "EUR");
    assert_eq!(line["ratio"], 0.5);
    assert!(line["line"].as_u64().unwrap() > 0);
    assert!(line["time"].as_str().unwrap().ends_with('Z'));

    let keys: Vec<&str> = raw
        .trim_end()
        .trim_start_matches('{')
        .split(',')
        .filter_map(|kv| kv.split(':').next())
        .map(|k| k.trim_matches('"'))
        .take(5)
        .collect();
    assert_eq!(keys, vec!["time", "level", "logger", "line", "msg"]);
}

#[test]
fn test_newlines_in_messages_stay_on_one_line() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = LoggerConfig::named("inject").with_directory(temp_dir.path());
    let logger = Logger::from_config(&config).unwrap();

    logger.info("User login\n{\"level\":\"ERROR\",\"msg\":\"forged\"}");
    logger.flush().unwrap();

    let lines = read_json_lines(&temp_dir.path().join("inject.log"));
    assert_eq!(lines.len(), 1);
    assert!(lines[0]["msg"].as_str().unwrap().contains("forged"));
}

#[test]
fn test_level_filtering() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();
    let logger = registry.init_named("filtered", "warn", temp_dir.path()).unwrap();

    logger.debug("debug");
    logger.info("info");
    logger.warn("warn");
    logger.error("error");
    logger.fatal("fatal");

    let lines = read_json_lines(&temp_dir.path().join("filtered.log"));
    assert_eq!(messages(&lines), vec!["warn", "error", "fatal"]);
}

#[test]
fn test_unrecognized_level_falls_back_to_info() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();
    let logger = registry.init_named("lenient", "bogus", temp_dir.path()).unwrap();

    assert_eq!(logger.min_level(), LogLevel::Info);
    logger.debug("dropped");
    logger.info("kept");

    let lines = read_json_lines(&temp_dir.path().join("lenient.log"));
    assert_eq!(messages(&lines), vec!["kept"]);
}

#[test]
fn test_error_mirror_receives_only_errors() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = LoggerConfig::named("svc")
        .with_directory(temp_dir.path())
        .with_level(LogLevel::Debug)
        .with_error_split(true);
    let registry = LoggerRegistry::new();
    let logger = registry.init_named_with(config).unwrap();
    assert!(logger.has_error_mirror());

    info!(logger, "started");
    warn!(logger, "slow request: {}ms", 950);
    error!(logger, "db down: {}", "timeout");
    logger.fatal("giving up");
    logger.flush().unwrap();

    let primary = read_json_lines(&temp_dir.path().join("svc.log"));
    let mirror = read_json_lines(&temp_dir.path().join("svc_error.log"));

    assert_eq!(
        messages(&primary),
        vec!["started", "slow request: 950ms", "db down: timeout", "giving up"]
    );
    assert_eq!(messages(&mirror), vec!["db down: timeout", "giving up"]);
    assert_eq!(mirror[0]["logger"], "svc");
    assert_eq!(mirror[0], primary[2]);
    assert_eq!(logger.metrics().mirrored(), 2);
}

#[test]
fn test_error_file_names() {
    assert_eq!(error_file_name("app.log"), "app_error.log");
    assert_eq!(error_file_name("service"), "service_error");
    assert_eq!(error_file_name("archive.tar.gz"), "archive.tar_error.gz");
    assert_eq!(error_file_name(".hidden"), ".hidden_error");
}

#[test]
fn test_rotation_preserves_every_line() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = LoggerConfig::named("rotating")
        .with_directory(temp_dir.path())
        .with_rotation(RotationPolicy::new().with_max_size(512).with_max_backups(0));
    let logger = Logger::from_config(&config).unwrap();

    for i in 0..40 {
        logger.info(format!("message number {:03}", i));
    }
    logger.flush().unwrap();

    let log_path = temp_dir.path().join("rotating.log");
    let backup_1 = temp_dir.path().join("rotating.log.1");
    assert!(backup_1.exists(), "first backup should exist");

    let mut all = Vec::new();
    let mut index = 1;
    loop {
        let backup = temp_dir.path().join(format!("rotating.log.{}", index));
        if !backup.exists() {
            break;
        }
        index += 1;
    }
    // Oldest backups carry the highest index
    for i in (1..index).rev() {
        all.extend(read_json_lines(
            &temp_dir.path().join(format!("rotating.log.{}", i)),
        ));
    }
    all.extend(read_json_lines(&log_path));

    let expected: Vec<String> = (0..40).map(|i| format!("message number {:03}", i)).collect();
    assert_eq!(messages(&all), expected);

    // The active file was reopened after the last rotation and stays under the limit
    assert!(fs::metadata(&log_path).unwrap().len() <= 512 + 200);
}

#[test]
fn test_repeated_init_returns_same_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    let first = registry.init_named("shared", "info", temp_dir.path()).unwrap();
    let second = registry.init_named("shared", "debug", temp_dir.path()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.min_level(), LogLevel::Info);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_concurrent_init_constructs_once() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = Arc::new(LoggerRegistry::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            let dir = temp_dir.path().to_path_buf();
            thread::spawn(move || {
                barrier.wait();
                registry.init_named("race", "info", dir).unwrap()
            })
        })
        .collect();

    let loggers: Vec<Arc<Logger>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(loggers.iter().all(|l| Arc::ptr_eq(l, &loggers[0])));
    assert_eq!(registry.names(), vec!["race".to_string()]);

    // Only one logger was ever opened on the directory
    let files: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn test_default_and_named_app_do_not_share_app_log() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    let default = registry.init_default("info", temp_dir.path()).unwrap();
    let err = registry
        .init_named("app", "info", temp_dir.path())
        .unwrap_err();
    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    assert!(err.to_string().contains("app.log"));

    default.info("only the default writes here");
    let lines = read_json_lines(&temp_dir.path().join("app.log"));
    assert_eq!(messages(&lines), vec!["only the default writes here"]);
}

#[test]
fn test_rotation_of_one_logger_cannot_strand_another() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();
    let config = |name: &str| {
        LoggerConfig::named(name)
            .with_directory(temp_dir.path())
            .with_file_name("shared.log")
            .with_rotation(RotationPolicy::new().with_max_size(100))
    };

    let a = registry.init_named_with(config("a")).unwrap();
    assert!(registry.init_named_with(config("b")).is_err());
    let b = registry
        .init_named_with(config("b").with_file_name("b.log"))
        .unwrap();

    a.info("a1 padding padding padding");
    a.info("a2 padding padding padding");
    b.info("b1 lands in its own live file");

    let live = read_json_lines(&temp_dir.path().join("b.log"));
    assert_eq!(messages(&live), vec!["b1 lands in its own live file"]);
    assert!(temp_dir.path().join("shared.log.1").exists());
}

#[test]
fn test_lookup_falls_back_to_default() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    assert!(matches!(
        registry.lookup("missing"),
        Err(LoggerError::NotInitialized { .. })
    ));

    let default = registry.init_default("info", temp_dir.path()).unwrap();
    let fallback = registry.lookup("missing").unwrap();
    assert!(Arc::ptr_eq(&default, &fallback));

    fallback.info("through the default");
    let lines = read_json_lines(&temp_dir.path().join("app.log"));
    assert_eq!(messages(&lines), vec!["through the default"]);
    assert!(lines[0].get("logger").is_none());
}

#[test]
fn test_failing_sink_reports_through_callback() {
    struct ReadOnlySink;

    impl Sink for ReadOnlySink {
        fn append(&mut self, _bytes: &[u8]) -> unilog::Result<()> {
            Err(LoggerError::write(
                "readonly",
                "device is read-only",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }

        fn flush(&mut self) -> unilog::Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "readonly"
        }
    }

    let reported = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&reported);
    let logger = Logger::builder()
        .name("broken")
        .sink(Box::new(ReadOnlySink))
        .on_error(Arc::new(move |e: &LoggerError| seen.lock().push(e.to_string())))
        .build();

    logger.info("first");
    logger.info("second");
    assert!(logger.emit(LogLevel::Info, "third", LogFields::new()).is_err());

    let reported = reported.lock();
    assert_eq!(reported.len(), 3);
    assert!(reported[0].contains("read-only"));
    assert_eq!(logger.metrics().write_failures(), 3);
}

#[test]
fn test_uncreatable_directory_is_configuration_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, b"file").unwrap();

    let registry = LoggerRegistry::new();
    let err = registry
        .init_named("blocked", "info", blocker.join("logs"))
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(!registry.contains("blocked"));
}

#[test]
fn test_config_from_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let json = format!(
        r#"{{
            "name": "from_json",
            "level": "WARNING",
            "directory": {},
            "error_split": true,
            "rotation": {{ "max_size": 1048576, "max_backups": 2, "compress": true }}
        }}"#,
        serde_json::to_string(temp_dir.path()).unwrap()
    );

    let config = LoggerConfig::from_json(&json).unwrap();
    assert_eq!(config.level, LogLevel::Warn);
    assert_eq!(config.file_name, "from_json.log");
    assert_eq!(config.rotation.max_backups, 2);
    assert!(config.rotation.compress);

    let registry = LoggerRegistry::new();
    let logger = registry.init_named_with(config).unwrap();
    logger.error("configured");
    assert!(temp_dir.path().join("from_json_error.log").exists());
}
