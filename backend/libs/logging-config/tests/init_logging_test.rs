//! Installs the global subscriber, so this file holds a single test.

use logging_config::{init_logging, LogFormat, LogLevel, LoggingConfig};
use std::fs;

#[test]
fn test_init_logging_writes_json_to_file() {
    std::env::remove_var("RUST_LOG");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("app.log");

    let config = LoggingConfig {
        level: LogLevel::Info,
        format: LogFormat::Json,
        log_file: Some(path.clone()),
    };
    init_logging(&config).expect("first init succeeds");

    tracing::info!(user_id = 42, "user logged in");
    tracing::debug!("filtered out at info level");

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    let event = lines
        .iter()
        .find(|line| line.contains("user logged in"))
        .expect("event written to log file");

    assert!(event.starts_with('{'));
    assert!(event.contains(r#""level":"INFO""#));
    assert!(event.contains(r#""user_id":42"#));
    assert!(!contents.contains("filtered out"));

    assert!(
        init_logging(&config).is_err(),
        "second init must fail instead of panicking"
    );
}
