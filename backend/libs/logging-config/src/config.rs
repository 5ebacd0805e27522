//! Logging configuration structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "logs/app.log";

/// Minimum severity to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Same filter as `Error`; kept so existing `LOG_LEVEL=fatal` deployments parse
    Fatal,
}

impl LogLevel {
    /// Case-insensitive; anything unrecognised is `Info`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            "fatal" => LogLevel::Fatal,
            _ => LogLevel::Info,
        }
    }

    /// Directive understood by `EnvFilter`
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal => "error",
        }
    }
}

impl From<&str> for LogLevel {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable single-line text, no ANSI colours
    Text,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" | "plain" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

/// Configuration for the process-wide subscriber
///
/// Deserializes from a config-file section; omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Also append to this file; `None` logs to stdout only
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `LOG_LEVEL`: debug/info/warn/error/fatal (default: info)
    /// - `LOG_FORMAT`: json/text (default: json)
    /// - `LOG_FILE`: file to append to (default: logs/app.log, empty disables)
    pub fn from_env() -> Self {
        let level = std::env::var("LOG_LEVEL")
            .map(|v| LogLevel::parse(&v))
            .unwrap_or_default();

        let format = std::env::var("LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        let log_file = match std::env::var("LOG_FILE") {
            Ok(path) if path.trim().is_empty() => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        };

        Self {
            level,
            format,
            log_file,
        }
    }

    /// Stdout only, no file sink
    pub fn stdout_only(level: LogLevel) -> Self {
        Self {
            level,
            log_file: None,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        std::env::remove_var("LOG_LEVEL");
        std::env::remove_var("LOG_FORMAT");
        std::env::remove_var("LOG_FILE");
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(LogLevel::parse("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::parse("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::parse(" Error "), LogLevel::Error);
        assert_eq!(LogLevel::parse("fatal"), LogLevel::Fatal);
        assert_eq!(LogLevel::parse("info"), LogLevel::Info);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Info);
        assert_eq!(LogLevel::from(""), LogLevel::Info);
    }

    #[test]
    fn test_fatal_filters_like_error() {
        assert_eq!(LogLevel::Fatal.as_directive(), "error");
        assert_eq!(LogLevel::Error.as_directive(), "error");
        assert_eq!(LogLevel::Debug.as_directive(), "debug");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Text);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Json);
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = LoggingConfig::from_env();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from(DEFAULT_LOG_FILE)));
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("LOG_LEVEL", "debug");
        std::env::set_var("LOG_FORMAT", "text");
        std::env::set_var("LOG_FILE", "/var/log/auth.log");

        let config = LoggingConfig::from_env();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.log_file, Some(PathBuf::from("/var/log/auth.log")));

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_empty_log_file_disables_sink() {
        clear_env();
        std::env::set_var("LOG_FILE", "");

        assert_eq!(LoggingConfig::from_env().log_file, None);

        clear_env();
    }

    #[test]
    fn test_deserialize_config_section() {
        let config: LoggingConfig = serde_json::from_str(
            r#"{"level":"warn","format":"text","log_file":"/var/log/auth.log"}"#,
        )
        .unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.log_file, Some(PathBuf::from("/var/log/auth.log")));

        let partial: LoggingConfig = serde_json::from_str(r#"{"level":"fatal"}"#).unwrap();
        assert_eq!(partial.level, LogLevel::Fatal);
        assert_eq!(partial.format, LogFormat::Json);
        assert_eq!(partial.log_file, Some(PathBuf::from(DEFAULT_LOG_FILE)));

        let stdout: LoggingConfig = serde_json::from_str(r#"{"log_file":null}"#).unwrap();
        assert_eq!(stdout, LoggingConfig::stdout_only(LogLevel::Info));

        assert!(serde_json::from_str::<LoggingConfig>(r#"{"level":"trace"}"#).is_err());
    }

    #[test]
    fn test_config_serializes_lowercase() {
        let json = serde_json::to_value(LoggingConfig::stdout_only(LogLevel::Debug)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "level": "debug", "format": "json", "log_file": null })
        );
    }

    #[test]
    fn test_stdout_only() {
        let config = LoggingConfig::stdout_only(LogLevel::Warn);
        assert_eq!(config.level, LogLevel::Warn);
        assert!(config.log_file.is_none());
    }
}
