//! Structured logging setup shared by the auth libraries
//!
//! Installs one global `tracing` subscriber that writes JSON lines to stdout
//! and, optionally, appends the same lines to a log file. Libraries only emit
//! events through `tracing` macros; nothing here is consulted for control flow.

pub mod config;

pub use config::{LogFormat, LogLevel, LoggingConfig, DEFAULT_LOG_FILE};

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, fmt::writer::MakeWriterExt, EnvFilter};

/// Initialize the global subscriber
///
/// `RUST_LOG`, when set, takes precedence over `config.level`.
///
/// # Errors
/// - The log file (or its parent directory) cannot be created
/// - A global subscriber is already installed
///
/// # Example
/// ```no_run
/// use logging_config::{init_logging, LoggingConfig};
///
/// init_logging(&LoggingConfig::from_env()).expect("Failed to initialize logging");
/// tracing::info!(user_id = 42, "User logged in");
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config.level);
    let file = config.log_file.as_deref().map(open_log_file).transpose()?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let installed = match (config.format, file) {
        (LogFormat::Json, Some(file)) => builder
            .json()
            .with_writer(io::stdout.and(Mutex::new(file)))
            .try_init(),
        (LogFormat::Json, None) => builder.json().with_writer(io::stdout).try_init(),
        (LogFormat::Text, Some(file)) => builder
            .with_writer(io::stdout.and(Mutex::new(file)))
            .try_init(),
        (LogFormat::Text, None) => builder.with_writer(io::stdout).try_init(),
    };

    installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

    tracing::info!(
        level = config.level.as_directive(),
        format = ?config.format,
        log_file = ?config.log_file,
        "Logging initialized"
    );

    Ok(())
}

/// Filter from `RUST_LOG`, falling back to `level`
pub fn build_env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
}

/// Open `path` for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
