//! Logging initialization

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggerConfig;

/// Build the log filter
///
/// `--debug` wins, then `RUST_LOG`, then the configured level.
fn build_filter(debug: bool, logger: &LoggerConfig) -> Result<EnvFilter> {
    if debug {
        return Ok(EnvFilter::new("debug"));
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&logger.level)
        .with_context(|| format!("Invalid logger.level: {}", logger.level))
}

/// Initialize logging based on debug flag and logger configuration
///
/// Logs go to stderr so stdout only carries reports. When `logger.file` is
/// set, logs are appended to that file instead and its path is returned.
pub fn init_logging(debug: bool, logger: &LoggerConfig) -> Result<Option<PathBuf>> {
    let filter = build_filter(debug, logger)?;

    match &logger.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                crate::config::paths::ensure_dir(parent).with_context(|| {
                    format!("Failed to create log directory: {}", parent.display())
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_writer(file)
                .with_env_filter(filter)
                .with_ansi(false) // No ANSI codes in log file
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

            Ok(Some(path.clone()))
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .with_target(debug)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

            Ok(None)
        }
    }
}
