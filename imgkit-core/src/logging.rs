//! Logging configuration with rotation support
//!
//! # Example
//!
//! ```no_run
//! use imgkit_core::logging::init_logging;
//!
//! init_logging("logs", "imgkit.log", "info").unwrap();
//! ```

use crate::error::{Error, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging to stdout and a daily rotated file
///
/// - `directory`: Directory to store logs
/// - `filename_prefix`: Prefix for log files (e.g. "imgkit.log")
/// - `level`: Default log level (e.g. "info", "debug")
pub fn init_logging(directory: &str, filename_prefix: &str, level: &str) -> Result<()> {
    // 1. File Appender with Rotation (Daily)
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(filename_prefix)
        .build(directory)
        .map_err(|e| Error::Internal(format!("Failed to create log appender: {}", e)))?;

    // 2. Formatting layers
    let stdout_layer = fmt::layer().with_target(false).compact();
    let file_layer = fmt::layer().with_writer(file_appender).with_ansi(false);

    // 3. Filter: RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to init tracing: {}", e)))?;

    Ok(())
}

/// Initialize stdout-only logging (demos and short-lived processes)
pub fn init_stdout_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to init tracing: {}", e)))?;

    Ok(())
}
