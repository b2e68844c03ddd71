//! Logging setup
//!
//! Stdout carries the MCP transport, so human-readable logs go to stderr.
//! When a log directory is configured, a daily-rolling JSON file is written
//! as well.

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::RelayConfig;
use crate::core::{RelayError, RelayResult};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "webhook_relay=info";

/// File name prefix for rolling log files
pub const LOG_FILE_PREFIX: &str = "webhook-relay.log";

/// Initialize the global tracing subscriber.
///
/// The returned guard must be kept alive for the lifetime of the process,
/// otherwise buffered file output is lost.
pub fn init_logging(config: &RelayConfig) -> RelayResult<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    let (file_layer, guard) = match config.log_dir.as_deref() {
        Some(dir) => {
            let (writer, guard) = log_file_writer(dir)?;
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| RelayError::InvalidConfig(format!("Failed to initialize logging: {}", e)))?;

    if let Some(dir) = config.log_dir.as_deref() {
        tracing::info!("Logging to {}", dir.display());
    }

    Ok(guard)
}

/// Create the non-blocking writer for the rolling log file
pub fn log_file_writer(dir: &Path) -> RelayResult<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}
