//! Logging
//!
//! Installs the global `tracing` subscriber:
//! 1. A stderr logger (pretty formatted), so stdout stays clean for JSON output.
//! 2. An optional file logger (JSON formatted, daily rolling, non-blocking).
//! 3. A bridge from `log` records to `tracing`.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_NAME: &str = "mtg-query.log";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Directory for the JSON log file; `None` disables file logging
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// The platform data directory, e.g. `~/.local/share/mtg-query/logs`.
    pub fn default_log_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("mtg-query").join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logging system.
///
/// Returns a `WorkerGuard` when file logging is enabled; keep it alive for
/// the duration of the program so buffered records are flushed on exit.
/// Calling this twice leaves the first subscriber in place.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = env_filter(&config.level);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .pretty()
        .with_filter(filter.clone());

    let (file_layer, guard) = match &config.log_dir {
        Some(log_dir) => match fs::create_dir_all(log_dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .json()
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .with_filter(filter);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!("Failed to create logs directory {}: {}", log_dir.display(), e);
                (None, None)
            }
        },
        None => (None, None),
    };

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_err()
    {
        return guard;
    }

    // The subscriber may already have installed the `log` bridge.
    let _ = tracing_log::LogTracer::init();

    match &config.log_dir {
        Some(dir) => log::info!(
            "Logging initialized. Writing to: {:?} (daily rolling)",
            dir.join(LOG_FILE_NAME)
        ),
        None => log::debug!("Logging initialized (stderr only)"),
    }

    guard
}
