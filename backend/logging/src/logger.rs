//! Structured Logger
//!
//! Wraps `tracing` to provide console output plus a daily-rolling NDJSON
//! file, with `RUST_LOG` taking precedence over the configured level.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix for the rolling log, e.g. `churnguard.log.2024-03-01`.
pub const LOG_FILE_PREFIX: &str = "churnguard.log";

/// Initialize the global structured logger.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    // Console goes to stderr: stdout carries replay output.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        init_logger(dir.path(), "debug");
        init_logger(dir.path(), "info");
        tracing::info!("logger initialised");
    }
}
