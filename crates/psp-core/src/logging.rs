//! Logging configuration using tracing

use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

const LOG_FILE_NAME: &str = "psp-portal.log";

/// Initialize the logging subsystem
///
/// Logs are written to `log_dir` (see [`default_log_directory`]) with daily
/// rotation. Log level is controlled by the `PSP_LOG` environment variable.
///
/// # Examples
/// ```bash
/// PSP_LOG=debug cargo test
/// PSP_LOG=psp_app=trace cargo test
/// ```
pub fn init(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);

    // Default to info, allow override via PSP_LOG
    let env_filter = EnvFilter::try_from_env("PSP_LOG")
        .unwrap_or_else(|_| EnvFilter::new("psp_app=info,psp_core=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| Error::config(format!("Logging already initialized: {}", e)))?;

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("PSP portal controllers starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Default log directory under the platform data dir
pub fn default_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("psp-portal").join("logs")
}

/// Get the log file path prefix inside `log_dir`
pub fn current_log_file(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_default_log_directory_is_namespaced() {
        let dir = default_log_directory();
        assert!(dir.ends_with("psp-portal/logs"));
    }

    #[test]
    fn test_current_log_file() {
        let temp = tempdir().unwrap();
        assert_eq!(
            current_log_file(temp.path()),
            temp.path().join("psp-portal.log")
        );
    }

    #[test]
    #[serial]
    fn test_init_creates_directory_and_rejects_second_init() {
        let temp = tempdir().unwrap();
        let log_dir = temp.path().join("nested").join("logs");

        init(&log_dir).unwrap();
        assert!(log_dir.exists());

        let err = init(&log_dir).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
