use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::AppError};

const LOG_FILE_PREFIX: &str = "codebluer.log";

/// Installs the global subscriber. The TUI owns the terminal, so logs go to
/// a daily file under `log_dir` unless `stderr` is set. Keep the returned
/// guard alive until exit or buffered lines are lost.
pub fn init(config: &LogConfig, log_dir: &Path) -> Result<Option<WorkerGuard>, AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(AppError::LoggingInit)?;
        return Ok(None);
    }

    std::fs::create_dir_all(log_dir).map_err(|source| AppError::StorageDirCreate {
        path: log_dir.to_path_buf(),
        source,
    })?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(AppError::LoggingInit)?;

    Ok(Some(guard))
}
