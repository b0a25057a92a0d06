//! File-backed tracing setup. The terminal belongs to the UI, so nothing is
//! written to stdout or stderr while the wizard runs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "onboarding.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Builds the filter from `RUST_LOG` when set, otherwise from `level`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Installs the global subscriber writing to `<directory>/onboarding.log`.
///
/// The returned guard flushes buffered lines when dropped and must be kept
/// alive until the program exits.
pub fn init_logging(directory: &Path, level: &str) -> Result<WorkerGuard, LoggingError> {
    fs::create_dir_all(directory).map_err(|source| LoggingError::CreateDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::never(directory, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritable_directory_reported() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // A regular file cannot hold a log directory
        let target = file.path().join("logs");
        let err = init_logging(&target, "info").unwrap_err();
        assert!(matches!(err, LoggingError::CreateDir { .. }));
    }
}
