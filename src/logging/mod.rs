//! Tracing subscriber initialization.
//!
//! The terminal UI owns stdout, so logs go to a file. Follow them with
//! `tail -f` from another terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Path has no file name component.
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Path has no directory component.
    #[error("Log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// A global subscriber was installed earlier.
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Split a log path into the directory to create and the file name to append to.
fn split_log_path(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;
    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;
    Ok((directory, file_name))
}

/// Install the global subscriber, appending to `log_path`.
///
/// Respects `RUST_LOG`, defaulting to [`DEFAULT_FILTER`]. The log directory is
/// created if missing, even when a subscriber is already installed.
///
/// # Errors
///
/// Returns [`LoggingError`] if the path is unusable, the directory cannot be
/// created, or a global subscriber is already set.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let (directory, file_name) = split_log_path(log_path)?;
    if !directory.as_os_str().is_empty() {
        std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
            path: directory.to_path_buf(),
            source,
        })?;
    }

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
