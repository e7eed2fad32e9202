use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an invocation before any partial result exists.
///
/// Everything that can go wrong *during* a scan (unreadable subdirectories,
/// files vanishing under a probe, failed removals) is recorded as a
/// [`ScanError`](crate::models::report::ScanError) instead.
#[derive(Debug, Error)]
pub enum NmscanError {
    #[error("root path does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("root path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("deletion threshold must be a positive number of days")]
    InvalidThreshold,

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
