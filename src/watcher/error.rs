//! Error types for the watcher.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from establishing the filesystem subscription.
///
/// All of these are fatal: without a subscription nothing can be watched.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to initialize watcher: {reason}")]
    InitFailed { reason: String },

    #[error("Cannot watch path {path}: {reason}")]
    PathWatchFailed { path: PathBuf, reason: String },

    #[error("Event queue capacity must be at least 1")]
    InvalidCapacity,
}

impl From<notify::Error> for WatchError {
    fn from(e: notify::Error) -> Self {
        WatchError::InitFailed {
            reason: e.to_string(),
        }
    }
}
