//! Error types for command dispatch.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors from running a single initialization command.
///
/// None of these are fatal: the dispatcher logs them and moves on to the
/// next command in the set.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Cannot use {path} as working directory: {reason}")]
    WorkingDir { path: PathBuf, reason: String },

    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited unsuccessfully ({status})")]
    Failed { command: String, status: String },

    #[error("'{command}' timed out after {}s and was killed", .after.as_secs())]
    TimedOut { command: String, after: Duration },
}
