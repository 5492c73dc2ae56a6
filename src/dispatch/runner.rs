//! Command runner seam and the process-spawning implementation.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::command::InitCommand;
use super::error::DispatchError;

/// Runs one initialization command inside a target directory.
///
/// The target directory is passed with every call; implementations must not
/// change the process-wide working directory.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` with `working_dir` as its working directory and wait for it.
    async fn run(&self, command: &InitCommand, working_dir: &Path) -> Result<(), DispatchError>;
}

/// Spawns commands as child processes.
///
/// Standard output and error are inherited so tool output reaches the
/// operator's console. Standard input is closed.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn check_working_dir(path: &Path) -> Result<(), DispatchError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| DispatchError::WorkingDir {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !metadata.is_dir() {
            return Err(DispatchError::WorkingDir {
                path: path.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &InitCommand, working_dir: &Path) -> Result<(), DispatchError> {
        Self::check_working_dir(working_dir).await?;

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| DispatchError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let waited = match self.timeout {
            Some(limit) => {
                let bounded = tokio::time::timeout(limit, child.wait()).await;
                let Ok(waited) = bounded else {
                    if let Err(e) = child.kill().await {
                        tracing::warn!("[dispatch] failed to kill '{command}': {e}");
                    }
                    return Err(DispatchError::TimedOut {
                        command: command.to_string(),
                        after: limit,
                    });
                };
                waited
            }
            None => child.wait().await,
        };

        let status = waited.map_err(|source| DispatchError::Wait {
            command: command.to_string(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(DispatchError::Failed {
                command: command.to_string(),
                status: status.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_runs_inside_working_dir() {
        let temp_dir = TempDir::new().unwrap();
        let command = InitCommand::new("touch", ["marker"]);

        ProcessRunner::new()
            .run(&command, temp_dir.path())
            .await
            .unwrap();

        assert!(temp_dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let result = ProcessRunner::new()
            .run(&InitCommand::new("false", Vec::<String>::new()), temp_dir.path())
            .await;

        assert!(matches!(result, Err(DispatchError::Failed { .. })));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let temp_dir = TempDir::new().unwrap();
        let command = InitCommand::new("codeinit-no-such-program-4821", ["init"]);
        let result = ProcessRunner::new().run(&command, temp_dir.path()).await;

        assert!(matches!(result, Err(DispatchError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_missing_working_dir() {
        let temp_dir = TempDir::new().unwrap();
        let gone = temp_dir.path().join("gone");
        let result = ProcessRunner::new()
            .run(&InitCommand::new("true", Vec::<String>::new()), &gone)
            .await;

        assert!(matches!(result, Err(DispatchError::WorkingDir { .. })));
    }

    #[tokio::test]
    async fn test_timeout_kills_command() {
        let temp_dir = TempDir::new().unwrap();
        let runner = ProcessRunner::new().with_timeout(Some(Duration::from_millis(100)));
        let result = runner
            .run(&InitCommand::new("sleep", ["5"]), temp_dir.path())
            .await;

        assert!(matches!(result, Err(DispatchError::TimedOut { .. })));
    }
}
