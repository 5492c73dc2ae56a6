//! Best-effort sequential execution of a category's command set.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::command::{CommandRegistry, InitCommand};
use super::error::DispatchError;
use super::runner::CommandRunner;

/// Result of one command within a dispatch.
#[derive(Debug)]
pub struct CommandOutcome {
    pub command: InitCommand,
    pub result: Result<(), DispatchError>,
}

/// Everything that happened while initializing one directory.
#[derive(Debug)]
pub struct DispatchReport {
    pub category: String,
    pub target: PathBuf,
    pub outcomes: Vec<CommandOutcome>,
}

impl DispatchReport {
    /// Number of commands that failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Whether every command succeeded.
    pub fn succeeded(&self) -> bool {
        self.failed_count() == 0
    }

    /// The commands that ran, in order.
    pub fn commands(&self) -> impl Iterator<Item = &InitCommand> {
        self.outcomes.iter().map(|o| &o.command)
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} commands succeeded in {}",
            self.outcomes.len() - self.failed_count(),
            self.outcomes.len(),
            self.target.display()
        )
    }
}

/// Runs the resolved command set for a category, one command at a time.
///
/// A failing command is logged and recorded; the remaining commands still run.
#[derive(Clone)]
pub struct Dispatcher {
    commands: Arc<CommandRegistry>,
    runner: Arc<dyn CommandRunner>,
}

impl Dispatcher {
    pub fn new(commands: Arc<CommandRegistry>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { commands, runner }
    }

    /// Run every command for `category` inside `target`.
    pub async fn dispatch(&self, target: &Path, category: &str) -> DispatchReport {
        let mut outcomes = Vec::new();

        for command in self.commands.resolve(category) {
            crate::log_event!(category, "running", "{command} in {}", target.display());

            let result = self.runner.run(command, target).await;
            match &result {
                Ok(()) => crate::debug_event!(category, "finished", "{command}"),
                Err(e) => tracing::error!("[{category}] {e}"),
            }

            outcomes.push(CommandOutcome {
                command: command.clone(),
                result,
            });
        }

        DispatchReport {
            category: category.to_string(),
            target: target.to_path_buf(),
            outcomes,
        }
    }
}
