//! Initialization commands and the category -> command set registry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An external command as an explicit program plus argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitCommand {
    /// Executable name, resolved through `PATH`.
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl InitCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for InitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Maps category names to their ordered command sets.
///
/// Categories without an entry fall back to `default`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRegistry {
    /// Command set for categories with no dedicated entry.
    #[serde(default = "default_command_set")]
    pub default: Vec<InitCommand>,

    /// Per-category command sets.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<InitCommand>>,
}

fn default_command_set() -> Vec<InitCommand> {
    vec![InitCommand::new("git", ["init"])]
}

fn builtin_category_sets() -> BTreeMap<String, Vec<InitCommand>> {
    let mut sets = BTreeMap::new();
    sets.insert(
        "Go".to_string(),
        vec![
            InitCommand::new("go", ["mod", "init"]),
            InitCommand::new("git", ["init"]),
        ],
    );
    sets.insert("Rust".to_string(), vec![InitCommand::new("cargo", ["init"])]);
    sets
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self {
            default: default_command_set(),
            categories: builtin_category_sets(),
        }
    }
}

impl CommandRegistry {
    /// Registry with only a default set and no category entries.
    pub fn with_default(default: Vec<InitCommand>) -> Self {
        Self {
            default,
            categories: BTreeMap::new(),
        }
    }

    /// Add or replace the command set for a category.
    pub fn with_category(
        mut self,
        category: impl Into<String>,
        commands: Vec<InitCommand>,
    ) -> Self {
        self.categories.insert(category.into(), commands);
        self
    }

    /// Resolve the command set for a category.
    pub fn resolve(&self, category: &str) -> &[InitCommand] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(self.default.as_slice())
    }

    /// Whether a category has its own command set.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Iterate over every configured command, default set included.
    pub fn all_commands(&self) -> impl Iterator<Item = &InitCommand> {
        self.default
            .iter()
            .chain(self.categories.values().flatten())
    }
}
