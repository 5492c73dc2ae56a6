//! Configuration for codeinit.
//!
//! Settings are layered:
//! - Default values
//! - TOML settings file
//! - Environment variable overrides
//!
//! A `.json` settings path is read in the legacy format instead: a single
//! object keyed by category name, each value holding `depth` and
//! `excluded_dirs`. Everything else then takes its default.
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CODEINIT_` and use double
//! underscores to separate nested levels:
//! - `CODEINIT_ROOT=/srv/code` sets `root`
//! - `CODEINIT_QUEUE_CAPACITY=256` sets `queue_capacity`
//! - `CODEINIT_LOGGING__DEFAULT=debug` sets `logging.default`
//!
//! Category tables (`categories.*`, `commands.categories.*`) are keyed by
//! case-sensitive names and are only read from the settings file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::{CategoryRegistry, CategoryRule};
use crate::dispatch::CommandRegistry;

const ENV_PREFIX: &str = "CODEINIT_";

/// Errors from loading or validating configuration. All are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}\nRun 'codeinit init' to create one")]
    NotFound { path: PathBuf },

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("Failed to parse legacy config {path}: {source}")]
    LegacyJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Cannot determine home directory; set `root` in the settings file")]
    NoHome,

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Watched root directory (defaults to `<home>/Code`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Capacity of the queue between the filesystem backend and the loop
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Kill initialization commands running longer than this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,

    /// Category rules keyed by top-level directory name
    #[serde(default)]
    pub categories: CategoryRegistry,

    /// Initialization command sets
    #[serde(default)]
    pub commands: CommandRegistry,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target level overrides, e.g. `codeinit::dispatch = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_queue_capacity() -> usize {
    64
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            root: None,
            queue_capacity: default_queue_capacity(),
            command_timeout_secs: None,
            categories: CategoryRegistry::new(),
            commands: CommandRegistry::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Settings written by `codeinit init`: defaults plus example categories.
    pub fn example() -> Self {
        Self {
            categories: CategoryRegistry::new()
                .with_rule("Go", CategoryRule::new(2).exclude("vendor"))
                .with_rule("Rust", CategoryRule::new(2).exclude("target")),
            ..Self::default()
        }
    }

    /// Default settings file location: `<config_dir>/codeinit/settings.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("codeinit").join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Load configuration from a settings file, with environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_prefix(path.as_ref(), ENV_PREFIX)
    }

    fn load_with_prefix(path: &Path, env_prefix: &str) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let figment = if is_legacy_json(path) {
            Self::legacy_figment(path)?
        } else {
            Figment::new()
                .merge(Serialized::defaults(Settings::default()))
                .merge(Toml::file(path))
        };

        let settings: Settings = figment
            // Double underscore becomes a dot; single underscores stay in field names
            .merge(Env::prefixed(env_prefix).filter_map(|key| {
                let key = key.as_str().to_lowercase();
                (!is_category_table_key(&key)).then(|| key.replace("__", ".").into())
            }))
            .extract()
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Figment seeded from the legacy JSON category map.
    fn legacy_figment(path: &Path) -> Result<Figment, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let categories: BTreeMap<String, CategoryRule> =
            serde_json::from_str(&content).map_err(|source| ConfigError::LegacyJson {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Serialized::default("categories", categories)))
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "queue_capacity must be at least 1".to_string(),
            ));
        }

        if self.command_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "command_timeout_secs must be at least 1; omit it for no timeout".to_string(),
            ));
        }

        for (name, rule) in self.categories.iter() {
            if rule.depth == 0 {
                return Err(ConfigError::Invalid(format!(
                    "category '{name}' has depth 0; depth must be at least 1"
                )));
            }
        }

        if let Some(command) = self
            .commands
            .all_commands()
            .find(|command| command.program.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "command with empty program (args: {:?})",
                command.args
            )));
        }

        Ok(())
    }

    /// The watched root: `root` if set, otherwise `<home>/Code`.
    pub fn watch_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => dirs::home_dir()
                .map(|home| home.join("Code"))
                .ok_or(ConfigError::NoHome),
        }
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_error = |reason: String| ConfigError::Write {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(|e| write_error(e.to_string()))?;
        std::fs::write(path, toml_string).map_err(|e| write_error(e.to_string()))?;

        Ok(())
    }

    /// Create a settings file with the example categories.
    pub fn init_config_file(path: &Path, force: bool) -> Result<(), ConfigError> {
        if !force && path.exists() {
            return Err(ConfigError::Write {
                path: path.to_path_buf(),
                reason: "configuration file already exists. Use --force to overwrite".to_string(),
            });
        }

        Self::example().save(path)
    }
}

/// Category names are case-sensitive table keys, which lowercased env keys
/// cannot address.
fn is_category_table_key(key: &str) -> bool {
    key == "categories"
        || key.starts_with("categories__")
        || key == "commands__categories"
        || key.starts_with("commands__categories__")
}

fn is_legacy_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
