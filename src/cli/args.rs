//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Auto-initialize new project directories
#[derive(Parser, Debug)]
#[command(
    name = "codeinit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Watch a code folder and initialize tooling in new project directories",
    long_about = "Watch <home>/Code (or the configured root) for new directories and run \
                  each category's initialization commands, e.g. `cargo init` for Rust/<name>.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Examples:\n  codeinit init\n  codeinit\n  codeinit check Go/myapp\n  codeinit --config ./config.json watch"
)]
pub struct Cli {
    /// Path to a settings.toml (or legacy config.json) file
    #[arg(short, long, global = true, env = "CODEINIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Defaults to `watch`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Watch the root and initialize new project directories
    #[command(about = "Watch the root and initialize new project directories")]
    Watch,

    /// Show what would happen for a path without running anything
    #[command(
        about = "Classify a path and show the commands that would run",
        after_help = "Relative paths are resolved against the watched root.\n\nExamples:\n  codeinit check Go/myapp\n  codeinit check ~/Code/Rust/.scratch"
    )]
    Check {
        /// Path to classify
        path: PathBuf,

        /// Treat a path that does not exist yet as a file instead of a directory
        #[arg(long)]
        file: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display the effective settings")]
    Config,

    /// Create a settings file
    #[command(about = "Write a settings file with example categories")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}
