use std::path::Path;

use clap::Parser;
use codeinit::cli::commands::{check, init, watch};
use codeinit::cli::{Cli, Commands};
use codeinit::{Settings, logging, platform};

/// Load settings or exit with a diagnostic.
fn load_settings(config_path: &Path) -> Settings {
    Settings::load_from(config_path).unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = platform::ensure_supported() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let config_path = cli.config.unwrap_or_else(Settings::default_config_path);

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Init { force } => {
            logging::init();
            init::run_init(&config_path, force);
        }

        Commands::Config => {
            let settings = load_settings(&config_path);
            init::run_config(&settings);
        }

        Commands::Check { path, file } => {
            let settings = load_settings(&config_path);
            logging::init_with_config(&settings.logging);
            check::run(&settings, &path, file);
        }

        Commands::Watch => {
            let settings = load_settings(&config_path);
            logging::init_with_config(&settings.logging);
            if let Err(e) = watch::run(settings).await {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}
