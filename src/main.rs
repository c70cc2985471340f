use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use mru_switch::{
    app::{load_config, load_config_from, Config},
    cli::{handle_command, Cli, Commands},
    constants::LOG_FILE_NAME,
    directory::InMemoryDirectory,
    history::FilePersistence,
    tui::run_demo,
    utils::{init_file_logger, init_logger},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Demo);

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        load_config_from(config_path)?
    } else {
        match load_config() {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }
    if cli.instant_switch {
        config.switcher.instant_switch = true;
    }

    let data_dir = config.storage.resolve_data_dir()?;

    // The demo owns the terminal, so its logs go to a file
    if cli.verbose {
        if command == Commands::Demo {
            init_file_logger(&data_dir.join(LOG_FILE_NAME))?;
        } else {
            init_logger();
        }
    }

    let directory = match &cli.fixture {
        Some(path) => Arc::new(
            InMemoryDirectory::from_toml_file(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?,
        ),
        None => Arc::new(InMemoryDirectory::sample()),
    };
    let persistence = Arc::new(FilePersistence::new(data_dir));

    if handle_command(&command, directory.clone(), persistence.clone())? {
        return Ok(());
    }

    run_demo(config, directory, persistence)
}
