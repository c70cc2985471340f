use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::{
    app::init_config,
    directory::{Directory, InMemoryDirectory},
    history::{HistoryPersistence, HistoryStore},
};

use super::Commands;

/// Handle the non-interactive subcommands
///
/// Returns `false` when the caller should launch the demo instead.
pub fn handle_command(
    command: &Commands,
    directory: Arc<InMemoryDirectory>,
    persistence: Arc<dyn HistoryPersistence>,
) -> Result<bool> {
    match command {
        Commands::History => {
            show_history(directory, persistence);
            Ok(true)
        }
        Commands::Clear => {
            let mut store = HistoryStore::load(directory, persistence);
            let count = store.len();
            store.clear();
            println!("Cleared {} recent conversations", count);
            Ok(true)
        }
        Commands::Init => {
            match init_config()? {
                Some(path) => println!("Created default configuration at: {}", path.display()),
                None => println!("Configuration already exists"),
            }
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Demo => Ok(false),
    }
}

/// Print the sanitized recent list with display names
pub fn show_history(directory: Arc<InMemoryDirectory>, persistence: Arc<dyn HistoryPersistence>) {
    let store = HistoryStore::load(directory.clone(), persistence);
    if store.is_empty() {
        println!("No recent conversations.");
        return;
    }

    println!("Recent conversations:");
    for (i, id) in store.entries().iter().enumerate() {
        let info = directory.describe(id);
        println!("  {:>2}. {} {}", i + 1, info.name.green(), format!("({})", id).dimmed());
    }
}

/// Show version information
pub fn show_version() {
    println!("mru-switch v{}", env!("CARGO_PKG_VERSION"));
    println!("   Alt-Tab style switching between recent conversations");
}
