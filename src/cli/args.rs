use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mru-switch")]
#[command(version)]
#[command(about = "Alt-Tab style switching between recent conversations", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// TOML file describing the known conversations (defaults to a built-in sample)
    #[arg(long, env = "MRU_SWITCH_FIXTURE")]
    pub fixture: Option<PathBuf>,

    /// Directory holding the persisted history
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Navigate on every step instead of on modifier release
    #[arg(long)]
    pub instant_switch: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive terminal demo (default)
    Demo,
    /// Print the recent conversation list
    History,
    /// Reset the recent conversation list
    Clear,
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}
