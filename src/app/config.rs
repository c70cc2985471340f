use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    APP_NAME, DEFAULT_MAX_SESSION_MS, DEFAULT_ROW_LENGTH, DEFAULT_TOAST_DURATION_MS, ENV_PREFIX,
};
use crate::indicator::IndicatorStyle;
use crate::session::{clamp_row_length, WindowMode};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Gesture behavior
    #[serde(default)]
    pub switcher: SwitcherConfig,

    /// Indicator presentation
    #[serde(default)]
    pub indicator: IndicatorConfig,

    /// Where history is stored
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Gesture behavior settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherConfig {
    /// Navigate on every step instead of only when the modifier is released
    pub instant_switch: bool,
    /// Force-end a gesture open longer than this (0 disables the bound)
    pub max_session_ms: u64,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            instant_switch: false,
            max_session_ms: DEFAULT_MAX_SESSION_MS,
        }
    }
}

impl SwitcherConfig {
    pub fn max_session(&self) -> Option<Duration> {
        (self.max_session_ms > 0).then(|| Duration::from_millis(self.max_session_ms))
    }
}

/// Indicator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// overlay, toast or off
    pub style: IndicatorStyle,
    /// row or current
    pub overlay_mode: WindowMode,
    /// Entries per overlay page, clamped to 3..=7 when read
    pub row_length: usize,
    /// Show avatars next to names
    pub show_avatars: bool,
    /// How long a toast stays visible
    pub toast_duration_ms: u64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            style: IndicatorStyle::Overlay,
            overlay_mode: WindowMode::Row,
            row_length: DEFAULT_ROW_LENGTH,
            show_avatars: true,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
        }
    }
}

impl IndicatorConfig {
    pub fn row_length(&self) -> usize {
        clamp_row_length(self.row_length)
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the platform data directory
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Directory holding the persisted history
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            Ok(proj_dirs.data_dir().to_path_buf())
        } else {
            let home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .context("Could not determine home directory")?;
            Ok(PathBuf::from(home).join(".local").join("share").join(APP_NAME))
        }
    }
}

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).split("__")
}

/// Load configuration from defaults, global and local files, then environment
pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir()?;
    let global_config = config_dir.join("config.toml");
    let local_config = PathBuf::from(format!(".{}/config.toml", APP_NAME));

    let mut figment = base_figment();

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    figment = figment.merge(env_provider());

    figment.extract().context("Failed to load configuration")
}

/// Load configuration from one explicit file, still honoring the environment
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    base_figment()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        Ok(proj_dirs.config_dir().to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join(APP_NAME))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(path)
}

/// Create a default configuration file if it doesn't exist
///
/// Returns the path when a new file was written.
pub fn init_config() -> Result<Option<PathBuf>> {
    let config_file = get_config_dir()?.join("config.toml");
    if config_file.exists() {
        return Ok(None);
    }
    save_config(&Config::default(), Some(config_file)).map(Some)
}
