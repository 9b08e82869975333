//! TOML configuration file I/O
//!
//! Handles loading and saving panel configuration to/from TOML files
//! in the user's configuration directory.

use crate::config::PanelConfig;
use crate::error::{ConfigError, PanelError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "VPN_PANEL_CONFIG_DIR";

/// Get the default configuration directory
///
/// Returns ~/.config/vpn-panel, or VPN_PANEL_CONFIG_DIR if set
pub fn get_config_dir() -> Result<PathBuf, PanelError> {
    if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        PanelError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    Ok(PathBuf::from(home).join(".config").join("vpn-panel"))
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, PanelError> {
    let config_dir = get_config_dir()?;
    Ok(config_dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the default TOML file
///
/// A missing file is not an error; the built-in defaults are returned.
pub fn load_config() -> Result<PanelConfig, PanelError> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        debug!("No configuration at {:?}, using defaults", config_path);
        return Ok(PanelConfig::default());
    }
    load_config_from_path(&config_path)
}

/// Load configuration from a specific TOML file
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<PanelConfig, PanelError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PanelError::Config(ConfigError::LoadFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        }),
        _ => PanelError::Config(ConfigError::IoError {
            message: format!("Failed to read config file: {}", e),
        }),
    })?;

    let config: PanelConfig = toml::from_str(&contents)?;

    config
        .validate()
        .map_err(|e| PanelError::Config(ConfigError::ValidationError { message: e }))?;

    info!(
        "Loaded configuration: connect={}ms, disconnect={}ms, catalog={}ms, default_server={}",
        config.connect_delay_ms,
        config.disconnect_delay_ms,
        config.catalog_delay_ms,
        config.default_server
    );

    Ok(config)
}

/// Save configuration to the default TOML file
pub fn save_config(config: &PanelConfig) -> Result<PathBuf, PanelError> {
    let config_path = get_config_path()?;
    save_config_to_path(config, &config_path)?;
    Ok(config_path)
}

/// Save configuration to a specific TOML file
pub fn save_config_to_path<P: AsRef<Path>>(config: &PanelConfig, path: P) -> Result<(), PanelError> {
    config
        .validate()
        .map_err(|e| PanelError::Config(ConfigError::ValidationError { message: e }))?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PanelError::Config(ConfigError::IoError {
                message: format!("Failed to create config directory: {}", e),
            })
        })?;
    }

    let contents = toml::to_string_pretty(config)?;

    std::fs::write(&path, contents).map_err(|_e| {
        PanelError::Config(ConfigError::SaveFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        })
    })?;

    info!("Saved configuration to {:?}", path.as_ref());
    Ok(())
}

/// Check if a configuration file exists
pub fn config_exists() -> Result<bool, PanelError> {
    let config_path = get_config_path()?;
    Ok(config_path.exists())
}
