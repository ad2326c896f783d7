//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info, warn};
use thiserror::Error;

use floorplan::{FloorplanError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for FloorplanError {
    fn from(err: ConfigError) -> Self {
        FloorplanError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (floorplan/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - Config values cannot describe a usable canvas or size limits
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, FloorplanError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("floorplan/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "floorplan", "floorplan") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
/// - Validation fails
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, FloorplanError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.grid().size() <= 0 {
        return Err(ConfigError::Validation(format!(
            "grid.size must be positive, got {}",
            config.grid().size()
        )));
    }

    let canvas = config.canvas();
    if canvas.width() <= 0 || canvas.height() <= 0 {
        return Err(ConfigError::Validation(format!(
            "canvas must have a positive area, got {}x{}",
            canvas.width(),
            canvas.height()
        )));
    }

    let grid = config.grid().size();
    let limits = config.limits();
    let bounds = [
        ("limits.room_min", limits.room_min()),
        ("limits.facility_min", limits.facility_min()),
        ("limits.max", limits.max()),
    ];
    for (name, value) in bounds {
        if value <= 0 {
            return Err(ConfigError::Validation(format!(
                "{name} must be positive, got {value}"
            )));
        }
        if value % grid != 0 {
            warn!(name, value, grid; "Size limit is not a multiple of the grid, resized entities may leave the grid");
        }
    }

    let largest_min = limits.room_min().max(limits.facility_min());
    if limits.max() < largest_min {
        return Err(ConfigError::Validation(format!(
            "limits.max must be at least {largest_min}, got {}",
            limits.max()
        )));
    }

    Ok(())
}
