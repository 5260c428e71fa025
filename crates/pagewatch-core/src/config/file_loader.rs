//! File-based configuration loading

use std::fs;
use std::path::Path;

use crate::error::{WatchError, WatchResult};

use super::model::Config;

/// Load configuration from a file
///
/// Supports TOML and JSON formats based on file extension.
/// Returns default config if file doesn't exist.
pub fn load_from_file(path: &Path) -> WatchResult<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        WatchError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            WatchError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
        _ => toml::from_str(&content).map_err(|e| {
            WatchError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}

/// Write configuration to a file, refusing to overwrite an existing one
pub fn write_default_file(path: &Path, config: &Config) -> WatchResult<()> {
    if path.exists() {
        return Err(WatchError::config(format!(
            "Config file '{}' already exists",
            path.display()
        )));
    }

    let content = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::to_string_pretty(config)?,
        _ => config.to_toml()?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
