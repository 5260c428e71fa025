//! Configuration management
//!
//! Settings come from a TOML or JSON file, then `PAGEWATCH_*` environment
//! variables, then command line flags applied by the caller.

mod env_loader;
mod file_loader;
mod logging_config;
mod model;
mod sites;
mod validation;

use std::path::{Path, PathBuf};

use crate::error::{WatchError, WatchResult};

pub use env_loader::{
    ENV_CONTEXT_LINES, ENV_LOG_LEVEL, ENV_NORMALIZATION, ENV_STORAGE_DIR, apply_env_overrides,
};
pub use file_loader::{load_from_file, write_default_file};
pub use logging_config::LoggingConfig;
pub use model::{Config, DetectorConfig, DiffConfig, HistoryConfig, StorageConfig};
pub use sites::{SiteConfig, SiteEntry, SitesFile, load_sites};
pub use validation::{ConfigValidator, MAX_CONTEXT_LINES};

/// Config file used when none is given
pub const DEFAULT_CONFIG_FILE: &str = "pagewatch.toml";

/// Path of the config file to use
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load file then environment; the result is not yet validated
///
/// A missing default file means defaults; an explicitly named file must exist.
pub fn load_config(explicit: Option<&Path>) -> WatchResult<Config> {
    let path = config_path(explicit);
    if explicit.is_some() && !path.exists() {
        return Err(WatchError::config(format!(
            "Config file '{}' not found",
            path.display()
        )));
    }
    let mut config = load_from_file(&path)?;
    apply_env_overrides(&mut config)?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
