//! Configuration management commands

use std::path::Path;

use colored::*;
use pagewatch_core::config::{Config, ConfigValidator, config_path, write_default_file};
use pagewatch_core::error::WatchResult;

use crate::console::CliConsole;

/// Show the effective configuration
pub fn show(config: &Config, explicit: Option<&Path>) -> WatchResult<()> {
    let console = CliConsole::new(true);
    let path = config_path(explicit);

    if path.exists() {
        console.info(&format!("Loaded configuration from: {}", path.display()));
    } else {
        console.info("Using default configuration");
    }

    print!("{}", config.to_toml()?);
    println!(
        "{} {}",
        "# resolved storage dir:".dimmed(),
        config.storage.resolved_dir().display()
    );
    Ok(())
}

/// Validate the effective configuration
pub fn validate(config: &Config) -> WatchResult<()> {
    let console = CliConsole::new(true);
    ConfigValidator::validate(config)?;
    console.success("Configuration is valid");
    Ok(())
}

/// Initialize a new configuration file
pub fn init(explicit: Option<&Path>) -> WatchResult<()> {
    let console = CliConsole::new(true);
    let path = config_path(explicit);

    write_default_file(&path, &Config::default())?;
    console.success(&format!("Created configuration file: {}", path.display()));
    Ok(())
}
