//! Configuration validation

use crate::error::{WatchError, WatchResult};

use super::model::Config;

/// Largest accepted number of context lines
pub const MAX_CONTEXT_LINES: usize = 100;

const LOG_FORMATS: &[&str] = &["json", "pretty", "compact"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    pub fn validate(config: &Config) -> WatchResult<()> {
        Self::validate_storage(config)?;
        Self::validate_limits(config)?;
        Self::validate_logging(config)?;
        Ok(())
    }

    fn validate_storage(config: &Config) -> WatchResult<()> {
        if config.storage.dir.as_os_str().is_empty() {
            return Err(WatchError::config("storage.dir cannot be empty"));
        }
        Ok(())
    }

    fn validate_limits(config: &Config) -> WatchResult<()> {
        if config.diff.context_lines > MAX_CONTEXT_LINES {
            return Err(WatchError::config(format!(
                "diff.context_lines must be at most {}, got {}",
                MAX_CONTEXT_LINES, config.diff.context_lines
            )));
        }

        if config.history.max_records == Some(0) {
            return Err(WatchError::config(
                "history.max_records must be at least 1 when set",
            ));
        }

        Ok(())
    }

    fn validate_logging(config: &Config) -> WatchResult<()> {
        let format = config.logging.format.to_ascii_lowercase();
        if !LOG_FORMATS.contains(&format.as_str()) {
            return Err(WatchError::config(format!(
                "Unknown log format '{}'. Valid formats are: {:?}",
                config.logging.format, LOG_FORMATS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_large_context() {
        let mut config = Config::default();
        config.diff.context_lines = MAX_CONTEXT_LINES;
        assert!(ConfigValidator::validate(&config).is_ok());

        config.diff.context_lines = MAX_CONTEXT_LINES + 1;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_storage_dir() {
        let mut config = Config::default();
        config.storage.dir = PathBuf::new();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_retention_and_unknown_format() {
        let mut config = Config::default();
        config.history.max_records = Some(0);
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
