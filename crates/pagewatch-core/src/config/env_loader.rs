//! Environment variable overrides

use std::env;
use std::path::PathBuf;

use crate::detector::Normalization;
use crate::error::{WatchError, WatchResult};

use super::model::Config;

pub const ENV_STORAGE_DIR: &str = "PAGEWATCH_STORAGE_DIR";
pub const ENV_LOG_LEVEL: &str = "PAGEWATCH_LOG_LEVEL";
pub const ENV_CONTEXT_LINES: &str = "PAGEWATCH_CONTEXT_LINES";
pub const ENV_NORMALIZATION: &str = "PAGEWATCH_NORMALIZATION";

/// Apply `PAGEWATCH_*` environment variables on top of `config`
pub fn apply_env_overrides(config: &mut Config) -> WatchResult<()> {
    apply_overrides(config, |key| env::var(key).ok())
}

/// Apply overrides read through `lookup`
pub(crate) fn apply_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> WatchResult<()> {
    if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|v| !v.is_empty()) {
        config.storage.dir = PathBuf::from(dir);
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
        config.logging.level = level;
    }

    if let Some(value) = lookup(ENV_CONTEXT_LINES) {
        config.diff.context_lines = value
            .trim()
            .parse()
            .map_err(|_| WatchError::config(format!("Invalid {} value '{}'", ENV_CONTEXT_LINES, value)))?;
    }

    if let Some(value) = lookup(ENV_NORMALIZATION) {
        config.detector.normalization = match value.trim() {
            "exact" => Normalization::Exact,
            "trailing-whitespace" => Normalization::TrailingWhitespace,
            "whitespace" => Normalization::Whitespace,
            other => {
                return Err(WatchError::config(format!(
                    "Invalid {} value '{}'",
                    ENV_NORMALIZATION, other
                )));
            }
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        apply_overrides(
            &mut config,
            lookup(&[
                (ENV_STORAGE_DIR, "/tmp/archive"),
                (ENV_LOG_LEVEL, "debug"),
                (ENV_CONTEXT_LINES, "5"),
                (ENV_NORMALIZATION, "exact"),
            ]),
        )
        .unwrap();

        assert_eq!(config.storage.dir, PathBuf::from("/tmp/archive"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.diff.context_lines, 5);
        assert_eq!(config.detector.normalization, Normalization::Exact);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = Config::default();
        apply_overrides(&mut config, lookup(&[(ENV_STORAGE_DIR, ""), (ENV_LOG_LEVEL, "")])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = Config::default();
        assert!(apply_overrides(&mut config, lookup(&[(ENV_CONTEXT_LINES, "many")])).is_err());
        assert!(apply_overrides(&mut config, lookup(&[(ENV_NORMALIZATION, "fuzzy")])).is_err());
    }
}
