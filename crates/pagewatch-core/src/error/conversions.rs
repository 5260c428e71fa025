//! From trait implementations for WatchError conversions

use super::types::WatchError;

impl From<anyhow::Error> for WatchError {
    fn from(error: anyhow::Error) -> Self {
        Self::other(error.to_string())
    }
}

impl From<std::io::Error> for WatchError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for WatchError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for WatchError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Invalid TOML: {}", error))
    }
}

impl From<toml::ser::Error> for WatchError {
    fn from(error: toml::ser::Error) -> Self {
        Self::config(format!("Failed to serialize TOML: {}", error))
    }
}

impl From<chrono::ParseError> for WatchError {
    fn from(error: chrono::ParseError) -> Self {
        Self::invalid_input_field(format!("Invalid timestamp: {}", error), "timestamp")
    }
}

impl From<tokio::task::JoinError> for WatchError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::other(format!("Background task failed: {}", error))
    }
}
