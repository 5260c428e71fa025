//! Core error types and traits

use thiserror::Error;

/// Result type alias for pagewatch operations
pub type WatchResult<T> = Result<T, WatchError>;

/// Unified error trait implemented by [`WatchError`].
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C: std::fmt::Display>(self, context: C) -> WatchResult<T>;

    /// Add context lazily (only evaluated on error)
    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> WatchResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context<C: std::fmt::Display>(self, context: C) -> WatchResult<T> {
        self.map_err(|e| WatchError::other(format!("{}: {}", context, e)))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> WatchResult<T> {
        self.map_err(|e| WatchError::other(format!("{}: {}", f(), e)))
    }
}

/// Main error type for pagewatch
#[derive(Error, Debug, Clone)]
pub enum WatchError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// Storage/persistence errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        context: Option<String>,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
        context: Option<String>,
    },

    /// A diff could not be applied to the text it was given
    #[error("Diff error: {message}")]
    Diff {
        message: String,
        hunk: Option<usize>,
        context: Option<String>,
    },

    /// Reconstruction aborted part way through the fold
    #[error("Reconstruction failed at record {record_id}: {message}")]
    Reconstruction {
        record_id: String,
        message: String,
        context: Option<String>,
    },

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}
