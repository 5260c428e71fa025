//! UnifiedError trait implementation for WatchError

use super::types::{UnifiedError, WatchError};

impl UnifiedError for WatchError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "PW_CONFIG",
            Self::Io { .. } => "PW_IO",
            Self::Json { .. } => "PW_JSON",
            Self::InvalidInput { .. } => "PW_INVALID_INPUT",
            Self::Storage { .. } => "PW_STORAGE",
            Self::NotFound { .. } => "PW_NOT_FOUND",
            Self::Diff { .. } => "PW_DIFF",
            Self::Reconstruction { .. } => "PW_RECONSTRUCTION",
            Self::Other { .. } => "PW_OTHER",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::Io { message, .. }
            | Self::Json { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::Storage { message, .. }
            | Self::NotFound { message, .. }
            | Self::Diff { message, .. }
            | Self::Reconstruction { message, .. }
            | Self::Other { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. }
            | Self::Io { context, .. }
            | Self::Json { context, .. }
            | Self::InvalidInput { context, .. }
            | Self::Storage { context, .. }
            | Self::NotFound { context, .. }
            | Self::Diff { context, .. }
            | Self::Reconstruction { context, .. }
            | Self::Other { context, .. } => context.as_deref(),
        }
    }
}
