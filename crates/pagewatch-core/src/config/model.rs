//! Configuration model

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::detector::{ChangeDetector, Normalization};
use crate::diff::{Alignment, DEFAULT_CONTEXT_LINES};
use crate::reconstruct::Reconstructor;

use super::logging_config::LoggingConfig;

/// Where archives are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; `~` is expanded
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = dirs::home_dir()
            .map(|home| home.join(".pagewatch").join("archive"))
            .unwrap_or_else(|| PathBuf::from(".pagewatch/archive"));
        Self { dir }
    }
}

impl StorageConfig {
    /// The storage directory with `~` expanded
    pub fn resolved_dir(&self) -> PathBuf {
        let raw = self.dir.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }
}

/// Diff generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Unchanged lines kept around each change
    pub context_lines: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

/// Change detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub normalization: Normalization,
}

/// History retention and reconstruction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Keep at most this many records per feed; unlimited when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_records: Option<usize>,
    /// Fail reconstruction when context lines do not match
    pub strict_context: bool,
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub diff: DiffConfig,
    pub detector: DetectorConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// A change detector configured from this config
    pub fn detector(&self) -> ChangeDetector {
        ChangeDetector::new()
            .with_normalization(self.detector.normalization)
            .with_context_lines(self.diff.context_lines)
    }

    /// A reconstructor configured from this config
    pub fn reconstructor(&self) -> Reconstructor {
        let alignment = if self.history.strict_context {
            Alignment::Strict
        } else {
            Alignment::Lenient
        };
        Reconstructor::new().with_alignment(alignment)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> crate::error::WatchResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
