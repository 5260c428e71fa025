//! Change record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::{DecodedDiff, DiffStats};

/// Identifier of a change record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Create from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id of a record from its feed, time and content hash
    ///
    /// The id sorts with its timestamp and stays unique when a document
    /// returns to an earlier state.
    pub fn derive(feed: &str, timestamp: DateTime<Utc>, content_hash: &str) -> Self {
        let short_hash: String = content_hash.chars().take(8).collect();
        Self(format!(
            "{}-{}-{}",
            feed,
            timestamp.format("%Y%m%d%H%M%S%3f"),
            short_hash
        ))
    }

    /// Get the ID as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One observed change of a tracked document
///
/// `diff` is `None` for a baseline record, the first observation with no
/// earlier state to diff against. Records are never modified once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub source_link: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// SHA-256 of the normalized content after this change
    pub content_hash: String,
    pub diff: Option<DecodedDiff>,
}

impl ChangeRecord {
    /// Create a baseline record
    pub fn baseline(id: RecordId, timestamp: DateTime<Utc>, content_hash: impl Into<String>) -> Self {
        Self {
            id,
            timestamp,
            source_link: None,
            title: None,
            description: None,
            content_hash: content_hash.into(),
            diff: None,
        }
    }

    /// Create a record carrying a diff against the previous state
    pub fn with_diff(
        id: RecordId,
        timestamp: DateTime<Utc>,
        content_hash: impl Into<String>,
        diff: DecodedDiff,
    ) -> Self {
        Self {
            diff: Some(diff),
            ..Self::baseline(id, timestamp, content_hash)
        }
    }

    /// Set the source link
    pub fn with_source_link(mut self, link: impl Into<String>) -> Self {
        self.source_link = Some(link.into());
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this is a baseline record
    pub fn is_baseline(&self) -> bool {
        self.diff.is_none()
    }

    /// Added/removed totals of the record's parsed hunks
    pub fn stats(&self) -> DiffStats {
        self.diff
            .as_ref()
            .map(|d| DiffStats::from_hunks(&d.hunks))
            .unwrap_or_default()
    }

    /// Number of hunks that could not be parsed
    pub fn unparseable_hunks(&self) -> usize {
        self.diff.as_ref().map_or(0, |d| d.unparseable.len())
    }
}
