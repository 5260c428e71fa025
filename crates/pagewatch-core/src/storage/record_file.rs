//! On-disk form of a change record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diff::{decode, serialize};
use crate::history::{ChangeRecord, RecordId};

/// A change record as stored, with its diff in text form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct StoredRecord {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub source_link: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub content_hash: String,
    #[serde(default)]
    pub diff: Option<String>,
}

impl From<&ChangeRecord> for StoredRecord {
    fn from(record: &ChangeRecord) -> Self {
        Self {
            id: record.id.clone(),
            timestamp: record.timestamp,
            source_link: record.source_link.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            content_hash: record.content_hash.clone(),
            diff: record.diff.as_ref().map(|d| serialize(&d.hunks)),
        }
    }
}

impl From<StoredRecord> for ChangeRecord {
    fn from(stored: StoredRecord) -> Self {
        Self {
            id: stored.id,
            timestamp: stored.timestamp,
            source_link: stored.source_link,
            title: stored.title,
            description: stored.description,
            content_hash: stored.content_hash,
            diff: stored.diff.as_deref().map(decode),
        }
    }
}

/// File name of a record: sortable timestamp, then id
pub(super) fn record_file_name(record: &ChangeRecord) -> String {
    format!(
        "{}-{}.json",
        record.timestamp.format("%Y%m%dT%H%M%S%3fZ"),
        record.id
    )
}

/// Whether `file_name` is the file of record `id`
pub(super) fn is_record_file(file_name: &str, id: &RecordId) -> bool {
    file_name
        .strip_suffix(".json")
        .and_then(|stem| stem.strip_suffix(id.as_str()))
        .and_then(|prefix| prefix.strip_suffix('-'))
        .is_some_and(|stamp| !stamp.is_empty() && !stamp.contains('-'))
}
