//! Persistence of snapshots and change records
//!
//! This module provides storage backends for the per-feed archive.

use async_trait::async_trait;

use crate::archive::{ArchiveState, Snapshot};
use crate::error::{WatchError, WatchResult};
use crate::history::{ChangeRecord, RecordId};

mod file_storage;
mod memory_storage;
mod record_file;

#[cfg(test)]
mod tests;

pub use file_storage::FileHistoryStorage;
pub use memory_storage::MemoryHistoryStorage;

/// Trait for archive storage backends
#[async_trait]
pub trait HistoryStorage: Send + Sync {
    /// Load a feed's snapshot and history
    ///
    /// A feed that was never recorded loads as an empty state. Unreadable or
    /// inconsistent data is an error.
    async fn load(&self, feed: &str) -> WatchResult<ArchiveState>;

    /// Check whether anything was recorded for a feed
    async fn exists(&self, feed: &str) -> WatchResult<bool>;

    /// Persist a new record and the snapshot it leads to
    async fn commit(&self, feed: &str, record: &ChangeRecord, snapshot: &Snapshot)
    -> WatchResult<()>;

    /// Remove one record
    async fn remove(&self, feed: &str, id: &RecordId) -> WatchResult<()>;

    /// Names of all stored feeds, sorted
    async fn feeds(&self) -> WatchResult<Vec<String>>;
}

/// Check that a feed name is usable as a directory name
pub fn validate_feed_name(feed: &str) -> WatchResult<()> {
    let valid = !feed.is_empty()
        && feed != "."
        && feed != ".."
        && feed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(WatchError::invalid_input_field(
            format!(
                "invalid feed name '{}': use letters, digits, '-', '_' or '.'",
                feed
            ),
            "feed",
        ))
    }
}

/// Assemble a loaded state, checking that snapshot and history agree
pub(crate) fn assemble_state(
    feed: &str,
    snapshot_text: Option<String>,
    records: Vec<ChangeRecord>,
) -> WatchResult<ArchiveState> {
    let history = crate::history::HistoryIndex::new(records);

    let snapshot = match (snapshot_text, history.newest()) {
        (Some(text), Some(newest)) => Some(Snapshot {
            text,
            observed_at: newest.timestamp,
            content_hash: newest.content_hash.clone(),
        }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(WatchError::storage(format!(
                "feed '{}' has a snapshot but no records",
                feed
            )));
        }
        (None, Some(_)) => {
            return Err(WatchError::storage(format!(
                "feed '{}' has {} records but no snapshot",
                feed,
                history.len()
            )));
        }
    };

    Ok(ArchiveState { snapshot, history })
}
