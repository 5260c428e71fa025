//! In-memory archive storage implementation

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::archive::{ArchiveState, Snapshot};
use crate::error::WatchResult;
use crate::history::{ChangeRecord, RecordId};

use super::{HistoryStorage, assemble_state};

#[derive(Default)]
struct StoredFeed {
    snapshot: Option<String>,
    records: Vec<ChangeRecord>,
}

/// In-memory archive storage (for tests and dry runs)
#[derive(Default)]
pub struct MemoryHistoryStorage {
    feeds: RwLock<HashMap<String, StoredFeed>>,
}

impl MemoryHistoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStorage for MemoryHistoryStorage {
    async fn load(&self, feed: &str) -> WatchResult<ArchiveState> {
        let feeds = self.feeds.read().await;
        match feeds.get(feed) {
            Some(stored) => assemble_state(feed, stored.snapshot.clone(), stored.records.clone()),
            None => Ok(ArchiveState::default()),
        }
    }

    async fn exists(&self, feed: &str) -> WatchResult<bool> {
        let feeds = self.feeds.read().await;
        Ok(feeds.get(feed).is_some_and(|f| f.snapshot.is_some()))
    }

    async fn commit(
        &self,
        feed: &str,
        record: &ChangeRecord,
        snapshot: &Snapshot,
    ) -> WatchResult<()> {
        let mut feeds = self.feeds.write().await;
        let stored = feeds.entry(feed.to_string()).or_default();
        stored.records.retain(|r| r.id != record.id);
        stored.records.push(record.clone());
        stored.snapshot = Some(snapshot.text.clone());
        Ok(())
    }

    async fn remove(&self, feed: &str, id: &RecordId) -> WatchResult<()> {
        let mut feeds = self.feeds.write().await;
        if let Some(stored) = feeds.get_mut(feed) {
            stored.records.retain(|r| &r.id != id);
        }
        Ok(())
    }

    async fn feeds(&self) -> WatchResult<Vec<String>> {
        let feeds = self.feeds.read().await;
        let mut names: Vec<String> = feeds
            .iter()
            .filter(|(_, f)| f.snapshot.is_some())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}
