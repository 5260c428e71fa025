//! Published archive state and the single-writer ingestion path
//!
//! An [`ArchiveState`] pairs the current snapshot with the history index that
//! leads to it. States are immutable; ingestion builds a complete new state,
//! persists it, and only then swaps it in, so readers holding an
//! `Arc<ArchiveState>` always see a consistent pair.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::detector::{ChangeDetector, Detection, Observation};
use crate::error::{WatchError, WatchResult};
use crate::history::HistoryIndex;
use crate::reconstruct::{Reconstruction, Reconstructor};
use crate::storage::HistoryStorage;

/// The most recent known full text of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub observed_at: DateTime<Utc>,
    pub content_hash: String,
}

/// A snapshot and the history leading to it
#[derive(Debug, Clone, Default)]
pub struct ArchiveState {
    pub snapshot: Option<Snapshot>,
    pub history: HistoryIndex,
}

impl ArchiveState {
    /// Text of the current snapshot, empty when nothing was observed yet
    pub fn snapshot_text(&self) -> &str {
        self.snapshot.as_ref().map_or("", |s| s.text.as_str())
    }
}

/// Live archive of one tracked feed
pub struct Archive {
    feed: String,
    state: RwLock<Arc<ArchiveState>>,
    /// Serializes detect-persist-publish
    writer: Mutex<()>,
    detector: ChangeDetector,
    storage: Arc<dyn HistoryStorage>,
    max_records: Option<usize>,
}

impl Archive {
    /// Load the feed's archive from storage
    pub async fn open(
        feed: impl Into<String>,
        storage: Arc<dyn HistoryStorage>,
        detector: ChangeDetector,
    ) -> WatchResult<Self> {
        let feed = feed.into();
        let state = storage.load(&feed).await?;
        tracing::debug!(feed = %feed, records = state.history.len(), "opened archive");

        Ok(Self {
            feed,
            state: RwLock::new(Arc::new(state)),
            writer: Mutex::new(()),
            detector,
            storage,
            max_records: None,
        })
    }

    /// Load a feed that must already have been recorded
    pub async fn open_existing(
        feed: impl Into<String>,
        storage: Arc<dyn HistoryStorage>,
        detector: ChangeDetector,
    ) -> WatchResult<Self> {
        let feed = feed.into();
        if !storage.exists(&feed).await? {
            return Err(WatchError::not_found_resource(
                format!("no history recorded for feed '{}'", feed),
                "feed",
            ));
        }
        Self::open(feed, storage, detector).await
    }

    /// Keep at most `max` records, dropping the oldest
    pub fn with_max_records(mut self, max: Option<usize>) -> Self {
        self.max_records = max;
        self
    }

    /// Feed name
    pub fn feed(&self) -> &str {
        &self.feed
    }

    /// The currently published state
    pub fn current(&self) -> Arc<ArchiveState> {
        self.state.read().clone()
    }

    /// Record an observation
    ///
    /// The new state is persisted before it is published; on error the
    /// published state is left as it was.
    pub async fn observe(&self, observation: Observation) -> WatchResult<Detection> {
        let _guard = self.writer.lock().await;
        let previous = self.current();

        let (record, state) = match self.detector.detect(&self.feed, &previous, observation)? {
            Detection::Changed { record, state } => (record, state),
            unchanged => return Ok(unchanged),
        };

        let (state, dropped) = match self.max_records {
            Some(max) if state.history.len() > max => {
                let dropped: Vec<_> = state.history.records()[max..]
                    .iter()
                    .map(|r| r.id.clone())
                    .collect();
                let trimmed = ArchiveState {
                    history: state.history.retain_newest(max),
                    snapshot: state.snapshot,
                };
                (trimmed, dropped)
            }
            _ => (state, Vec::new()),
        };

        if let Some(snapshot) = &state.snapshot {
            self.storage.commit(&self.feed, &record, snapshot).await?;
        }
        *self.state.write() = Arc::new(state.clone());

        for id in &dropped {
            if let Err(e) = self.storage.remove(&self.feed, id).await {
                tracing::warn!(feed = %self.feed, id = %id, error = %e, "failed to remove trimmed record");
            }
        }
        if !dropped.is_empty() {
            tracing::info!(feed = %self.feed, dropped = dropped.len(), "trimmed history");
        }

        Ok(Detection::Changed { record, state })
    }

    /// Reconstruct the document as of `target` from the published state
    pub fn reconstruct(
        &self,
        reconstructor: &Reconstructor,
        target: Option<DateTime<Utc>>,
    ) -> WatchResult<Reconstruction> {
        let state = self.current();
        reconstructor.reconstruct_state(&state, target)
    }
}
