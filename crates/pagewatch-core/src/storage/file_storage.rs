//! File-based archive storage implementation

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::archive::{ArchiveState, Snapshot};
use crate::error::{WatchError, WatchResult};
use crate::history::{ChangeRecord, RecordId};

use super::record_file::{StoredRecord, is_record_file, record_file_name};
use super::{HistoryStorage, assemble_state, validate_feed_name};

const SNAPSHOT_FILE: &str = "snapshot.txt";
const RECORDS_DIR: &str = "records";

/// File-based archive storage
///
/// Stores each feed in its own directory:
/// ```text
/// base_path/
///   {feed}/
///     snapshot.txt
///     records/
///       {timestamp}-{record_id}.json
/// ```
pub struct FileHistoryStorage {
    base_path: PathBuf,
}

impl FileHistoryStorage {
    /// Create storage rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn feed_dir(&self, feed: &str) -> PathBuf {
        self.base_path.join(feed)
    }

    fn snapshot_path(&self, feed: &str) -> PathBuf {
        self.feed_dir(feed).join(SNAPSHOT_FILE)
    }

    fn records_dir(&self, feed: &str) -> PathBuf {
        self.feed_dir(feed).join(RECORDS_DIR)
    }

    async fn read_records(&self, feed: &str) -> WatchResult<Vec<ChangeRecord>> {
        let dir = self.records_dir(feed);
        if !fs::try_exists(&dir).await? {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut entries = fs::read_dir(&dir).await.map_err(|e| {
            WatchError::storage(format!("Failed to read records directory {:?}: {}", dir, e))
        })?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| WatchError::storage(format!("Failed to read directory entry: {}", e)))?
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let content = fs::read_to_string(&path).await.map_err(|e| {
                WatchError::storage(format!("Failed to read record {:?}: {}", path, e))
            })?;
            let stored: StoredRecord = serde_json::from_str(&content).map_err(|e| {
                WatchError::storage(format!("Corrupt record {:?}: {}", path, e))
            })?;
            records.push(ChangeRecord::from(stored));
        }

        Ok(records)
    }
}

/// Write through a temporary file so readers never see a partial file
async fn write_atomic(path: &Path, content: &[u8]) -> WatchResult<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)
        .await
        .map_err(|e| WatchError::storage(format!("Failed to write {:?}: {}", tmp, e)))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| WatchError::storage(format!("Failed to move {:?} into place: {}", path, e)))?;
    Ok(())
}

#[async_trait]
impl HistoryStorage for FileHistoryStorage {
    async fn load(&self, feed: &str) -> WatchResult<ArchiveState> {
        validate_feed_name(feed)?;

        let snapshot_path = self.snapshot_path(feed);
        let snapshot_text = if fs::try_exists(&snapshot_path).await? {
            Some(fs::read_to_string(&snapshot_path).await.map_err(|e| {
                WatchError::storage(format!("Failed to read snapshot {:?}: {}", snapshot_path, e))
            })?)
        } else {
            None
        };
        let records = self.read_records(feed).await?;

        let state = assemble_state(feed, snapshot_text, records)?;
        tracing::debug!(feed, records = state.history.len(), "loaded archive from {:?}", self.feed_dir(feed));
        Ok(state)
    }

    async fn exists(&self, feed: &str) -> WatchResult<bool> {
        validate_feed_name(feed)?;
        Ok(fs::try_exists(self.snapshot_path(feed)).await?)
    }

    async fn commit(
        &self,
        feed: &str,
        record: &ChangeRecord,
        snapshot: &Snapshot,
    ) -> WatchResult<()> {
        validate_feed_name(feed)?;

        let records_dir = self.records_dir(feed);
        fs::create_dir_all(&records_dir).await.map_err(|e| {
            WatchError::storage(format!("Failed to create records directory: {}", e))
        })?;

        let json = serde_json::to_string_pretty(&StoredRecord::from(record))?;
        let record_path = records_dir.join(record_file_name(record));
        write_atomic(&record_path, json.as_bytes()).await?;
        write_atomic(&self.snapshot_path(feed), snapshot.text.as_bytes()).await?;

        tracing::debug!(feed, id = %record.id, "saved record to {:?}", record_path);
        Ok(())
    }

    async fn remove(&self, feed: &str, id: &RecordId) -> WatchResult<()> {
        validate_feed_name(feed)?;

        let dir = self.records_dir(feed);
        if !fs::try_exists(&dir).await? {
            return Ok(());
        }

        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if is_record_file(&name.to_string_lossy(), id) {
                fs::remove_file(entry.path()).await.map_err(|e| {
                    WatchError::storage(format!("Failed to delete record {}: {}", id, e))
                })?;
                tracing::debug!(feed, id = %id, "deleted record");
            }
        }

        Ok(())
    }

    async fn feeds(&self) -> WatchResult<Vec<String>> {
        if !fs::try_exists(&self.base_path).await? {
            return Ok(Vec::new());
        }

        let mut feeds = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if fs::try_exists(entry.path().join(SNAPSHOT_FILE)).await? {
                feeds.push(name);
            }
        }

        feeds.sort();
        Ok(feeds)
    }
}
