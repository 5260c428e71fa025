//! Tests for archive storage implementations

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use super::record_file::{is_record_file, record_file_name};
use super::{FileHistoryStorage, HistoryStorage, MemoryHistoryStorage, validate_feed_name};
use crate::archive::{ArchiveState, Snapshot};
use crate::detector::{ChangeDetector, Detection, Observation};
use crate::error::WatchError;
use crate::history::{ChangeRecord, RecordId};

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 11, 12, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// Detect each version in turn and commit every change to `storage`
async fn record_all(storage: &dyn HistoryStorage, feed: &str, versions: &[&str]) -> ArchiveState {
    let detector = ChangeDetector::new();
    let mut state = ArchiveState::default();
    for (i, text) in versions.iter().enumerate() {
        let observation = Observation::new(*text, at(i as i64)).with_title("Doc");
        if let Detection::Changed { record, state: next } =
            detector.detect(feed, &state, observation).unwrap()
        {
            storage
                .commit(feed, &record, next.snapshot.as_ref().unwrap())
                .await
                .unwrap();
            state = next;
        }
    }
    state
}

#[tokio::test]
async fn test_memory_storage_round_trip() {
    let storage = MemoryHistoryStorage::new();
    let state = record_all(&storage, "feed", &["a", "a\nb", "b"]).await;

    let loaded = storage.load("feed").await.unwrap();
    assert_eq!(loaded.snapshot, state.snapshot);
    assert_eq!(loaded.history.records(), state.history.records());
    assert!(storage.exists("feed").await.unwrap());
    assert_eq!(storage.feeds().await.unwrap(), vec!["feed".to_string()]);
}

#[tokio::test]
async fn test_unknown_feed_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileHistoryStorage::new(temp_dir.path());

    let state = storage.load("missing").await.unwrap();
    assert!(state.snapshot.is_none());
    assert!(state.history.is_empty());
    assert!(!storage.exists("missing").await.unwrap());
}

#[tokio::test]
async fn test_file_storage_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileHistoryStorage::new(temp_dir.path());
    let state = record_all(&storage, "docs", &["line1\noldline2\nline3", "line1\nline2\nline3"]).await;

    let snapshot = std::fs::read_to_string(temp_dir.path().join("docs/snapshot.txt")).unwrap();
    assert_eq!(snapshot, "line1\nline2\nline3");
    let files = std::fs::read_dir(temp_dir.path().join("docs/records"))
        .unwrap()
        .count();
    assert_eq!(files, 2);

    let loaded = storage.load("docs").await.unwrap();
    assert_eq!(loaded.snapshot, state.snapshot);
    assert_eq!(loaded.history.records(), state.history.records());
    let newest = loaded.history.newest().unwrap();
    assert_eq!(newest.title.as_deref(), Some("Doc"));
    assert_eq!(newest.stats().added, 1);
}

#[tokio::test]
async fn test_record_json_embeds_diff_text() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileHistoryStorage::new(temp_dir.path());
    let state = record_all(&storage, "docs", &["x\ny", "x\nz"]).await;
    let newest = state.history.newest().unwrap();

    let path = temp_dir
        .path()
        .join("docs/records")
        .join(record_file_name(newest));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["id"], newest.id.as_str());
    assert_eq!(json["diff"], "@@ -1,2 +1,2 @@\n x\n-y\n+z\n");

    let baseline = state.history.oldest().unwrap();
    let path = temp_dir
        .path()
        .join("docs/records")
        .join(record_file_name(baseline));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert!(json["diff"].is_null());
}

#[tokio::test]
async fn test_corrupt_record_aborts_load() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileHistoryStorage::new(temp_dir.path());
    record_all(&storage, "docs", &["a", "b"]).await;

    std::fs::write(temp_dir.path().join("docs/records/broken.json"), "{ not json").unwrap();

    let err = storage.load("docs").await.unwrap_err();
    assert!(matches!(err, WatchError::Storage { .. }));
}

#[tokio::test]
async fn test_snapshot_without_records_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("docs")).unwrap();
    std::fs::write(temp_dir.path().join("docs/snapshot.txt"), "orphan").unwrap();

    let storage = FileHistoryStorage::new(temp_dir.path());
    assert!(storage.load("docs").await.is_err());
}

#[tokio::test]
async fn test_file_storage_remove_and_feeds() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileHistoryStorage::new(temp_dir.path());
    let state = record_all(&storage, "alpha", &["1", "2", "3"]).await;
    record_all(&storage, "beta", &["x"]).await;

    let oldest = state.history.oldest().unwrap().id.clone();
    storage.remove("alpha", &oldest).await.unwrap();
    storage
        .remove("alpha", &RecordId::from_string("unknown"))
        .await
        .unwrap();

    let loaded = storage.load("alpha").await.unwrap();
    assert_eq!(loaded.history.len(), 2);
    assert!(loaded.history.get(&oldest).is_none());

    assert_eq!(
        storage.feeds().await.unwrap(),
        vec!["alpha".to_string(), "beta".to_string()]
    );
}

#[tokio::test]
async fn test_commit_same_record_twice_keeps_one_file() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileHistoryStorage::new(temp_dir.path());
    let record = ChangeRecord::baseline(RecordId::derive("f", at(0), "abcdef0123"), at(0), "abcdef0123");
    let snapshot = Snapshot {
        text: "v".to_string(),
        observed_at: at(0),
        content_hash: "abcdef0123".to_string(),
    };

    storage.commit("f", &record, &snapshot).await.unwrap();
    storage.commit("f", &record, &snapshot).await.unwrap();

    assert_eq!(storage.load("f").await.unwrap().history.len(), 1);
}

#[test]
fn test_feed_name_validation() {
    assert!(validate_feed_name("site-1_news.v2").is_ok());
    assert!(validate_feed_name("").is_err());
    assert!(validate_feed_name("..").is_err());
    assert!(validate_feed_name("a/b").is_err());
    assert!(validate_feed_name("with space").is_err());
}

#[test]
fn test_record_file_matching() {
    let id = RecordId::from_string("feed-20250811120000000-abcd1234");
    assert!(is_record_file("20250811T120000000Z-feed-20250811120000000-abcd1234.json", &id));
    assert!(!is_record_file("20250811T120000000Z-x-feed-20250811120000000-abcd1234.json", &id));
    assert!(!is_record_file("feed-20250811120000000-abcd1234.json", &id));
}
