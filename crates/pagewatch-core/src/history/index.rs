//! Time-ordered, immutable index of change records

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::record::{ChangeRecord, RecordId};

/// Change records ordered newest first
///
/// Records are sorted by timestamp, descending; records sharing a timestamp
/// are ordered by id, descending, so the order is total and does not depend
/// on the order records were supplied in. The record slice is shared, so
/// cloning an index is cheap and never copies records.
#[derive(Debug, Clone, Default)]
pub struct HistoryIndex {
    records: Arc<[ChangeRecord]>,
}

impl HistoryIndex {
    /// Build an index from records in any order
    ///
    /// When two records share an id the first one supplied is kept and the
    /// other is dropped with a warning.
    pub fn new(records: impl IntoIterator<Item = ChangeRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut kept: Vec<ChangeRecord> = Vec::new();

        for record in records {
            if seen.contains(&record.id) {
                tracing::warn!(id = %record.id, "dropping duplicate change record");
                continue;
            }
            seen.insert(record.id.clone());
            kept.push(record);
        }

        kept.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });

        Self {
            records: kept.into(),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, newest first
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    /// Iterate records, newest first
    pub fn iter(&self) -> std::slice::Iter<'_, ChangeRecord> {
        self.records.iter()
    }

    /// The most recent record
    pub fn newest(&self) -> Option<&ChangeRecord> {
        self.records.first()
    }

    /// The oldest record
    pub fn oldest(&self) -> Option<&ChangeRecord> {
        self.records.last()
    }

    /// Look up a record by id
    pub fn get(&self, id: &RecordId) -> Option<&ChangeRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Look up a record by id prefix; `None` when no record or several match
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&ChangeRecord> {
        let mut matches = self
            .records
            .iter()
            .filter(|r| r.id.as_str().starts_with(prefix));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Records with a timestamp strictly after `t`, newest first
    ///
    /// A record stamped exactly `t` is not included.
    pub fn records_newer_than(&self, t: DateTime<Utc>) -> &[ChangeRecord] {
        let end = self.records.partition_point(|r| r.timestamp > t);
        &self.records[..end]
    }

    /// The newest record at or before `t`
    pub fn resolve(&self, t: DateTime<Utc>) -> Option<&ChangeRecord> {
        let end = self.records.partition_point(|r| r.timestamp > t);
        self.records.get(end)
    }

    /// A new index that also contains `record`; this index is unchanged
    pub fn with_record(&self, record: ChangeRecord) -> Self {
        Self::new(self.records.iter().cloned().chain(std::iter::once(record)))
    }

    /// A new index keeping only the `keep` newest records
    pub fn retain_newest(&self, keep: usize) -> Self {
        let keep = keep.min(self.records.len());
        Self {
            records: self.records[..keep].to_vec().into(),
        }
    }
}

impl<'a> IntoIterator for &'a HistoryIndex {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<ChangeRecord> for HistoryIndex {
    fn from_iter<I: IntoIterator<Item = ChangeRecord>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 11, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn record(id: &str, minutes: i64) -> ChangeRecord {
        ChangeRecord::baseline(RecordId::from_string(id), at(minutes), "hash")
    }

    fn ids(index: &HistoryIndex) -> Vec<&str> {
        index.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_sorted_newest_first() {
        let index = HistoryIndex::new(vec![record("b", 10), record("c", 20), record("a", 0)]);
        assert_eq!(ids(&index), vec!["c", "b", "a"]);
        assert_eq!(index.newest().unwrap().id.as_str(), "c");
        assert_eq!(index.oldest().unwrap().id.as_str(), "a");
    }

    #[test]
    fn test_ties_broken_by_id() {
        let forward = HistoryIndex::new(vec![record("x", 5), record("y", 5), record("z", 1)]);
        let backward = HistoryIndex::new(vec![record("z", 1), record("y", 5), record("x", 5)]);
        assert_eq!(ids(&forward), vec!["y", "x", "z"]);
        assert_eq!(ids(&forward), ids(&backward));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut dup = record("a", 30);
        dup.title = Some("second".to_string());
        let index = HistoryIndex::new(vec![record("a", 0), dup]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.newest().unwrap().timestamp, at(0));
        assert!(index.newest().unwrap().title.is_none());
    }

    #[test]
    fn test_records_newer_than_is_strict() {
        let index = HistoryIndex::new(vec![record("a", 0), record("b", 10), record("c", 20)]);

        let newer: Vec<_> = index.records_newer_than(at(10)).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(newer, vec!["c"]);

        let newer = index.records_newer_than(at(10) - Duration::nanoseconds(1));
        assert_eq!(newer.len(), 2);

        assert!(index.records_newer_than(at(20)).is_empty());
        assert_eq!(index.records_newer_than(at(-1)).len(), 3);
    }

    #[test]
    fn test_resolve() {
        let index = HistoryIndex::new(vec![record("a", 0), record("b", 10)]);
        assert_eq!(index.resolve(at(15)).unwrap().id.as_str(), "b");
        assert_eq!(index.resolve(at(10)).unwrap().id.as_str(), "b");
        assert_eq!(index.resolve(at(9)).unwrap().id.as_str(), "a");
        assert!(index.resolve(at(-1)).is_none());
    }

    #[test]
    fn test_with_record_leaves_original_untouched() {
        let index = HistoryIndex::new(vec![record("a", 0)]);
        let grown = index.with_record(record("b", 10));

        assert_eq!(ids(&index), vec!["a"]);
        assert_eq!(ids(&grown), vec!["b", "a"]);
    }

    #[test]
    fn test_retain_newest() {
        let index: HistoryIndex = (0..5).map(|i| record(&format!("r{}", i), i)).collect();
        let trimmed = index.retain_newest(2);
        assert_eq!(ids(&trimmed), vec!["r4", "r3"]);
        assert_eq!(index.retain_newest(10).len(), 5);
    }

    #[test]
    fn test_find_by_prefix() {
        let index = HistoryIndex::new(vec![record("feed-001", 0), record("feed-002", 1)]);
        assert_eq!(index.find_by_prefix("feed-002").unwrap().id.as_str(), "feed-002");
        assert!(index.find_by_prefix("feed-").is_none());
        assert!(index.find_by_prefix("nope").is_none());
    }
}
