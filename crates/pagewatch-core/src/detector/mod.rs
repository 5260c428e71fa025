//! Change detection
//!
//! Compares newly observed content against the last known snapshot and, when
//! the normalized content differs, produces a new [`ChangeRecord`] together
//! with the next archive state. The previous state is never modified; callers
//! publish the returned state as a whole.

mod normalize;

pub use normalize::{Normalization, content_hash};

use chrono::{DateTime, Utc};

use crate::archive::{ArchiveState, Snapshot};
use crate::diff::{DEFAULT_CONTEXT_LINES, DecodedDiff, encode_with_context};
use crate::error::{WatchError, WatchResult};
use crate::history::{ChangeRecord, RecordId};

/// Newly observed content of a tracked document
#[derive(Debug, Clone)]
pub struct Observation {
    pub content: String,
    pub observed_at: DateTime<Utc>,
    pub source_link: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Observation {
    /// Create an observation
    pub fn new(content: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            observed_at,
            source_link: None,
            title: None,
            description: None,
        }
    }

    /// Set the link the content was observed at
    pub fn with_source_link(mut self, link: impl Into<String>) -> Self {
        self.source_link = Some(link.into());
        self
    }

    /// Set the document title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set a description of the change
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Outcome of comparing an observation with the archive
#[derive(Debug, Clone)]
pub enum Detection {
    /// Normalized content matches the snapshot; nothing to record
    Unchanged { content_hash: String },
    /// A new record and the state that includes it
    Changed {
        record: ChangeRecord,
        state: ArchiveState,
    },
}

impl Detection {
    /// Whether a record was produced
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Decides whether observed content warrants a new change record
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    normalization: Normalization,
    context_lines: usize,
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeDetector {
    /// Create a detector with default normalization and context
    pub fn new() -> Self {
        Self {
            normalization: Normalization::default(),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }

    /// Set the normalization
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Set the number of context lines in generated diffs
    pub fn with_context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    /// The configured normalization
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Compare `observation` with `previous`
    pub fn detect(
        &self,
        feed: &str,
        previous: &ArchiveState,
        observation: Observation,
    ) -> WatchResult<Detection> {
        if let Some(newest) = previous.history.newest() {
            if observation.observed_at <= newest.timestamp {
                return Err(WatchError::invalid_input_field(
                    format!(
                        "observation at {} is not after the newest record ({})",
                        observation.observed_at.to_rfc3339(),
                        newest.timestamp.to_rfc3339()
                    ),
                    "observed_at",
                ));
            }
        }

        let normalized = self.normalization.apply(&observation.content);
        let hash = content_hash(&normalized);
        let id = RecordId::derive(feed, observation.observed_at, &hash);

        let record = match &previous.snapshot {
            Some(snapshot) => {
                if self.normalization.apply(&snapshot.text) == normalized {
                    tracing::debug!(feed, "no changes detected");
                    return Ok(Detection::Unchanged { content_hash: hash });
                }
                let hunks =
                    encode_with_context(&snapshot.text, &observation.content, self.context_lines);
                ChangeRecord::with_diff(
                    id,
                    observation.observed_at,
                    hash.clone(),
                    DecodedDiff {
                        hunks,
                        unparseable: Vec::new(),
                    },
                )
            }
            None if previous.history.is_empty() => {
                ChangeRecord::baseline(id, observation.observed_at, hash.clone())
            }
            None => {
                return Err(WatchError::storage(format!(
                    "feed '{}' has {} records but no snapshot",
                    feed,
                    previous.history.len()
                )));
            }
        };

        let record = ChangeRecord {
            source_link: observation.source_link,
            title: observation.title,
            description: observation.description,
            ..record
        };

        let state = ArchiveState {
            snapshot: Some(Snapshot {
                text: observation.content,
                observed_at: observation.observed_at,
                content_hash: hash,
            }),
            history: previous.history.with_record(record.clone()),
        };

        tracing::info!(
            feed,
            id = %record.id,
            baseline = record.is_baseline(),
            stats = %record.stats(),
            "recorded change"
        );

        Ok(Detection::Changed { record, state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{Alignment, apply_reverse, encode};
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 11, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn changed(detection: Detection) -> (ChangeRecord, ArchiveState) {
        match detection {
            Detection::Changed { record, state } => (record, state),
            Detection::Unchanged { .. } => panic!("expected a change"),
        }
    }

    #[test]
    fn test_first_observation_is_baseline() {
        let detector = ChangeDetector::new();
        let detection = detector
            .detect("feed", &ArchiveState::default(), Observation::new("hello", at(0)))
            .unwrap();

        let (record, state) = changed(detection);
        assert!(record.is_baseline());
        assert_eq!(state.snapshot.as_ref().unwrap().text, "hello");
        assert_eq!(state.history.len(), 1);
        assert!(record.id.as_str().starts_with("feed-20250811120000000-"));
    }

    #[test]
    fn test_change_carries_forward_diff() {
        let detector = ChangeDetector::new();
        let (_, first) = changed(
            detector
                .detect("feed", &ArchiveState::default(), Observation::new("a\nb", at(0)))
                .unwrap(),
        );
        let (record, second) = changed(
            detector
                .detect(
                    "feed",
                    &first,
                    Observation::new("a\nc", at(1)).with_title("Example"),
                )
                .unwrap(),
        );

        let diff = record.diff.as_ref().unwrap();
        assert_eq!(diff.hunks, encode("a\nb", "a\nc"));
        assert_eq!(record.title.as_deref(), Some("Example"));
        assert_eq!(
            apply_reverse("a\nc", &diff.hunks, Alignment::Strict).unwrap(),
            "a\nb"
        );

        assert_eq!(first.history.len(), 1);
        assert_eq!(first.snapshot.as_ref().unwrap().text, "a\nb");
        assert_eq!(second.history.len(), 2);
    }

    #[test]
    fn test_identical_content_is_unchanged() {
        let detector = ChangeDetector::new();
        let (_, state) = changed(
            detector
                .detect("feed", &ArchiveState::default(), Observation::new("x", at(0)))
                .unwrap(),
        );
        let detection = detector
            .detect("feed", &state, Observation::new("x", at(1)))
            .unwrap();
        assert!(!detection.is_changed());
    }

    #[test]
    fn test_trailing_whitespace_is_ignored_by_default() {
        let detector = ChangeDetector::new();
        let (_, state) = changed(
            detector
                .detect("feed", &ArchiveState::default(), Observation::new("x\ny", at(0)))
                .unwrap(),
        );
        let detection = detector
            .detect("feed", &state, Observation::new("x  \r\ny\n", at(1)))
            .unwrap();
        assert!(!detection.is_changed());

        let exact = ChangeDetector::new().with_normalization(Normalization::Exact);
        let detection = exact
            .detect("feed", &state, Observation::new("x  \r\ny\n", at(1)))
            .unwrap();
        assert!(detection.is_changed());
    }

    #[test]
    fn test_out_of_order_observation_is_rejected() {
        let detector = ChangeDetector::new();
        let (_, state) = changed(
            detector
                .detect("feed", &ArchiveState::default(), Observation::new("x", at(5)))
                .unwrap(),
        );

        assert!(detector.detect("feed", &state, Observation::new("y", at(5))).is_err());
        assert!(detector.detect("feed", &state, Observation::new("y", at(4))).is_err());
    }

    #[test]
    fn test_records_without_snapshot_are_rejected() {
        let state = ArchiveState {
            snapshot: None,
            history: crate::history::HistoryIndex::new(vec![ChangeRecord::baseline(
                RecordId::from_string("r"),
                at(0),
                "h",
            )]),
        };
        let err = ChangeDetector::new()
            .detect("feed", &state, Observation::new("y", at(1)))
            .unwrap_err();
        assert!(matches!(err, WatchError::Storage { .. }));
    }
}
