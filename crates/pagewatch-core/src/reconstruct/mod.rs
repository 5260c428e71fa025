//! Point-in-time reconstruction
//!
//! A document is only stored in full as its current snapshot. Earlier
//! versions are recovered by folding the inverse of every newer record's diff
//! over the snapshot, newest record first. A record stamped exactly at the
//! target is part of that version and is not reverted.

mod request;


pub use request::{ReconstructionRequest, ViewStatus, parse_timestamp};

use chrono::{DateTime, Utc};

use crate::archive::ArchiveState;
use crate::diff::{Alignment, apply_reverse};
use crate::error::{WatchError, WatchResult};
use crate::history::{HistoryIndex, RecordId};

/// Which version a reconstruction landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedVersion {
    /// No record is newer than the target; the snapshot itself
    Current,
    /// The version introduced by this record
    At {
        timestamp: DateTime<Utc>,
        id: RecordId,
    },
    /// The target precedes every record; the oldest known version
    BeforeHistory,
}

/// What a reconstruction did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructionReport {
    pub target: Option<DateTime<Utc>>,
    /// Records whose diffs were reverted
    pub reverted: usize,
    /// Hunks skipped because their header could not be parsed
    pub skipped_hunks: usize,
    pub resolved: ResolvedVersion,
}

impl ReconstructionReport {
    fn current(target: Option<DateTime<Utc>>) -> Self {
        Self {
            target,
            reverted: 0,
            skipped_hunks: 0,
            resolved: ResolvedVersion::Current,
        }
    }
}

/// Reconstructed text with its report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub text: String,
    pub report: ReconstructionReport,
}

/// Recovers earlier document versions from a snapshot and its history
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconstructor {
    alignment: Alignment,
}

impl Reconstructor {
    /// Create a reconstructor that only checks positions
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on context or removed lines that do not match the working text
    pub fn strict_context() -> Self {
        Self::new().with_alignment(Alignment::Strict)
    }

    /// Set the alignment mode
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// The document as it was at `target`
    pub fn reconstruct(
        &self,
        snapshot: &str,
        history: &HistoryIndex,
        target: DateTime<Utc>,
    ) -> WatchResult<String> {
        self.reconstruct_with_report(snapshot, history, target)
            .map(|r| r.text)
    }

    /// The document as it was at `target`, with a report of the fold
    pub fn reconstruct_with_report(
        &self,
        snapshot: &str,
        history: &HistoryIndex,
        target: DateTime<Utc>,
    ) -> WatchResult<Reconstruction> {
        let pending = history.records_newer_than(target);
        if pending.is_empty() {
            return Ok(Reconstruction {
                text: snapshot.to_string(),
                report: ReconstructionReport::current(Some(target)),
            });
        }

        let mut text = snapshot.to_string();
        let mut reverted = 0;
        let mut skipped_hunks = 0;

        for record in pending {
            let Some(diff) = &record.diff else {
                tracing::debug!(id = %record.id, "baseline record, nothing to revert");
                continue;
            };

            if !diff.unparseable.is_empty() {
                tracing::warn!(
                    id = %record.id,
                    skipped = diff.unparseable.len(),
                    "skipping unparseable hunks"
                );
                skipped_hunks += diff.unparseable.len();
            }

            text = apply_reverse(&text, &diff.hunks, self.alignment)
                .map_err(|e| WatchError::reconstruction(record.id.as_str(), e.to_string()))?;
            reverted += 1;

            tracing::debug!(id = %record.id, hunks = diff.hunks.len(), "reverted record");
        }

        let resolved = match history.resolve(target) {
            Some(record) => ResolvedVersion::At {
                timestamp: record.timestamp,
                id: record.id.clone(),
            },
            None => ResolvedVersion::BeforeHistory,
        };

        Ok(Reconstruction {
            text,
            report: ReconstructionReport {
                target: Some(target),
                reverted,
                skipped_hunks,
                resolved,
            },
        })
    }

    /// Reconstruct from a published archive state; `None` means the snapshot
    pub fn reconstruct_state(
        &self,
        state: &ArchiveState,
        target: Option<DateTime<Utc>>,
    ) -> WatchResult<Reconstruction> {
        match target {
            Some(target) => {
                self.reconstruct_with_report(state.snapshot_text(), &state.history, target)
            }
            None => Ok(Reconstruction {
                text: state.snapshot_text().to_string(),
                report: ReconstructionReport::current(None),
            }),
        }
    }
}

/// Reconstruct with the default reconstructor
pub fn reconstruct(
    snapshot: &str,
    history: &HistoryIndex,
    target: DateTime<Utc>,
) -> WatchResult<String> {
    Reconstructor::new().reconstruct(snapshot, history, target)
}
