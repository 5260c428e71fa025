//! Point-in-time viewing with stale-result suppression
//!
//! Every request takes a generation number when it starts. A finished
//! reconstruction is only committed if no newer request has started since;
//! otherwise it is dropped. The displayed state is an immutable value that is
//! replaced as a whole, and a failed reconstruction keeps the previously
//! displayed text.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::archive::ArchiveState;
use crate::error::WatchResult;
use crate::reconstruct::{Reconstruction, ReconstructionRequest, Reconstructor, ViewStatus};

/// What is currently displayed
#[derive(Debug, Clone)]
pub struct ViewState {
    pub source: Arc<ArchiveState>,
    /// Requested timestamp of the displayed text, `None` for current
    pub displayed_at: Option<DateTime<Utc>>,
    pub displayed_text: String,
    pub status: ViewStatus,
}

impl ViewState {
    /// Show the current snapshot of `source`
    pub fn new(source: Arc<ArchiveState>) -> Self {
        let displayed_text = source.snapshot_text().to_string();
        Self {
            source,
            displayed_at: None,
            displayed_text,
            status: ViewStatus::Current,
        }
    }

    /// The state after a reconstruction for `target` finished
    pub fn with_result(
        &self,
        target: Option<DateTime<Utc>>,
        result: WatchResult<Reconstruction>,
    ) -> Self {
        match result {
            Ok(reconstruction) => Self {
                source: self.source.clone(),
                displayed_at: target,
                status: ViewStatus::from_report(&reconstruction.report),
                displayed_text: reconstruction.text,
            },
            Err(e) => Self {
                source: self.source.clone(),
                displayed_at: self.displayed_at,
                displayed_text: self.displayed_text.clone(),
                status: ViewStatus::Failed(e.to_string()),
            },
        }
    }
}

/// A started request
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    target: Option<DateTime<Utc>>,
    source: Arc<ArchiveState>,
}

/// Result of committing a finished request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Rendered,
    /// Reconstruction failed; the previous text stays displayed
    Failed,
    /// A newer request started; the result was dropped
    Stale,
}

/// Serves point-in-time views of one archive
pub struct Viewer {
    state: RwLock<Arc<ViewState>>,
    generation: AtomicU64,
    reconstructor: Reconstructor,
}

impl Viewer {
    pub fn new(source: Arc<ArchiveState>, reconstructor: Reconstructor) -> Self {
        Self {
            state: RwLock::new(Arc::new(ViewState::new(source))),
            generation: AtomicU64::new(0),
            reconstructor,
        }
    }

    /// The displayed state
    pub fn state(&self) -> Arc<ViewState> {
        self.state.read().clone()
    }

    /// Switch to a newer archive state, showing its current version
    ///
    /// Requests started before the switch become stale.
    pub fn update_source(&self, source: Arc<ArchiveState>) {
        let mut state = self.state.write();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *state = Arc::new(ViewState::new(source));
    }

    /// Start a request, superseding every earlier one
    pub fn begin(&self, request: ReconstructionRequest) -> Ticket {
        // Generation and source are taken under one guard so a concurrent
        // `update_source` cannot slip between them
        let state = self.state.read();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let source = state.source.clone();
        drop(state);
        tracing::debug!(generation, target = ?request.at, "view requested");
        Ticket {
            generation,
            target: request.at,
            source,
        }
    }

    /// Run the reconstruction for a ticket
    pub fn compute(&self, ticket: &Ticket) -> WatchResult<Reconstruction> {
        self.reconstructor
            .reconstruct_state(&ticket.source, ticket.target)
    }

    /// Whether `ticket` is still the newest request
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Commit a finished reconstruction if its request is still the newest
    pub fn commit(&self, ticket: &Ticket, result: WatchResult<Reconstruction>) -> CommitOutcome {
        let mut state = self.state.write();
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.generation, "dropping stale view");
            return CommitOutcome::Stale;
        }

        let failed = result.is_err();
        if let Err(e) = &result {
            tracing::warn!(generation = ticket.generation, error = %e, "reconstruction failed");
        }
        *state = Arc::new(state.with_result(ticket.target, result));

        if failed {
            CommitOutcome::Failed
        } else {
            CommitOutcome::Rendered
        }
    }

    /// Reconstruct on the blocking pool and commit the result
    pub async fn show(&self, request: ReconstructionRequest) -> WatchResult<CommitOutcome> {
        let ticket = self.begin(request);
        let reconstructor = self.reconstructor;
        let source = ticket.source.clone();
        let target = ticket.target;

        let result =
            tokio::task::spawn_blocking(move || reconstructor.reconstruct_state(&source, target))
                .await?;

        Ok(self.commit(&ticket, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{ChangeDetector, Detection, Observation};
    use crate::diff::decode;
    use crate::history::{ChangeRecord, HistoryIndex, RecordId};
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 11, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn source(versions: &[&str]) -> Arc<ArchiveState> {
        let detector = ChangeDetector::new();
        let mut state = ArchiveState::default();
        for (i, text) in versions.iter().enumerate() {
            if let Detection::Changed { state: next, .. } = detector
                .detect("feed", &state, Observation::new(*text, at(i as i64)))
                .unwrap()
            {
                state = next;
            }
        }
        Arc::new(state)
    }

    #[tokio::test]
    async fn test_show_renders_requested_version() {
        let viewer = Viewer::new(source(&["one", "two", "three"]), Reconstructor::new());
        assert_eq!(viewer.state().displayed_text, "three");

        let outcome = viewer.show(ReconstructionRequest::at(at(1))).await.unwrap();
        assert_eq!(outcome, CommitOutcome::Rendered);
        let state = viewer.state();
        assert_eq!(state.displayed_text, "two");
        assert_eq!(state.displayed_at, Some(at(1)));
        assert_eq!(state.status, ViewStatus::Version(at(1)));

        viewer.show(ReconstructionRequest::current()).await.unwrap();
        assert_eq!(viewer.state().displayed_text, "three");
        assert_eq!(viewer.state().status.to_string(), "showing current version");
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let viewer = Viewer::new(source(&["one", "two", "three"]), Reconstructor::new());

        let slow = viewer.begin(ReconstructionRequest::at(at(0)));
        let fast = viewer.begin(ReconstructionRequest::at(at(1)));

        let fast_result = viewer.compute(&fast);
        assert_eq!(viewer.commit(&fast, fast_result), CommitOutcome::Rendered);

        let slow_result = viewer.compute(&slow);
        assert_eq!(viewer.commit(&slow, slow_result), CommitOutcome::Stale);
        assert_eq!(viewer.state().displayed_text, "two");
    }

    #[test]
    fn test_failure_keeps_previous_text() {
        let broken = ChangeRecord::with_diff(
            RecordId::from_string("broken"),
            at(10),
            "hash",
            decode("@@ -9,1 +9,1 @@\n-x\n+y\n"),
        );
        let state = ArchiveState {
            snapshot: None,
            history: HistoryIndex::new(vec![broken]),
        };
        let viewer = Viewer::new(Arc::new(state), Reconstructor::new());
        let shown = viewer.state().displayed_text.clone();

        let ticket = viewer.begin(ReconstructionRequest::at(at(0)));
        let result = viewer.compute(&ticket);
        assert_eq!(viewer.commit(&ticket, result), CommitOutcome::Failed);

        let state = viewer.state();
        assert_eq!(state.displayed_text, shown);
        assert!(matches!(state.status, ViewStatus::Failed(_)));
    }

    #[test]
    fn test_current_ticket_always_carries_displayed_source() {
        let sources = [source(&["one"]), source(&["one", "two"])];
        let viewer = Viewer::new(sources[0].clone(), Reconstructor::new());

        for round in 0..2_000 {
            let ticket = std::thread::scope(|scope| {
                scope.spawn(|| viewer.update_source(sources[(round + 1) % 2].clone()));
                scope
                    .spawn(|| viewer.begin(ReconstructionRequest::current()))
                    .join()
                    .unwrap()
            });

            if viewer.is_current(&ticket) {
                assert!(Arc::ptr_eq(&ticket.source, &viewer.state().source));
            }
        }
    }

    #[test]
    fn test_update_source_invalidates_requests() {
        let viewer = Viewer::new(source(&["one"]), Reconstructor::new());
        let ticket = viewer.begin(ReconstructionRequest::current());

        viewer.update_source(source(&["one", "two"]));
        let result = viewer.compute(&ticket);
        assert_eq!(viewer.commit(&ticket, result), CommitOutcome::Stale);
        assert_eq!(viewer.state().displayed_text, "two");
    }
}
