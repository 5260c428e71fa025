//! Pagewatch Core Library
//!
//! Diff-based versioning of tracked documents. Only the newest full text of a
//! document is stored; every observed change keeps a unified diff against
//! the version before it, and earlier versions are rebuilt on demand by
//! reverting those diffs.
//!
//! - [`diff`]: line diffs, their text form and their application
//! - [`detector`]: decides when new content is a change worth recording
//! - [`history`]: the time-ordered index of change records
//! - [`reconstruct`]: point-in-time reconstruction
//! - [`archive`], [`storage`], [`viewer`]: published state, persistence, viewing

pub mod archive;
pub mod config;
pub mod detector;
pub mod diff;
pub mod error;
pub mod history;
pub mod reconstruct;
pub mod storage;
pub mod viewer;

// Re-export commonly used types
pub use archive::{Archive, ArchiveState, Snapshot};
pub use config::{Config, LoggingConfig};
pub use detector::{ChangeDetector, Detection, Normalization, Observation};
pub use diff::{Alignment, DiffHunk, DiffLine, DiffStats};
pub use error::{UnifiedError, WatchError, WatchResult};
pub use history::{ChangeRecord, HistoryIndex, RecordId};
pub use reconstruct::{
    Reconstruction, ReconstructionReport, ReconstructionRequest, Reconstructor, ResolvedVersion,
    ViewStatus, reconstruct,
};
pub use storage::{FileHistoryStorage, HistoryStorage, MemoryHistoryStorage};
pub use viewer::{CommitOutcome, ViewState, Viewer};
