//! Change records and the time-ordered history index

mod index;
mod record;

pub use index::HistoryIndex;
pub use record::{ChangeRecord, RecordId};
