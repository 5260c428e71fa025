//! Error types for pagewatch
//!
//! Every fallible operation in the core returns [`WatchResult`]. All variants
//! implement [`UnifiedError`], which exposes:
//! - error_code: a stable identifier for programmatic handling
//! - message: human-readable error message
//! - context: optional note on where the error occurred

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{ResultExt, UnifiedError, WatchError, WatchResult};
