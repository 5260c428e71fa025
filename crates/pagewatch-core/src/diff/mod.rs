//! Line-based diff codec
//!
//! Computes line diffs between two text states, serializes them in the
//! unified hunk grammar and parses them back:
//!
//! ```text
//! @@ -<old_start>[,<old_count>] +<new_start>[,<new_count>] @@
//!  context line
//! -removed line
//! +added line
//! ```
//!
//! Header positions are 1-based. A side with a count of zero names the line
//! *after which* the hunk applies, so `+0,0` means "before the first line".
//! Application is copy-on-write: every hunk produces a fresh line vector built
//! from index-bounded slices of its input.

mod apply;
mod codec;
mod encode;
mod hunk;
mod lines;


pub use apply::{Alignment, apply_forward, apply_reverse};
pub use codec::{DecodedDiff, UnparseableHunk, decode, serialize};
pub use encode::{DEFAULT_CONTEXT_LINES, MAX_LCS_CELLS, encode, encode_with_context};
pub use hunk::{DiffHunk, DiffLine, DiffStats};
pub use lines::{join_lines, split_lines};
