//! LCS-based diff computation
//!
//! Common leading and trailing lines are trimmed first; the remaining middle
//! is diffed with a longest-common-subsequence table. When several minimal
//! scripts exist, deletions are emitted before insertions so the output is
//! deterministic.
//!
//! The table holds one `u32` per pair of middle lines. Past
//! [`MAX_LCS_CELLS`] the middle is emitted as one replacement (every old
//! line removed, every new line added): still exact, just not minimal.

use super::hunk::{DiffHunk, DiffLine};
use super::lines::split_lines;

/// Unchanged lines kept around each change
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Largest LCS table computed (64 MiB of `u32` cells)
pub const MAX_LCS_CELLS: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Keep,
    Delete,
    Insert,
}

/// One step of the edit script, with the number of old and new lines
/// consumed before it
#[derive(Debug, Clone, Copy)]
struct Edit<'a> {
    kind: EditKind,
    text: &'a str,
    old_pos: usize,
    new_pos: usize,
}

#[derive(Default)]
struct ScriptBuilder<'a> {
    edits: Vec<Edit<'a>>,
    old_pos: usize,
    new_pos: usize,
}

impl<'a> ScriptBuilder<'a> {
    fn push(&mut self, kind: EditKind, text: &'a str) {
        self.edits.push(Edit {
            kind,
            text,
            old_pos: self.old_pos,
            new_pos: self.new_pos,
        });
        match kind {
            EditKind::Keep => {
                self.old_pos += 1;
                self.new_pos += 1;
            }
            EditKind::Delete => self.old_pos += 1,
            EditKind::Insert => self.new_pos += 1,
        }
    }
}

/// Compute hunks between two texts with [`DEFAULT_CONTEXT_LINES`] of context
pub fn encode(old: &str, new: &str) -> Vec<DiffHunk> {
    encode_with_context(old, new, DEFAULT_CONTEXT_LINES)
}

/// Compute hunks between two texts. Returns no hunks when they are identical.
pub fn encode_with_context(old: &str, new: &str, context: usize) -> Vec<DiffHunk> {
    if old == new {
        return Vec::new();
    }

    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let script = edit_script(&old_lines, &new_lines);
    group_hunks(&script, context)
}

fn edit_script<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<Edit<'a>> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let mut builder = ScriptBuilder::default();
    builder.edits.reserve(old.len() + new.len());

    for line in &old[..prefix] {
        builder.push(EditKind::Keep, line);
    }

    let cells = (old_mid.len() + 1).checked_mul(new_mid.len() + 1);
    if cells.is_some_and(|cells| cells <= MAX_LCS_CELLS) {
        lcs_script(&mut builder, old_mid, new_mid);
    } else {
        tracing::debug!(
            old_lines = old_mid.len(),
            new_lines = new_mid.len(),
            "changed region too large for LCS; replacing it whole"
        );
        for line in old_mid {
            builder.push(EditKind::Delete, line);
        }
        for line in new_mid {
            builder.push(EditKind::Insert, line);
        }
    }

    for line in &old[old.len() - suffix..] {
        builder.push(EditKind::Keep, line);
    }

    builder.edits
}

fn lcs_script<'a>(builder: &mut ScriptBuilder<'a>, old_mid: &[&'a str], new_mid: &[&'a str]) {
    // table[i * cols + j] = LCS length of old_mid[i..] and new_mid[j..]
    let cols = new_mid.len() + 1;
    let mut table = vec![0u32; (old_mid.len() + 1) * cols];
    for i in (0..old_mid.len()).rev() {
        for j in (0..new_mid.len()).rev() {
            table[i * cols + j] = if old_mid[i] == new_mid[j] {
                table[(i + 1) * cols + j + 1] + 1
            } else {
                table[(i + 1) * cols + j].max(table[i * cols + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < old_mid.len() && j < new_mid.len() {
        if old_mid[i] == new_mid[j] {
            builder.push(EditKind::Keep, old_mid[i]);
            i += 1;
            j += 1;
        } else if table[(i + 1) * cols + j] >= table[i * cols + j + 1] {
            builder.push(EditKind::Delete, old_mid[i]);
            i += 1;
        } else {
            builder.push(EditKind::Insert, new_mid[j]);
            j += 1;
        }
    }
    for line in &old_mid[i..] {
        builder.push(EditKind::Delete, line);
    }
    for line in &new_mid[j..] {
        builder.push(EditKind::Insert, line);
    }
}

/// Group changes into hunks, merging changes whose context would overlap
fn group_hunks(script: &[Edit<'_>], context: usize) -> Vec<DiffHunk> {
    let changes: Vec<usize> = script
        .iter()
        .enumerate()
        .filter(|(_, e)| e.kind != EditKind::Keep)
        .map(|(i, _)| i)
        .collect();

    let mut hunks = Vec::new();
    let mut k = 0;
    while k < changes.len() {
        let first = changes[k];
        let mut last = first;
        k += 1;
        while k < changes.len() && changes[k] - last <= 2 * context + 1 {
            last = changes[k];
            k += 1;
        }

        let start = first.saturating_sub(context);
        let end = (last + context + 1).min(script.len());
        hunks.push(build_hunk(&script[start..end]));
    }

    hunks
}

fn build_hunk(edits: &[Edit<'_>]) -> DiffHunk {
    let old_count = edits
        .iter()
        .filter(|e| e.kind != EditKind::Insert)
        .count();
    let new_count = edits
        .iter()
        .filter(|e| e.kind != EditKind::Delete)
        .count();
    let (old_pos, new_pos) = edits
        .first()
        .map(|e| (e.old_pos, e.new_pos))
        .unwrap_or_default();

    let lines = edits
        .iter()
        .map(|e| match e.kind {
            EditKind::Keep => DiffLine::Context(e.text.to_string()),
            EditKind::Delete => DiffLine::Removed(e.text.to_string()),
            EditKind::Insert => DiffLine::Added(e.text.to_string()),
        })
        .collect();

    DiffHunk {
        old_start: if old_count == 0 { old_pos } else { old_pos + 1 },
        old_count,
        new_start: if new_count == 0 { new_pos } else { new_pos + 1 },
        new_count,
        lines,
    }
}
