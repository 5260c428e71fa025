//! Copy-on-write hunk application
//!
//! Each hunk builds a fresh line vector: the untouched prefix is sliced from
//! the input, the hunk's operations are replayed against a cursor that starts
//! at the hunk's anchor, and the untouched suffix is sliced after it. Hunks of
//! one diff are applied from the last anchor to the first so that positions
//! of the remaining hunks stay valid.

use std::cmp::Reverse;

use crate::error::{WatchError, WatchResult};

use super::hunk::{DiffHunk, DiffLine};
use super::lines::{join_lines, split_lines};

/// How strictly context and removed lines must match the text they land on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    /// Only positions are checked; content mismatches are logged
    #[default]
    Lenient,
    /// Any content mismatch fails the hunk
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

/// Apply hunks old→new
pub fn apply_forward(text: &str, hunks: &[DiffHunk], alignment: Alignment) -> WatchResult<String> {
    apply(text, hunks, Direction::Forward, alignment)
}

/// Apply hunks new→old, recovering the text the diff was computed from
pub fn apply_reverse(text: &str, hunks: &[DiffHunk], alignment: Alignment) -> WatchResult<String> {
    apply(text, hunks, Direction::Reverse, alignment)
}

fn apply(
    text: &str,
    hunks: &[DiffHunk],
    direction: Direction,
    alignment: Alignment,
) -> WatchResult<String> {
    if hunks.is_empty() {
        return Ok(text.to_string());
    }

    let mut order: Vec<usize> = (0..hunks.len()).collect();
    order.sort_by_key(|&i| Reverse(anchor(&hunks[i], direction)));

    let mut working: Vec<String> = split_lines(text).into_iter().map(str::to_string).collect();
    let mut floor: Option<usize> = None;

    for idx in order {
        let hunk = &hunks[idx];
        let start = anchor(hunk, direction);
        let end = start.checked_add(span(hunk, direction)).ok_or_else(|| {
            WatchError::diff_in_hunk(format!("hunk anchor {} is out of range", start), idx)
        })?;
        if let Some(next_start) = floor {
            if end > next_start {
                return Err(WatchError::diff_in_hunk(
                    format!(
                        "hunk covering lines {}..{} overlaps the hunk at line {}",
                        start.saturating_add(1),
                        end,
                        next_start.saturating_add(1)
                    ),
                    idx,
                ));
            }
        }

        working = splice(working.as_slice(), hunk, direction, alignment).map_err(|e| match e {
            WatchError::Diff { message, context, .. } => WatchError::Diff {
                message,
                hunk: Some(idx),
                context,
            },
            other => other,
        })?;
        floor = Some(start);
    }

    Ok(join_lines(working.as_slice()))
}

fn anchor(hunk: &DiffHunk, direction: Direction) -> usize {
    match direction {
        Direction::Forward => hunk.old_index(),
        Direction::Reverse => hunk.new_index(),
    }
}

fn span(hunk: &DiffHunk, direction: Direction) -> usize {
    match direction {
        Direction::Forward => hunk.old_span(),
        Direction::Reverse => hunk.new_span(),
    }
}

fn splice<S: AsRef<str>>(
    lines: &[S],
    hunk: &DiffHunk,
    direction: Direction,
    alignment: Alignment,
) -> WatchResult<Vec<String>> {
    let start = anchor(hunk, direction);
    if start > lines.len() {
        return Err(WatchError::diff(format!(
            "hunk anchored at line {} but text has {} lines",
            start.saturating_add(1),
            lines.len()
        )));
    }

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + hunk.lines.len());
    out.extend(lines[..start].iter().map(|l| l.as_ref().to_string()));

    let mut cursor = start;
    for op in &hunk.lines {
        match (direction, op) {
            (_, DiffLine::Context(expected)) => {
                let current = line_at(lines, cursor)?;
                check(current, expected, cursor, alignment)?;
                out.push(current.to_string());
                cursor += 1;
            }
            (Direction::Reverse, DiffLine::Added(expected))
            | (Direction::Forward, DiffLine::Removed(expected)) => {
                let current = line_at(lines, cursor)?;
                check(current, expected, cursor, alignment)?;
                cursor += 1;
            }
            (Direction::Reverse, DiffLine::Removed(text))
            | (Direction::Forward, DiffLine::Added(text)) => out.push(text.clone()),
        }
    }

    out.extend(lines[cursor..].iter().map(|l| l.as_ref().to_string()));
    Ok(out)
}

fn line_at<S: AsRef<str>>(lines: &[S], index: usize) -> WatchResult<&str> {
    lines.get(index).map(|l| l.as_ref()).ok_or_else(|| {
        WatchError::diff(format!(
            "line {} is outside the text ({} lines)",
            index + 1,
            lines.len()
        ))
    })
}

fn check(current: &str, expected: &str, index: usize, alignment: Alignment) -> WatchResult<()> {
    if current == expected {
        return Ok(());
    }
    match alignment {
        Alignment::Strict => Err(WatchError::diff(format!(
            "line {} is {:?}, diff expected {:?}",
            index + 1,
            current,
            expected
        ))),
        Alignment::Lenient => {
            tracing::debug!(line = index + 1, "diff line does not match text; continuing");
            Ok(())
        }
    }
}
