//! Serialization and tokenizing parser for the hunk grammar

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use super::hunk::{DiffHunk, DiffLine};

/// Hunk header; omitted counts default to 1
static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+),?(\d*) \+(\d+),?(\d*) @@").expect("hunk header pattern is valid")
});

/// Result of parsing a serialized diff
///
/// `hunks` holds every hunk that parsed; `unparseable` lists the ones that
/// were skipped. A diff with no hunks and nothing unparseable is a no-op diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedDiff {
    pub hunks: Vec<DiffHunk>,
    pub unparseable: Vec<UnparseableHunk>,
}

impl DecodedDiff {
    /// Whether every hunk header parsed
    pub fn is_clean(&self) -> bool {
        self.unparseable.is_empty()
    }

    /// Whether the diff carried nothing at all
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty() && self.unparseable.is_empty()
    }
}

/// A hunk whose header did not match the grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparseableHunk {
    /// 1-based line of the header within the serialized diff
    pub line: usize,
    pub header: String,
    /// Body lines dropped along with the header
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Header(&'a str),
    Body(&'a str),
    /// `\ No newline at end of file` and similar annotations
    Marker,
}

fn tokenize(text: &str) -> impl Iterator<Item = (usize, Token<'_>)> {
    text.split_terminator('\n').enumerate().map(|(i, raw)| {
        let token = if raw.starts_with("@@") {
            Token::Header(raw)
        } else if raw.starts_with("\\ ") {
            Token::Marker
        } else {
            Token::Body(raw)
        };
        (i + 1, token)
    })
}

enum State {
    /// Before the first header; file headers and descriptions are ignored
    Preamble,
    InHunk(DiffHunk),
    Skipping(UnparseableHunk),
}

/// Parse a serialized diff
///
/// A header that fails the grammar skips that hunk only; parsing resumes at
/// the next header.
pub fn decode(serialized: &str) -> DecodedDiff {
    let mut decoded = DecodedDiff::default();
    let mut state = State::Preamble;

    for (line_no, token) in tokenize(serialized) {
        match token {
            Token::Header(raw) => {
                finish(&mut decoded, std::mem::replace(&mut state, State::Preamble));
                state = match parse_header(raw) {
                    Some(hunk) => State::InHunk(hunk),
                    None => {
                        tracing::warn!(line = line_no, header = raw, "skipping unparseable hunk");
                        State::Skipping(UnparseableHunk {
                            line: line_no,
                            header: raw.to_string(),
                            skipped_lines: 0,
                        })
                    }
                };
            }
            Token::Marker => {}
            Token::Body(raw) => match &mut state {
                State::Preamble => {}
                State::InHunk(hunk) => hunk.lines.push(parse_body_line(raw)),
                State::Skipping(bad) => bad.skipped_lines += 1,
            },
        }
    }
    finish(&mut decoded, state);

    decoded
}

fn finish(decoded: &mut DecodedDiff, state: State) {
    match state {
        State::Preamble => {}
        State::InHunk(hunk) => {
            if !hunk.counts_match() {
                tracing::debug!(
                    old_start = hunk.old_start,
                    new_start = hunk.new_start,
                    "hunk header counts disagree with body"
                );
            }
            decoded.hunks.push(hunk);
        }
        State::Skipping(bad) => decoded.unparseable.push(bad),
    }
}

fn parse_header(raw: &str) -> Option<DiffHunk> {
    let caps = HUNK_HEADER.captures(raw)?;
    let number = |idx: usize| -> Option<usize> {
        match caps.get(idx).map(|m| m.as_str()) {
            None | Some("") => Some(1),
            Some(digits) => digits.parse().ok(),
        }
    };

    Some(DiffHunk {
        old_start: caps.get(1)?.as_str().parse().ok()?,
        old_count: number(2)?,
        new_start: caps.get(3)?.as_str().parse().ok()?,
        new_count: number(4)?,
        lines: Vec::new(),
    })
}

fn parse_body_line(raw: &str) -> DiffLine {
    if let Some(rest) = raw.strip_prefix('+') {
        DiffLine::Added(rest.to_string())
    } else if let Some(rest) = raw.strip_prefix('-') {
        DiffLine::Removed(rest.to_string())
    } else if let Some(rest) = raw.strip_prefix(' ') {
        DiffLine::Context(rest.to_string())
    } else {
        DiffLine::Context(raw.to_string())
    }
}

/// Serialize hunks to their canonical text form
pub fn serialize(hunks: &[DiffHunk]) -> String {
    let mut output = String::new();

    for hunk in hunks {
        let _ = writeln!(
            output,
            "@@ -{},{} +{},{} @@",
            hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
        );

        for line in &hunk.lines {
            let (prefix, text) = match line {
                DiffLine::Context(s) => (' ', s),
                DiffLine::Added(s) => ('+', s),
                DiffLine::Removed(s) => ('-', s),
            };
            output.push(prefix);
            output.push_str(text);
            output.push('\n');
        }
    }

    output
}
