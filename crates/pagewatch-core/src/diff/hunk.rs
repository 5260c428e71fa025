//! Hunk and line operation types

/// One contiguous region of change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffHunk {
    /// 1-based first line on the old side
    pub old_start: usize,
    pub old_count: usize,
    /// 1-based first line on the new side
    pub new_start: usize,
    pub new_count: usize,
    /// Tagged line operations, in order
    pub lines: Vec<DiffLine>,
}

/// A tagged diff line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

impl DiffLine {
    /// Text of the line without its tag
    pub fn text(&self) -> &str {
        match self {
            Self::Context(s) | Self::Added(s) | Self::Removed(s) => s,
        }
    }

    /// Whether the line is an addition or removal
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Context(_))
    }
}

impl DiffHunk {
    /// 0-based index of the hunk's first line in the old text
    pub fn old_index(&self) -> usize {
        Self::zero_based(self.old_start, self.old_count)
    }

    /// 0-based index of the hunk's first line in the new text
    pub fn new_index(&self) -> usize {
        Self::zero_based(self.new_start, self.new_count)
    }

    fn zero_based(start: usize, count: usize) -> usize {
        if count == 0 {
            start
        } else {
            start.saturating_sub(1)
        }
    }

    /// Number of old-side lines the operations cover (context + removed)
    pub fn old_span(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| !matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Number of new-side lines the operations cover (context + added)
    pub fn new_span(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| !matches!(l, DiffLine::Removed(_)))
            .count()
    }

    /// Whether the header counts agree with the body
    pub fn counts_match(&self) -> bool {
        self.old_span() == self.old_count && self.new_span() == self.new_count
    }
}

/// Added/removed line totals for a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub hunks: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    /// Tally a sequence of hunks
    pub fn from_hunks(hunks: &[DiffHunk]) -> Self {
        let mut stats = Self {
            hunks: hunks.len(),
            ..Self::default()
        };
        for line in hunks.iter().flat_map(|h| &h.lines) {
            match line {
                DiffLine::Added(_) => stats.added += 1,
                DiffLine::Removed(_) => stats.removed += 1,
                DiffLine::Context(_) => {}
            }
        }
        stats
    }
}

impl std::fmt::Display for DiffStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{} -{}", self.added, self.removed)
    }
}
