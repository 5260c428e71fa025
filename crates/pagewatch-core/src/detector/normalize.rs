//! Content normalization applied before change comparison

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// How observed content is normalized before deciding whether it changed
///
/// Normalization only affects the *decision* and the recorded content hash.
/// The archived snapshot and every diff are computed on the raw text, so a
/// whitespace-only edit that normalization hides is folded into the next
/// recorded change instead of being lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Byte-for-byte comparison
    Exact,
    /// Unify `\r\n` to `\n` and ignore trailing whitespace on each line and
    /// trailing blank lines
    #[default]
    TrailingWhitespace,
    /// Additionally collapse runs of whitespace inside lines and drop blank
    /// lines
    Whitespace,
}

impl Normalization {
    /// Normalize `text`
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Exact => text.to_string(),
            Self::TrailingWhitespace => {
                let unified = text.replace("\r\n", "\n");
                let lines: Vec<&str> = unified.lines().map(str::trim_end).collect();
                lines.join("\n").trim_end_matches('\n').to_string()
            }
            Self::Whitespace => text
                .lines()
                .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl std::fmt::Display for Normalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::TrailingWhitespace => write!(f, "trailing-whitespace"),
            Self::Whitespace => write!(f, "whitespace"),
        }
    }
}

/// SHA-256 hex digest of `content`
pub fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_keeps_everything() {
        assert_eq!(Normalization::Exact.apply("a  \r\nb\n"), "a  \r\nb\n");
    }

    #[test]
    fn test_trailing_whitespace() {
        let n = Normalization::TrailingWhitespace;
        assert_eq!(n.apply("a  \r\nb\t\n\n"), "a\nb");
        assert_eq!(n.apply("a\nb"), n.apply("a \nb\n"));
        assert_ne!(n.apply("a b"), n.apply("a  b"));
    }

    #[test]
    fn test_whitespace() {
        let n = Normalization::Whitespace;
        assert_eq!(n.apply("  a   b \n\n\tc"), "a b\nc");
    }

    #[test]
    fn test_content_hash() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_hash("a").len(), 64);
    }
}
