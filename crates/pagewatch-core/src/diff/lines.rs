//! Document line model
//!
//! A document is split on `\n` only, so `join_lines(split_lines(t)) == t` for
//! every input, including a trailing newline (which shows up as a final empty
//! line) and the empty string (a single empty line).

/// Split a document into lines
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Join lines back into a document
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}
