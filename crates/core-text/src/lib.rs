//! Line-oriented, read-only text buffer.
//!
//! Lines are stored 0-indexed without their terminators. Lengths and column
//! indices count `char`s. Queries never clamp: an index outside
//! `[0, line_count)` is reported as `BufferError::OutOfRange` so the caller's
//! own clamping bug stays visible.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("line {line} out of range (buffer has {line_count} lines)")]
    OutOfRange { line: usize, line_count: usize },
    #[error("buffer must contain at least one line")]
    EmptyBuffer,
}

pub type Result<T> = std::result::Result<T, BufferError>;

/// An immutable sequence of text lines. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
    pub name: String,
}

impl Buffer {
    /// Construct from pre-split lines. Rejects a zero-line input.
    pub fn from_lines<I, S>(name: impl Into<String>, lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return Err(BufferError::EmptyBuffer);
        }
        Ok(Self {
            lines,
            name: name.into(),
        })
    }

    /// Construct from raw text, splitting on `\n` and dropping a trailing `\r`
    /// per line. Empty input yields a single empty line; a trailing newline
    /// does not produce an extra empty line.
    pub fn from_str(name: impl Into<String>, content: &str) -> Self {
        let mut lines: Vec<String> = content
            .lines()
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            name: name.into(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn checked_line(&self, idx: usize) -> Result<&str> {
        self.line(idx).ok_or(BufferError::OutOfRange {
            line: idx,
            line_count: self.lines.len(),
        })
    }

    /// Length of a line in chars.
    pub fn line_length(&self, idx: usize) -> Result<usize> {
        Ok(self.checked_line(idx)?.chars().count())
    }

    /// 0-based char index of the first character that is not a space, or
    /// `None` when the line is empty or made only of spaces. Tabs and other
    /// whitespace count as non-blank.
    pub fn first_non_blank_column(&self, idx: usize) -> Result<Option<usize>> {
        Ok(self.checked_line(idx)?.chars().position(|c| c != ' '))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(lines: &[&str]) -> Buffer {
        Buffer::from_lines("test", lines.iter().copied()).unwrap()
    }

    #[test]
    fn rejects_zero_lines() {
        let err = Buffer::from_lines("empty", Vec::<String>::new()).unwrap_err();
        assert_eq!(err, BufferError::EmptyBuffer);
    }

    #[test]
    fn from_str_always_has_a_line() {
        let b = Buffer::from_str("x", "");
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line_length(0).unwrap(), 0);
    }

    #[test]
    fn from_str_strips_crlf_and_trailing_newline() {
        let b = Buffer::from_str("x", "one\r\ntwo\n");
        assert_eq!(b.lines(), &["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn line_length_counts_chars() {
        let b = buf(&["hello", "", "héllo"]);
        assert_eq!(b.line_length(0).unwrap(), 5);
        assert_eq!(b.line_length(1).unwrap(), 0);
        assert_eq!(b.line_length(2).unwrap(), 5);
    }

    #[test]
    fn line_length_out_of_range() {
        let b = buf(&["a", "b"]);
        assert_eq!(
            b.line_length(2),
            Err(BufferError::OutOfRange {
                line: 2,
                line_count: 2
            })
        );
    }

    #[test]
    fn first_non_blank_after_leading_spaces() {
        let b = buf(&["  hi", "hi", "    ", "", "\tx"]);
        assert_eq!(b.first_non_blank_column(0).unwrap(), Some(2));
        assert_eq!(b.first_non_blank_column(1).unwrap(), Some(0));
        assert_eq!(b.first_non_blank_column(2).unwrap(), None);
        assert_eq!(b.first_non_blank_column(3).unwrap(), None);
        assert_eq!(b.first_non_blank_column(4).unwrap(), Some(0));
    }

    #[test]
    fn first_non_blank_out_of_range() {
        let b = buf(&["x"]);
        assert!(matches!(
            b.first_non_blank_column(7),
            Err(BufferError::OutOfRange { line: 7, .. })
        ));
    }
}
