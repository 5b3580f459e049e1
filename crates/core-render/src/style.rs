//! Row styling: split one buffer line into runs of equal attribute.
//!
//! Columns are chars, matching the buffer's column model; the row budget is
//! in terminal cells, so a wide char costs two. The cursor wins over a
//! highlight on the same char. A cursor past the end of the line is painted
//! as a single blank cell so it stays visible in insert mode and on empty
//! lines.

use crate::Frame;
use unicode_width::UnicodeWidthChar;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleAttr {
    Plain,
    Cursor,
    Highlight,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub attr: StyleAttr,
}

impl StyledRun {
    fn new(ch: char, attr: StyleAttr) -> Self {
        Self {
            text: ch.to_string(),
            attr,
        }
    }
}

/// Runs for buffer row `row` (zero-based), truncated to `max_cols` terminal
/// cells. A wide char that would straddle the edge is dropped whole.
pub fn compose_row(line: &str, row: usize, frame: &Frame, max_cols: usize) -> Vec<StyledRun> {
    let chars: Vec<char> = line.chars().collect();
    let cursor_col = (frame.cursor_pos.line == row).then_some(frame.cursor_pos.column);
    let span = chars.len().max(cursor_col.map_or(0, |c| c + 1));
    let mut cells = 0usize;
    let mut runs: Vec<StyledRun> = Vec::new();
    for col in 0..span {
        let ch = chars.get(col).copied().unwrap_or(' ');
        let w = ch.width().unwrap_or(0);
        if cells + w > max_cols {
            break;
        }
        cells += w;
        let attr = if cursor_col == Some(col) {
            StyleAttr::Cursor
        } else if col < chars.len()
            && frame
                .visual_highlight
                .is_some_and(|h| h.contains(row, col))
        {
            StyleAttr::Highlight
        } else {
            StyleAttr::Plain
        };
        match runs.last_mut() {
            Some(run) if run.attr == attr => run.text.push(ch),
            _ => runs.push(StyledRun::new(ch, attr)),
        }
    }
    runs
}
