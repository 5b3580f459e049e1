//! Crossterm painter for `Frame`s.
//!
//! The last screen row holds the bottom bar; the rows above show buffer lines
//! starting at `first_line`, which follows the cursor so it never leaves the
//! viewport. Every frame is a full repaint; frames are small.

use crate::style::{StyleAttr, compose_row};
use crate::writer::Writer;
use crate::{Frame, Renderer};
use anyhow::Result;
use tracing::trace;

#[derive(Debug)]
pub struct TerminalRenderer {
    cols: u16,
    rows: u16,
    first_line: usize,
}

impl TerminalRenderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            first_line: 0,
        }
    }

    fn text_rows(&self) -> usize {
        usize::from(self.rows.saturating_sub(1)).max(1)
    }

    /// Scroll so `cursor_line` is visible; returns the first visible line.
    pub fn follow_cursor(&mut self, cursor_line: usize) -> usize {
        let h = self.text_rows();
        if cursor_line < self.first_line {
            self.first_line = cursor_line;
        } else if cursor_line >= self.first_line + h {
            self.first_line = cursor_line + 1 - h;
        }
        self.first_line
    }

    /// Build the writer commands for `frame` without touching the terminal.
    pub fn compose(&mut self, frame: &Frame) -> Writer {
        let first = self.follow_cursor(frame.cursor_pos.line);
        let cols = usize::from(self.cols);
        let lines = frame.terminal_content();
        let mut w = Writer::new();
        for screen_row in 0..self.text_rows() {
            let y = screen_row as u16;
            w.move_to(0, y);
            w.clear_line();
            let idx = first + screen_row;
            if let Some(line) = lines.get(idx) {
                for run in compose_row(line, idx, frame, cols) {
                    w.print(run.text, run.attr);
                }
            } else {
                w.print("~", StyleAttr::Plain);
            }
        }
        let status_row = self.rows.saturating_sub(1);
        w.move_to(0, status_row);
        w.clear_line();
        let bar: String = frame.bottom_bar.chars().take(cols).collect();
        w.print(bar, StyleAttr::Plain);
        w
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        let w = self.compose(frame);
        trace!(
            target: "render",
            first_line = self.first_line,
            cursor_line = frame.cursor_pos.line,
            cursor_col = frame.cursor_pos.column,
            "frame"
        );
        w.flush()
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }
}
