//! Render contract between the editor core and a painting surface.
//!
//! The core publishes an immutable `Frame` after each key press; a renderer
//! reads the latest one on its own cadence (frame tick) and paints it. Data
//! flows one way: renderers never call back into the core.
//!
//! Frame fields:
//! - `terminal_content()`: every buffer line, in order.
//! - `cursor_pos`: zero-based cell of the cursor. It may sit one past the
//!   last character (insert mode); painters show a blank cursor cell there.
//! - `bottom_bar`: mode string (`--normal--` / `--insert--`).
//! - `visual_highlight`: optional inclusive selection range. The core never
//!   sets it today; painters still honor it.
//!
//! Modules:
//! - `status`: bottom bar composition.
//! - `style`: splits a row into plain / cursor / highlight runs (pure).
//! - `writer`: batched crossterm command emission.
//! - `terminal`: crossterm `Renderer` with vertical auto-scroll.

use std::sync::Arc;

use anyhow::Result;
use core_state::EditorState;
use core_text::Buffer;

pub mod status;
pub mod style;
pub mod terminal;
pub mod writer;

pub use terminal::TerminalRenderer;

/// Zero-based cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub column: usize,
    pub line: usize,
}

impl CellPos {
    pub const fn new(column: usize, line: usize) -> Self {
        Self { column, line }
    }
}

/// Inclusive cell range, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRange {
    pub start: CellPos,
    pub end_inclusive: CellPos,
}

impl HighlightRange {
    pub fn contains(&self, line: usize, column: usize) -> bool {
        let key = |p: CellPos| (p.line, p.column);
        let (lo, hi) = if key(self.start) <= key(self.end_inclusive) {
            (self.start, self.end_inclusive)
        } else {
            (self.end_inclusive, self.start)
        };
        (line, column) >= key(lo) && (line, column) <= key(hi)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    content: Arc<Buffer>,
    pub cursor_pos: CellPos,
    pub bottom_bar: String,
    pub visual_highlight: Option<HighlightRange>,
}

impl Frame {
    pub fn from_state(state: &EditorState) -> Self {
        let (column, line) = state.cursor.zero_based();
        Self {
            content: Arc::clone(&state.buffer),
            cursor_pos: CellPos::new(column, line),
            bottom_bar: status::bottom_bar(state.mode),
            visual_highlight: None,
        }
    }

    pub fn terminal_content(&self) -> &[String] {
        self.content.lines()
    }

    pub fn with_highlight(mut self, range: HighlightRange) -> Self {
        self.visual_highlight = Some(range);
        self
    }
}

/// A painting surface for frames.
pub trait Renderer {
    fn render(&mut self, frame: &Frame) -> Result<()>;
    /// Surface size changed to (columns, rows).
    fn resize(&mut self, cols: u16, rows: u16);
}
