//! Editor state: cursor, mode, sticky column and the shared buffer.
//!
//! Coordinates here are 1-based (column 1 is the first character, line 1 the
//! first line). The buffer itself is addressed 0-based; conversion happens at
//! the query sites in `core-actions`.
//!
//! `EditorState` is a value: transitions in `core-actions` take `&EditorState`
//! and return a new one. The buffer sits behind an `Arc` so those copies and
//! the snapshots handed to the renderer do not clone text.

use std::sync::Arc;

use core_text::{Buffer, BufferError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
        }
    }
}

/// Cursor location, 1-based on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorPosition {
    pub column: usize,
    pub line: usize,
}

impl CursorPosition {
    pub const fn new(column: usize, line: usize) -> Self {
        Self { column, line }
    }

    pub const fn origin() -> Self {
        Self { column: 1, line: 1 }
    }

    /// Zero-based `(column, line)` for consumers that address cells from 0.
    pub fn zero_based(&self) -> (usize, usize) {
        (self.column.saturating_sub(1), self.line.saturating_sub(1))
    }
}

/// Whether a horizontal move may land one past the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    /// Clamp to `[1, line_length]`.
    Enforced,
    /// Clamp to `[1, line_length + 1]` (insert-mode entry points).
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub cursor: CursorPosition,
    pub mode: Mode,
    /// Column the cursor would occupy without line-length clamping. Vertical
    /// moves never shrink it; horizontal moves reset it.
    pub furthest_column: usize,
    pub buffer: Arc<Buffer>,
}

impl EditorState {
    /// Fresh state in Normal mode at line 1, column 1. `Buffer` guarantees at
    /// least one line, so the origin is always addressable.
    pub fn new(buffer: impl Into<Arc<Buffer>>) -> Self {
        Self {
            cursor: CursorPosition::origin(),
            mode: Mode::Normal,
            furthest_column: 1,
            buffer: buffer.into(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Char length of a 1-based line.
    pub fn line_length(&self, line: usize) -> Result<usize, StateError> {
        Ok(self.buffer.line_length(line.wrapping_sub(1))?)
    }

    pub fn current_line_length(&self) -> Result<usize, StateError> {
        self.line_length(self.cursor.line)
    }

    /// First non-space char of the current line as a 0-based index.
    pub fn current_first_non_blank(&self) -> Result<Option<usize>, StateError> {
        Ok(self
            .buffer
            .first_non_blank_column(self.cursor.line.wrapping_sub(1))?)
    }
}
