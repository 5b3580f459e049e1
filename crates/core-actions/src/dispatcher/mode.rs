//! Mode transitions (Normal <-> Insert) and their cursor placement.

use super::DispatchResult;
use super::motion::move_horizontal;
use core_keymap::Motion;
use core_state::{Bounds, EditorState, Mode, StateError};
use tracing::debug;

/// Enter Insert mode through one of the insert motions. Non-insert motions
/// are rejected as a clean no-op.
pub(crate) fn enter_insert(
    motion: Motion,
    state: &mut EditorState,
) -> Result<DispatchResult, StateError> {
    let column = state.cursor.column;
    match motion {
        Motion::InsertBefore => {}
        Motion::InsertAfter => {
            move_horizontal(state, column + 1, Bounds::Ignored)?;
        }
        Motion::InsertAtFirstNonBlank => {
            // All-blank line: mode still switches, cursor stays put.
            if let Some(idx) = state.current_first_non_blank()? {
                move_horizontal(state, idx + 1, Bounds::Ignored)?;
            }
        }
        Motion::InsertAtLineEnd => {
            let len = state.current_line_length()?;
            move_horizontal(state, len + 1, Bounds::Ignored)?;
        }
        _ => return Ok(DispatchResult::clean()),
    }
    state.mode = Mode::Insert;
    debug!(
        target: "actions.mode",
        via = %motion,
        line = state.cursor.line,
        column = state.cursor.column,
        "enter_insert"
    );
    Ok(DispatchResult::dirty())
}

/// `Escape` in Insert mode: step back one column (bounds enforced) and
/// return to Normal mode.
pub(crate) fn leave_insert(state: &mut EditorState) -> Result<DispatchResult, StateError> {
    let column = state.cursor.column;
    move_horizontal(state, column.saturating_sub(1), Bounds::Enforced)?;
    state.mode = Mode::Normal;
    debug!(
        target: "actions.mode",
        line = state.cursor.line,
        column = state.cursor.column,
        "leave_insert"
    );
    Ok(DispatchResult::dirty())
}
