//! Cursor movement (horizontal clamp, vertical sticky column).
//!
//! All arithmetic is 1-based. Clamping lives here and only here: the buffer
//! accessor never clamps, so any `OutOfRange` coming back from a query below
//! means the clamp itself is wrong and is propagated untouched.

use super::DispatchResult;
use core_keymap::Motion;
use core_state::{Bounds, CursorPosition, EditorState, StateError};

pub(crate) fn handle_motion(
    motion: Motion,
    state: &mut EditorState,
) -> Result<DispatchResult, StateError> {
    let before = state.cursor;
    match motion {
        Motion::Left => move_horizontal(state, before.column.saturating_sub(1), Bounds::Enforced)?,
        Motion::Right => move_horizontal(state, before.column + 1, Bounds::Enforced)?,
        Motion::Up => move_vertical(state, before.line.saturating_sub(1))?,
        Motion::Down => move_vertical(state, before.line + 1)?,
        // Insert entry points are routed through `mode`; nothing to move here.
        _ => return Ok(DispatchResult::clean()),
    }
    if before != state.cursor {
        tracing::trace!(
            target: "actions.dispatch",
            motion = %motion,
            line = before.line,
            column = before.column,
            to_line = state.cursor.line,
            to_column = state.cursor.column,
            furthest = state.furthest_column,
            "motion"
        );
        Ok(DispatchResult::dirty())
    } else {
        Ok(DispatchResult::clean())
    }
}

/// Move to column `x` on the current line. The landing column also becomes
/// the new sticky column.
pub(crate) fn move_horizontal(
    state: &mut EditorState,
    x: usize,
    bounds: Bounds,
) -> Result<(), StateError> {
    let len = state.current_line_length()?;
    let max = match bounds {
        Bounds::Enforced => len,
        Bounds::Ignored => len + 1,
    }
    .max(1);
    let x = x.clamp(1, max);
    state.cursor.column = x;
    state.furthest_column = x;
    Ok(())
}

/// Move to line `y`, restoring as much of the sticky column as the target
/// line allows. Vertical moves never shrink `furthest_column`.
pub(crate) fn move_vertical(state: &mut EditorState, y: usize) -> Result<(), StateError> {
    let y = y.clamp(1, state.line_count());
    let len = state.line_length(y)?;
    let x = state.furthest_column.min(len).max(1);
    state.cursor = CursorPosition::new(x, y);
    state.furthest_column = state.furthest_column.max(x);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Buffer;

    fn setup(lines: &[&str]) -> EditorState {
        EditorState::new(Buffer::from_lines("t", lines.iter().copied()).unwrap())
    }

    #[test]
    fn enforced_clamps_to_line_length() {
        let mut s = setup(&["abc"]);
        move_horizontal(&mut s, 9, Bounds::Enforced).unwrap();
        assert_eq!(s.cursor.column, 3);
        assert_eq!(s.furthest_column, 3);
    }

    #[test]
    fn ignored_allows_one_past_end() {
        let mut s = setup(&["abc"]);
        move_horizontal(&mut s, 9, Bounds::Ignored).unwrap();
        assert_eq!(s.cursor.column, 4);
    }

    #[test]
    fn column_never_drops_below_one() {
        let mut s = setup(&[""]);
        move_horizontal(&mut s, 0, Bounds::Enforced).unwrap();
        assert_eq!(s.cursor.column, 1);
        move_horizontal(&mut s, 0, Bounds::Ignored).unwrap();
        assert_eq!(s.cursor.column, 1);
    }

    #[test]
    fn vertical_clamps_line_and_keeps_sticky() {
        let mut s = setup(&["0123456789", "ab"]);
        move_horizontal(&mut s, 8, Bounds::Enforced).unwrap();
        move_vertical(&mut s, 5).unwrap();
        assert_eq!(s.cursor, CursorPosition::new(2, 2));
        assert_eq!(s.furthest_column, 8);
        move_vertical(&mut s, 0).unwrap();
        assert_eq!(s.cursor, CursorPosition::new(8, 1));
    }

    #[test]
    fn vertical_onto_empty_line_lands_on_column_one() {
        let mut s = setup(&["abc", ""]);
        move_horizontal(&mut s, 3, Bounds::Enforced).unwrap();
        move_vertical(&mut s, 2).unwrap();
        assert_eq!(s.cursor, CursorPosition::new(1, 2));
        assert_eq!(s.furthest_column, 3);
    }

    #[test]
    fn handle_motion_reports_clean_when_blocked() {
        let mut s = setup(&["abc"]);
        let res = handle_motion(Motion::Left, &mut s).unwrap();
        assert!(!res.dirty);
        let res = handle_motion(Motion::Right, &mut s).unwrap();
        assert!(res.dirty);
    }
}
