#![allow(dead_code)] // Shared across several integration tests; each test binary uses a subset of helpers.

use core_actions::apply;
use core_events::KeyEvent;
use core_keymap::MotionDispatcher;
use core_state::{CursorPosition, EditorState};
use core_text::Buffer;

pub fn state(lines: &[&str]) -> EditorState {
    EditorState::new(Buffer::from_lines("test", lines.iter().copied()).expect("non-empty buffer"))
}

/// Feed a string of printable keys through the pure transition.
pub fn press(state: &EditorState, keys: &str) -> EditorState {
    let dispatcher = MotionDispatcher::default();
    keys.chars().fold(state.clone(), |s, c| {
        apply(&s, &KeyEvent::char(c), &dispatcher)
            .expect("transition")
            .state
    })
}

pub fn escape(state: &EditorState) -> EditorState {
    apply(state, &KeyEvent::esc(), &MotionDispatcher::default())
        .expect("transition")
        .state
}

pub fn at(column: usize, line: usize) -> CursorPosition {
    CursorPosition::new(column, line)
}
