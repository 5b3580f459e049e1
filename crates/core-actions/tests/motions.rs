mod common;

use common::{at, press, state};
use core_actions::apply;
use core_events::KeyEvent;
use core_keymap::MotionDispatcher;
use core_state::Mode;
use pretty_assertions::assert_eq;

#[test]
fn left_at_first_column_stays() {
    let s = press(&state(&["abcde"]), "h");
    assert_eq!(s.cursor, at(1, 1));
}

#[test]
fn right_at_last_column_stays() {
    let s = press(&state(&["abcde"]), "llll");
    assert_eq!(s.cursor, at(5, 1));
    let s = press(&s, "l");
    assert_eq!(s.cursor, at(5, 1));
    assert_eq!(s.furthest_column, 5);
}

#[test]
fn sticky_column_survives_short_line() {
    let s = state(&["0123456789", "abc", "abcdefgh"]);
    let s = press(&s, "lllll");
    assert_eq!(s.cursor, at(6, 1));

    let s = press(&s, "j");
    assert_eq!(s.cursor, at(3, 2));
    assert_eq!(s.furthest_column, 6);

    let s = press(&s, "j");
    assert_eq!(s.cursor, at(6, 3));
}

#[test]
fn sticky_column_restored_moving_back_up() {
    let s = press(&state(&["0123456789", "ab"]), "llllllll");
    let s = press(&s, "jk");
    assert_eq!(s.cursor, at(9, 1));
}

#[test]
fn horizontal_move_resets_sticky_column() {
    let s = press(&state(&["0123456789", "abc", "0123456789"]), "lllll");
    // On the short line, moving left re-anchors the sticky column to where the cursor lands.
    let s = press(&s, "jh");
    assert_eq!(s.cursor, at(2, 2));
    assert_eq!(s.furthest_column, 2);
    let s = press(&s, "j");
    assert_eq!(s.cursor, at(2, 3));
}

#[test]
fn vertical_moves_clamp_to_buffer() {
    let s = press(&state(&["a", "b"]), "k");
    assert_eq!(s.cursor, at(1, 1));
    let s = press(&s, "jjj");
    assert_eq!(s.cursor, at(1, 2));
}

#[test]
fn moving_through_empty_line() {
    let s = press(&state(&["abcd", "", "abcd"]), "lll");
    let s = press(&s, "j");
    assert_eq!(s.cursor, at(1, 2));
    let s = press(&s, "j");
    assert_eq!(s.cursor, at(4, 3));
}

#[test]
fn unbound_key_leaves_state_untouched() {
    let s = state(&["abc"]);
    let t = apply(&s, &KeyEvent::char('z'), &MotionDispatcher::default()).unwrap();
    assert_eq!(t.state, s);
    assert!(!t.result.dirty);
    assert_eq!(t.motion, None);
}

#[test]
fn escape_in_normal_mode_is_a_no_op() {
    let s = press(&state(&["abc"]), "l");
    let t = apply(&s, &KeyEvent::esc(), &MotionDispatcher::default()).unwrap();
    assert_eq!(t.state, s);
    assert_eq!(t.state.mode, Mode::Normal);
}

#[test]
fn apply_does_not_mutate_its_input() {
    let s = state(&["abc"]);
    let before = s.clone();
    let t = apply(&s, &KeyEvent::char('l'), &MotionDispatcher::default()).unwrap();
    assert_eq!(s, before);
    assert_eq!(t.state.cursor, at(2, 1));
    assert!(t.result.dirty);
}
