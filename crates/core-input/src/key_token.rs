use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event into a host-neutral `KeyEvent`.
///
/// Returns `None` for releases and for key codes the editor has no use for
/// (function keys, media keys, lone modifiers, ...).
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let code = map_key_code(&event.code)?;
    Some(KeyEvent::new(code, map_mods(event.modifiers)))
}

pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let code = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        _ => return None,
    };
    Some(code)
}

pub(crate) fn map_mods(m: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
