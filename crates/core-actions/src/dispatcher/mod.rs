//! Pure key-event transition for the editor state machine.
//!
//! Sub-modules:
//! * `motion` - cursor movement (clamping, sticky column)
//! * `mode`   - Normal <-> Insert transitions and insert entry placement
//!
//! `apply` never mutates its input; it clones the state (the buffer is shared
//! through an `Arc`) and returns the successor inside a `Transition`.
//!
//! Routing order:
//! 1. Insert mode: `Escape` leaves Insert; every other key is text entry,
//!    which this core does not implement, so it is a no-op.
//! 2. Normal mode: the key identifier is resolved through the dispatcher; a
//!    miss (unbound or pending prefix) is a no-op.

use core_events::KeyEvent;
use core_keymap::{Motion, MotionDispatcher};
use core_state::{EditorState, Mode, StateError};
use tracing::trace;

mod mode;
mod motion;

/// Result of applying a single key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Whether the published frame (cursor or mode) changed.
    pub dirty: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self { dirty: true }
    }
    pub fn clean() -> Self {
        Self { dirty: false }
    }
}

/// Successor state plus what happened on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: EditorState,
    pub result: DispatchResult,
    /// Motion the key resolved to, if any.
    pub motion: Option<Motion>,
}

impl Transition {
    fn unchanged(state: &EditorState) -> Self {
        Self {
            state: state.clone(),
            result: DispatchResult::clean(),
            motion: None,
        }
    }
}

/// Compute the successor of `state` for one key press.
///
/// Errors only surface buffer `OutOfRange` conditions, which indicate a
/// clamping defect rather than bad input.
pub fn apply(
    state: &EditorState,
    key: &KeyEvent,
    dispatcher: &MotionDispatcher,
) -> Result<Transition, StateError> {
    match state.mode {
        Mode::Insert => {
            if !key.is_escape() {
                trace!(target: "actions.dispatch", key = %key, "insert_key_ignored");
                return Ok(Transition::unchanged(state));
            }
            let mut next = state.clone();
            let result = mode::leave_insert(&mut next)?;
            Ok(Transition {
                state: next,
                result,
                motion: None,
            })
        }
        Mode::Normal => {
            let id = key.key_identifier();
            let Some(motion) = dispatcher.resolve(&id) else {
                trace!(target: "actions.dispatch", key = %id, "unbound_key");
                return Ok(Transition::unchanged(state));
            };
            let mut next = state.clone();
            let result = if motion.enters_insert() {
                mode::enter_insert(motion, &mut next)?
            } else {
                motion::handle_motion(motion, &mut next)?
            };
            Ok(Transition {
                state: next,
                result,
                motion: Some(motion),
            })
        }
    }
}
