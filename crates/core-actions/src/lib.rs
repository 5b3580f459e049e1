//! core-actions: editor state machine driven by key events.
//!
//! `dispatcher::apply` is the pure transition. `Editor` is the single writer
//! that owns the current state, the active binding table and the compiled
//! dispatcher cache, and hands out immutable snapshots for rendering.

use std::sync::Arc;

use core_events::KeyEvent;
use core_keymap::{BindingTable, DispatcherCache, baseline_normal_bindings};
use core_state::{EditorState, StateError};
use core_text::Buffer;
use tracing::debug;

pub mod dispatcher;
pub use dispatcher::{DispatchResult, Transition, apply};

pub struct Editor {
    state: EditorState,
    bindings: Arc<BindingTable>,
    cache: DispatcherCache,
}

impl Editor {
    pub fn new(buffer: Buffer, bindings: Arc<BindingTable>) -> Self {
        Self {
            state: EditorState::new(buffer),
            bindings,
            cache: DispatcherCache::new(),
        }
    }

    pub fn with_default_bindings(buffer: Buffer) -> Self {
        Self::new(buffer, Arc::new(baseline_normal_bindings()))
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Immutable copy of the current state for the render side.
    pub fn snapshot(&self) -> EditorState {
        self.state.clone()
    }

    pub fn bindings(&self) -> &Arc<BindingTable> {
        &self.bindings
    }

    /// Swap the binding table. The trie is recompiled lazily on the next key.
    pub fn set_bindings(&mut self, bindings: Arc<BindingTable>) {
        if !Arc::ptr_eq(&self.bindings, &bindings) {
            debug!(target: "actions.dispatch", bindings = bindings.len(), "bindings_replaced");
            self.bindings = bindings;
        }
    }

    /// Apply one key press and adopt the successor state.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<DispatchResult, StateError> {
        let dispatcher = self.cache.get(&self.bindings);
        let transition = apply(&self.state, key, dispatcher)?;
        self.state = transition.state;
        Ok(transition.result)
    }

    /// Number of times the binding trie has been compiled.
    pub fn dispatcher_rebuilds(&self) -> usize {
        self.cache.rebuilds()
    }
}
