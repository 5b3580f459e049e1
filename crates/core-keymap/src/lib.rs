//! core-keymap: key-string to motion resolution.
//!
//! Design principles:
//! - Pure and deterministic: resolution depends only on the key string and the
//!   binding table the dispatcher was compiled from.
//! - Binding tables are compiled into a prefix tree (`trie::Trie`) once per
//!   distinct table; `DispatcherCache` memoizes on table identity.
//! - Ambiguity is surfaced by returning `None`: a key that is only a strict
//!   prefix of a longer binding resolves exactly like an unbound key.
//! - No pending-sequence buffer. Every `resolve` call stands alone, so a
//!   multi-character binding is only reachable when the caller hands over the
//!   whole string at once. Live typing therefore triggers single-character
//!   bindings only.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, trace};

pub mod trie;
pub use trie::Trie;

// -------------------------------------------------------------------------------------------------
// Motion
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Down,
    Up,
    Right,
    InsertBefore,          // 'i'
    InsertAfter,           // 'a'
    InsertAtFirstNonBlank, // 'I'
    InsertAtLineEnd,       // 'A'
}

impl Motion {
    pub const ALL: [Motion; 8] = [
        Motion::Left,
        Motion::Down,
        Motion::Up,
        Motion::Right,
        Motion::InsertBefore,
        Motion::InsertAfter,
        Motion::InsertAtFirstNonBlank,
        Motion::InsertAtLineEnd,
    ];

    /// Stable snake_case name used by configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Motion::Left => "left",
            Motion::Down => "down",
            Motion::Up => "up",
            Motion::Right => "right",
            Motion::InsertBefore => "insert_before",
            Motion::InsertAfter => "insert_after",
            Motion::InsertAtFirstNonBlank => "insert_at_first_non_blank",
            Motion::InsertAtLineEnd => "insert_at_line_end",
        }
    }

    pub fn enters_insert(self) -> bool {
        matches!(
            self,
            Motion::InsertBefore
                | Motion::InsertAfter
                | Motion::InsertAtFirstNonBlank
                | Motion::InsertAtLineEnd
        )
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown motion name `{0}`")]
pub struct UnknownMotion(pub String);

impl FromStr for Motion {
    type Err = UnknownMotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Motion::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| UnknownMotion(s.to_string()))
    }
}

// -------------------------------------------------------------------------------------------------
// Binding table
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionBinding {
    pub key: String,
    pub motion: Motion,
}

impl MotionBinding {
    pub fn new(key: impl Into<String>, motion: Motion) -> Self {
        Self {
            key: key.into(),
            motion,
        }
    }
}

/// Ordered key-string to motion table. Later entries for the same key win
/// when compiled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    bindings: Vec<MotionBinding>,
}

impl BindingTable {
    pub fn new(bindings: Vec<MotionBinding>) -> Self {
        Self { bindings }
    }

    /// Replace the binding for `key` in place, or append a new one.
    pub fn bind(&mut self, key: impl Into<String>, motion: Motion) {
        let key = key.into();
        match self.bindings.iter_mut().find(|b| b.key == key) {
            Some(existing) => existing.motion = motion,
            None => self.bindings.push(MotionBinding { key, motion }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MotionBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Baseline Normal mode bindings (hjkl plus the four insert entry points).
pub fn baseline_normal_bindings() -> BindingTable {
    BindingTable::new(vec![
        MotionBinding::new("h", Motion::Left),
        MotionBinding::new("j", Motion::Down),
        MotionBinding::new("k", Motion::Up),
        MotionBinding::new("l", Motion::Right),
        MotionBinding::new("i", Motion::InsertBefore),
        MotionBinding::new("a", Motion::InsertAfter),
        MotionBinding::new("I", Motion::InsertAtFirstNonBlank),
        MotionBinding::new("A", Motion::InsertAtLineEnd),
    ])
}

// -------------------------------------------------------------------------------------------------
// Dispatcher
// -------------------------------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct MotionDispatcher {
    trie: Trie<Motion>,
}

impl MotionDispatcher {
    pub fn build(table: &BindingTable) -> Self {
        let mut trie = Trie::new();
        for binding in table.iter() {
            if !trie.insert(&binding.key, binding.motion) {
                debug!(target: "input.map", motion = %binding.motion, "binding_skipped_empty_key");
            }
        }
        debug!(target: "input.map", bindings = trie.len(), "dispatcher_built");
        Self { trie }
    }

    /// Resolve a complete key string. `None` covers both "unbound" and "strict
    /// prefix of a longer binding"; neither triggers an action.
    pub fn resolve(&self, key: &str) -> Option<Motion> {
        let motion = self.trie.get(key).copied();
        if motion.is_none() && self.trie.is_prefix(key) {
            trace!(target: "input.map", key, "pending_prefix_dropped");
        }
        motion
    }

    pub fn is_pending_prefix(&self, key: &str) -> bool {
        self.trie.is_prefix(key)
    }

    pub fn bindings(&self) -> Vec<(String, Motion)> {
        self.trie
            .entries()
            .into_iter()
            .map(|(k, m)| (k, *m))
            .collect()
    }
}

impl Default for MotionDispatcher {
    fn default() -> Self {
        Self::build(&baseline_normal_bindings())
    }
}

/// Memoized dispatcher keyed on the identity of the binding table `Arc`.
/// Handing the same `Arc` back never rebuilds; a different `Arc` (even with
/// equal contents) rebuilds once.
#[derive(Debug, Default)]
pub struct DispatcherCache {
    compiled: Option<(Arc<BindingTable>, MotionDispatcher)>,
    rebuilds: usize,
}

impl DispatcherCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, table: &Arc<BindingTable>) -> &MotionDispatcher {
        let hit = matches!(&self.compiled, Some((cached, _)) if Arc::ptr_eq(cached, table));
        if !hit {
            self.rebuilds += 1;
            debug!(target: "input.map", rebuilds = self.rebuilds, "dispatcher_cache_rebuild");
            self.compiled = Some((Arc::clone(table), MotionDispatcher::build(table)));
        }
        let (_, dispatcher) = self.compiled.as_ref().expect("dispatcher cache populated above");
        dispatcher
    }

    /// Number of trie compilations performed so far.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}
