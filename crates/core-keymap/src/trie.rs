//! Generic prefix tree keyed by `char` sequences.
//!
//! Nodes live in a flat arena owned by the tree (index 0 is the root, reached
//! by no character). Edges are stored inline in a `SmallVec` because key
//! binding tables fan out narrowly. Nothing is ever removed; callers rebuild
//! the whole tree when their key set changes.
//!
//! Terminal vs. prefix is *structural*: a node is terminal when it has no
//! outgoing edges, regardless of whether it carries a payload. A stored key
//! that is also a strict prefix of another stored key is therefore a prefix,
//! not a terminal.

use smallvec::SmallVec;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct Edge {
    ch: char,
    next: usize,
}

#[derive(Debug, Clone)]
struct Node<T> {
    ch: Option<char>, // None only for the root
    value: Option<T>,
    edges: SmallVec<[Edge; 4]>,
}

impl<T> Node<T> {
    fn new(ch: Option<char>) -> Self {
        Self {
            ch,
            value: None,
            edges: SmallVec::new(),
        }
    }

    fn child(&self, ch: char) -> Option<usize> {
        self.edges.iter().find(|e| e.ch == ch).map(|e| e.next)
    }

    fn is_terminal(&self) -> bool {
        self.edges.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Trie<T> {
    nodes: Vec<Node<T>>,
    len: usize,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Trie<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None)],
            len: 0,
        }
    }

    /// Store `value` under `key`, replacing any payload already stored at that
    /// exact path. Nodes shared with earlier keys are reused, so re-inserting a
    /// key never detaches longer keys that pass through it.
    ///
    /// Returns `false` (and stores nothing) for an empty key.
    pub fn insert(&mut self, key: &str, value: T) -> bool {
        if key.is_empty() {
            debug!(target: "input.map", "empty_key_rejected");
            return false;
        }
        let mut cur = 0usize;
        for ch in key.chars() {
            cur = match self.nodes[cur].child(ch) {
                Some(next) => next,
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(Node::new(Some(ch)));
                    self.nodes[cur].edges.push(Edge { ch, next: idx });
                    idx
                }
            };
        }
        let replaced = self.nodes[cur].value.replace(value).is_some();
        if replaced {
            trace!(target: "input.map", key, node = cur, "payload_override");
        } else {
            self.len += 1;
        }
        true
    }

    fn node(&self, key: &str) -> Option<&Node<T>> {
        let mut cur = 0usize;
        for (step, ch) in key.chars().enumerate() {
            match self.nodes[cur].child(ch) {
                Some(next) => cur = next,
                None => {
                    trace!(target: "input.map", step, ch = %ch, "miss");
                    return None;
                }
            }
        }
        Some(&self.nodes[cur])
    }

    /// Payload stored exactly at `key`, if any.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.node(key).and_then(|n| n.value.as_ref())
    }

    pub fn is_terminal(&self, key: &str) -> bool {
        self.node(key).is_some_and(Node::is_terminal)
    }

    pub fn is_prefix(&self, key: &str) -> bool {
        self.node(key).is_some_and(|n| !n.is_terminal())
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All stored `(key, payload)` pairs, depth first in edge insertion order.
    pub fn entries(&self) -> Vec<(String, &T)> {
        let mut out = Vec::with_capacity(self.len);
        let mut path = String::new();
        self.collect(0, &mut path, &mut out);
        out
    }

    fn collect<'a>(&'a self, idx: usize, path: &mut String, out: &mut Vec<(String, &'a T)>) {
        let node = &self.nodes[idx];
        if let Some(ch) = node.ch {
            path.push(ch);
        }
        if let Some(value) = node.value.as_ref() {
            out.push((path.clone(), value));
        }
        for edge in &node.edges {
            self.collect(edge.next, path, out);
        }
        if node.ch.is_some() {
            path.pop();
        }
    }
}
