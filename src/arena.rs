//! Flat storage for node children.
//!
//! Every [`Node`] refers to its children by an `(offset, size)` pair into
//! one growable buffer. Offsets stay stable until [`LitArena::compact`],
//! which rebuilds the buffer from the live nodes and rewrites their offsets.

use crate::node::Node;
use crate::types::Lit;

#[derive(Debug, Default, Clone)]
pub struct LitArena {
    literals: Vec<Lit>,
}

impl LitArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Appends `args` and returns the offset of the first one.
    pub fn push(&mut self, args: &[Lit]) -> u32 {
        let offset = self.literals.len() as u32;
        self.literals.extend_from_slice(args);
        offset
    }

    /// Drops the last `n` literals (used to undo a rejected `push`).
    pub fn truncate_tail(&mut self, n: usize) {
        let len = self.literals.len().saturating_sub(n);
        self.literals.truncate(len);
    }

    pub fn children(&self, node: &Node) -> &[Lit] {
        debug_assert!(node.range().end <= self.literals.len());
        &self.literals[node.range()]
    }

    pub fn children_mut(&mut self, node: &Node) -> &mut [Lit] {
        debug_assert!(node.range().end <= self.literals.len());
        &mut self.literals[node.range()]
    }

    /// Rebuilds the buffer keeping only the children of `live` nodes.
    ///
    /// Offsets of the given nodes are rewritten in place.
    pub fn compact<'a>(&mut self, live: impl IntoIterator<Item = &'a mut Node>) {
        let mut fresh = Vec::with_capacity(self.literals.len() / 2);
        for node in live {
            if node.is_empty() {
                node.offset = 0;
                continue;
            }
            let offset = fresh.len() as u32;
            fresh.extend_from_slice(&self.literals[node.range()]);
            node.offset = offset;
        }
        log::debug!("compact: {} -> {} literals", self.literals.len(), fresh.len());
        self.literals = fresh;
    }
}
