//! Alternative node definitions per variable.

use crate::arena::LitArena;
use crate::node::{BoolOp, Node};
use crate::types::{Lit, Var};

/// What [`AigStore::add_node`] did with a definition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Insertion {
    /// The definition replaced everything the variable had (first real
    /// definition of a leaf, or a constant).
    Main { node: Node, replaced: usize },
    /// Added as an alternative, possibly evicting a wider one.
    Aux { node: Node, evicted: Option<Node> },
    /// Not stored.
    Rejected,
}

#[derive(Debug, Default, Clone)]
pub struct AigStore {
    defs: Vec<Vec<Node>>,
    arena: LitArena,
    max_aux: usize,
}

impl AigStore {
    pub fn new(max_aux: usize) -> Self {
        Self {
            defs: Vec::new(),
            arena: LitArena::new(),
            max_aux,
        }
    }

    /// Number of variable slots.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn reserve(&mut self, v: Var) {
        if self.defs.len() <= v.index() {
            self.defs.resize_with(v.index() + 1, Vec::new);
        }
    }

    pub fn arena(&self) -> &LitArena {
        &self.arena
    }

    pub fn children(&self, node: &Node) -> &[Lit] {
        self.arena.children(node)
    }

    /// Definitions of `v`, main definition first.
    pub fn defs(&self, v: Var) -> &[Node] {
        self.defs.get(v.index()).map_or(&[], |d| d.as_slice())
    }

    pub fn is_registered(&self, v: Var) -> bool {
        !self.defs(v).is_empty()
    }

    /// Whether `v` has only the leaf placeholder.
    pub fn is_leaf(&self, v: Var) -> bool {
        matches!(self.defs(v), [n] if n.is_var())
    }

    /// Registers `v` as a leaf. Returns false if it was already known.
    pub fn add_var(&mut self, v: Var) -> bool {
        self.reserve(v);
        if !self.defs[v.index()].is_empty() {
            return false;
        }
        self.defs[v.index()].push(Node::leaf());
        true
    }

    /// Whether two definitions compute the same thing syntactically.
    pub fn eq(&self, a: &Node, b: &Node) -> bool {
        a.op == b.op && a.sign == b.sign && self.children(a) == self.children(b)
    }

    /// Stores `sign(head) ^ op(args)` as a definition of `head.var()`.
    ///
    /// Unknown children are registered as leaves. AND/XOR children are
    /// sorted. The caller is expected to have handled `BoolOp::Var`.
    pub fn add_node(&mut self, head: Lit, op: BoolOp, args: &[Lit]) -> Insertion {
        let v = head.var();
        self.reserve(v);
        for a in args {
            self.add_var(a.var());
        }
        let offset = self.arena.push(args);
        let node = Node::new(head.sign(), op, args.len() as u32, offset);
        if matches!(op, BoolOp::And | BoolOp::Xor) {
            self.arena.children_mut(&node).sort_unstable();
        }

        let defs = &self.defs[v.index()];
        if defs.is_empty() || node.is_const() || matches!(defs.as_slice(), [n] if n.is_var()) {
            let replaced = defs.len();
            self.defs[v.index()] = vec![node];
            return Insertion::Main { node, replaced };
        }
        match self.insert_aux(v, node) {
            Some(evicted) => Insertion::Aux { node, evicted },
            None => {
                self.arena.truncate_tail(args.len());
                Insertion::Rejected
            }
        }
    }

    /// Alternative insertion; `Some(evicted)` on success.
    fn insert_aux(&mut self, v: Var, node: Node) -> Option<Option<Node>> {
        let defs = &self.defs[v.index()];
        if defs.iter().any(|n| n.is_const() || self.eq(n, &node)) {
            return None;
        }
        if defs.len() < self.max_aux {
            self.defs[v.index()].push(node);
            return Some(None);
        }
        // Full: replace the widest definition if the new one is narrower.
        let (idx, worst) = defs
            .iter()
            .enumerate()
            .max_by(|(i, a), (j, b)| a.size.cmp(&b.size).then(j.cmp(i)))
            .map(|(i, n)| (i, *n))?;
        if node.size >= worst.size {
            return None;
        }
        log::debug!("insert_aux: {} replaces definition {} of {}", node.op, idx, v);
        self.defs[v.index()][idx] = node;
        Some(Some(worst))
    }

    /// Rewrites children of every definition through `to_root`.
    ///
    /// Returns the variables whose definitions changed.
    pub fn flatten(&mut self, to_root: &[Lit]) -> Vec<Var> {
        let mut changed = Vec::new();
        for (i, defs) in self.defs.iter().enumerate() {
            let mut any = false;
            for node in defs {
                let children = self.arena.children_mut(node);
                let mut touched = false;
                for lit in children.iter_mut() {
                    let root = to_root[lit.var().index()].xor_sign(lit.sign());
                    if root != *lit {
                        *lit = root;
                        touched = true;
                    }
                }
                if touched && matches!(node.op, BoolOp::And | BoolOp::Xor) {
                    children.sort_unstable();
                }
                any |= touched;
            }
            if any {
                changed.push(Var::new(i as u32));
            }
        }
        changed
    }

    /// Literals no longer referenced by any definition.
    pub fn garbage(&self) -> usize {
        let live: usize = self.defs.iter().flatten().map(|n| n.len()).sum();
        self.arena.len() - live
    }

    /// Reclaims arena space held by evicted or rejected definitions.
    pub fn compact(&mut self) {
        self.arena.compact(self.defs.iter_mut().flatten());
    }
}
