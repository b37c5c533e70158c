//! Canonical representatives of merged variables.
//!
//! A union-find over literals: every variable maps to a literal, identity
//! for representatives. Only representatives are ever re-pointed, so chains
//! are acyclic and merging is monotone.

use crate::types::{Lit, Var};

#[derive(Debug, Default, Clone)]
pub struct RootMap {
    parent: Vec<Lit>,
    /// Variables re-pointed since the last flush.
    pending: Vec<Var>,
}

impl RootMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, n: usize) {
        while self.parent.len() < n {
            let v = Var::new(self.parent.len() as u32);
            self.parent.push(v.pos());
        }
    }

    /// Canonical literal of `lit`, composing signs along the chain.
    pub fn canonical_of(&self, lit: Lit) -> Lit {
        let mut cur = lit;
        loop {
            let Some(&p) = self.parent.get(cur.var().index()) else {
                return cur;
            };
            if p.var() == cur.var() {
                return cur;
            }
            cur = p.xor_sign(cur.sign());
        }
    }

    pub fn is_root(&self, v: Var) -> bool {
        self.canonical_of(v.pos()) == v.pos()
    }

    /// Records `v == r`. Returns false if nothing changed.
    ///
    /// Idempotent. A request contradicting the current classes (`v` already
    /// equal to `~r`) is ignored.
    pub fn set_root(&mut self, v: Var, r: Lit) -> bool {
        self.reserve(v.index().max(r.var().index()) + 1);
        let cv = self.canonical_of(v.pos());
        let cr = self.canonical_of(r);
        if cv.var() == cr.var() {
            if cv != cr {
                log::debug!("set_root: ignoring contradictory {} == {}", v, r);
            }
            return false;
        }
        // cv is `v` up to sign; point its variable at cr with that sign.
        self.parent[cv.var().index()] = cr.xor_sign(cv.sign());
        self.pending.push(cv.var());
        true
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Fully resolved map for `n` variables.
    pub fn to_root(&self, n: usize) -> Vec<Lit> {
        (0..n as u32)
            .map(|i| self.canonical_of(Var::new(i).pos()))
            .collect()
    }
}
