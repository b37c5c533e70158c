//! Translation of definitions and cuts into clauses.
//!
//! Clauses leave the engine only through a [`ClauseSink`]: one method for
//! clauses to add and one for clauses being retracted. [`ClauseLog`] is a
//! sink that simply queues them for the caller to drain.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::aig_cuts::AigCuts;
use crate::cut::Cut;
use crate::node::{BoolOp, Node};
use crate::types::{Lit, Var};

/// Largest XOR expanded into clauses (`2^n` clauses).
pub const MAX_XOR_CLAUSE_ARITY: usize = 10;

/// Receiver of emitted clauses.
pub trait ClauseSink {
    fn add_clause(&mut self, clause: &[Lit]);
    fn del_clause(&mut self, clause: &[Lit]);
}

impl<T: ClauseSink + ?Sized> ClauseSink for Rc<RefCell<T>> {
    fn add_clause(&mut self, clause: &[Lit]) {
        self.borrow_mut().add_clause(clause)
    }
    fn del_clause(&mut self, clause: &[Lit]) {
        self.borrow_mut().del_clause(clause)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseEvent {
    Add(Vec<Lit>),
    Del(Vec<Lit>),
}

/// Queue of emitted clauses.
#[derive(Debug, Default, Clone)]
pub struct ClauseLog {
    events: Vec<ClauseEvent>,
}

impl ClauseLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ClauseEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, ClauseEvent> {
        self.events.drain(..)
    }

    /// Clauses added so far, in emission order.
    pub fn added(&self) -> impl Iterator<Item = &[Lit]> {
        self.events.iter().filter_map(|e| match e {
            ClauseEvent::Add(c) => Some(c.as_slice()),
            ClauseEvent::Del(_) => None,
        })
    }

    pub fn deleted(&self) -> impl Iterator<Item = &[Lit]> {
        self.events.iter().filter_map(|e| match e {
            ClauseEvent::Del(c) => Some(c.as_slice()),
            ClauseEvent::Add(_) => None,
        })
    }
}

impl ClauseSink for ClauseLog {
    fn add_clause(&mut self, clause: &[Lit]) {
        self.events.push(ClauseEvent::Add(clause.to_vec()));
    }
    fn del_clause(&mut self, clause: &[Lit]) {
        self.events.push(ClauseEvent::Del(clause.to_vec()));
    }
}

/// Clauses for `r == table(support)`: one clause per table row, blocking
/// the row's assignment unless `r` takes the row's value.
pub fn cut2def(cut: &Cut, r: Lit, mut on_clause: impl FnMut(&[Lit])) {
    let mut clause = Vec::with_capacity(cut.len() + 1);
    for row in 0..(1usize << cut.len()) {
        clause.clear();
        for (j, v) in cut.support().iter().enumerate() {
            clause.push(Lit::new(*v, (row >> j) & 1 != 0));
        }
        clause.push(if cut.eval_row(row) { r } else { !r });
        on_clause(&clause);
    }
}

/// Tseitin clauses for `r == node(children)`.
pub fn node2def(node: &Node, children: &[Lit], r: Lit, mut on_clause: impl FnMut(&[Lit])) {
    let r = r.xor_sign(node.sign);
    match node.op {
        BoolOp::Var | BoolOp::Invalid => {}
        BoolOp::And => {
            // r -> each child
            for &c in children {
                on_clause(&[!r, c]);
            }
            // all children -> r
            let mut clause: Vec<Lit> = children.iter().map(|&c| !c).collect();
            clause.push(r);
            on_clause(&clause);
        }
        BoolOp::Ite => {
            assert_eq!(children.len(), 3, "ITE takes exactly 3 children");
            let (c, t, e) = (children[0], children[1], children[2]);
            on_clause(&[!r, !c, t]);
            on_clause(&[!r, c, e]);
            on_clause(&[r, !c, !t]);
            on_clause(&[r, c, !e]);
        }
        BoolOp::Xor => {
            if children.len() > MAX_XOR_CLAUSE_ARITY {
                log::debug!("node2def: skipping {}-ary xor", children.len());
                return;
            }
            let mut clause = Vec::with_capacity(children.len() + 1);
            for row in 0..(1usize << children.len()) {
                clause.clear();
                let mut parity = false;
                for (j, &c) in children.iter().enumerate() {
                    let value = (row >> j) & 1 != 0;
                    parity ^= value;
                    clause.push(if value { !c } else { c });
                }
                clause.push(if parity { r } else { !r });
                on_clause(&clause);
            }
        }
    }
}

/// The two binary clauses of `a == b`.
pub fn equiv2clauses(a: Lit, b: Lit, mut on_clause: impl FnMut(&[Lit])) {
    on_clause(&[!a, b]);
    on_clause(&[a, !b]);
}

impl AigCuts {
    /// Emits `r == cut` as added clauses.
    pub fn cut2def(&self, sink: &mut dyn ClauseSink, cut: &Cut, r: Lit) {
        log::debug!("cut2def: {} == {}", r, cut);
        cut2def(cut, r, |c| sink.add_clause(c));
    }

    /// Emits `r == node` as added clauses.
    pub fn node2def(&self, sink: &mut dyn ClauseSink, node: &Node, r: Lit) {
        node2def(node, self.store().children(node), r, |c| sink.add_clause(c));
    }

    /// Emits the definitions of every variable between `v` and the support
    /// of `cut`, followed by `v == cut`.
    pub fn cut2clauses(&self, sink: &mut dyn ClauseSink, v: Var, cut: &Cut) {
        let mut visited: HashSet<Var> = cut.support().iter().copied().collect();
        let mut todo = vec![v];
        while let Some(u) = todo.pop() {
            if !visited.insert(u) {
                continue;
            }
            for node in self.store().defs(u) {
                self.node2def(sink, node, u.pos());
                todo.extend(self.store().children(node).iter().map(|l| l.var()));
            }
        }
        self.cut2def(sink, cut, v.pos());
    }
}
