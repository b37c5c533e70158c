//! Bit-parallel random simulation.
//!
//! Every variable gets a 64-bit word per simulation round: leaves draw
//! random words, defined variables evaluate their definition over the
//! children's words. Two literals with different signatures are certainly
//! not equivalent; equal signatures make them candidates.

use log::debug;
use rand::Rng;

use crate::aig_cuts::AigCuts;
use crate::cut::Cut;
use crate::node::{BoolOp, Node};
use crate::topo;
use crate::types::{Lit, Var};

/// Simulation values of every variable over a number of rounds.
#[derive(Debug, Clone)]
pub struct Signatures {
    /// `words[w][v]`: the `w`-th block of 64 samples of `v`.
    words: Vec<Vec<u64>>,
    rounds: usize,
}

impl Signatures {
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Block `w` of all variables, indexed by variable.
    pub fn word(&self, w: usize) -> &[u64] {
        &self.words[w]
    }

    /// Block `w` of `lit`.
    pub fn value(&self, lit: Lit, w: usize) -> u64 {
        let x = self.words[w].get(lit.var().index()).copied().unwrap_or(0);
        if lit.sign() {
            !x
        } else {
            x
        }
    }

    /// Valid sample bits of block `w`.
    fn mask(&self, w: usize) -> u64 {
        let tail = self.rounds % 64;
        if w + 1 == self.words.len() && tail != 0 {
            (1u64 << tail) - 1
        } else {
            u64::MAX
        }
    }

    /// Whether `a` and `b` agree on every sample.
    pub fn may_equal(&self, a: Lit, b: Lit) -> bool {
        (0..self.words.len()).all(|w| (self.value(a, w) ^ self.value(b, w)) & self.mask(w) == 0)
    }

    /// Whether `v` agrees with the function of `cut` on every sample.
    pub fn matches_cut(&self, v: Var, cut: &Cut) -> bool {
        (0..self.words.len()).all(|w| {
            let words = &self.words[w];
            (cut.eval(words) ^ self.value(v.pos(), w)) & self.mask(w) == 0
        })
    }
}

impl AigCuts {
    /// Evaluates a definition bit-parallel, given the words of its children.
    pub fn eval(&self, node: &Node, value: impl Fn(Lit) -> u64) -> u64 {
        let children = self.store.children(node);
        let r = match node.op {
            BoolOp::And => children.iter().fold(u64::MAX, |acc, &c| acc & value(c)),
            BoolOp::Xor => children.iter().fold(0, |acc, &c| acc ^ value(c)),
            BoolOp::Ite => {
                let (c, t, e) = (value(children[0]), value(children[1]), value(children[2]));
                (c & t) | (!c & e)
            }
            BoolOp::Var | BoolOp::Invalid => 0,
        };
        if node.sign {
            !r
        } else {
            r
        }
    }

    /// One simulation round: 64 samples of every variable.
    ///
    /// Variables are evaluated children first through the first definition
    /// whose children are already known. Leaves, and variables whose every
    /// definition goes through a cycle, get random words. Retired variables
    /// copy the word of their canonical literal.
    pub fn simulate_word(&mut self) -> Vec<u64> {
        let n = self.store.len();
        let mut words = vec![0u64; n];
        let mut done = vec![false; n];

        let roots = &self.roots;
        let order = topo::postorder(&self.store, |v| roots.is_root(v));
        for v in order {
            let value = |lit: Lit| {
                let c = self.roots.canonical_of(lit);
                let x = words[c.var().index()];
                if c.sign() {
                    !x
                } else {
                    x
                }
            };
            let ready = |node: &&Node| {
                !node.is_var()
                    && self
                        .store
                        .children(node)
                        .iter()
                        .all(|&c| done[self.roots.canonical_of(c).var().index()])
            };
            let word = match self.store.defs(v).iter().find(ready) {
                Some(node) => self.eval(node, value),
                None => self.rng.random(),
            };
            words[v.index()] = word;
            done[v.index()] = true;
        }

        for i in 0..n {
            let v = Var::new(i as u32);
            if done[i] {
                continue;
            }
            let root = self.roots.canonical_of(v.pos());
            words[i] = if root.var() != v && done[root.var().index()] {
                let x = words[root.var().index()];
                if root.sign() {
                    !x
                } else {
                    x
                }
            } else {
                self.rng.random()
            };
        }
        words
    }

    /// Simulates `rounds` samples of every variable.
    pub fn simulate(&mut self, rounds: usize) -> Signatures {
        let num_words = rounds.div_ceil(64);
        let words: Vec<Vec<u64>> = (0..num_words).map(|_| self.simulate_word()).collect();
        debug!(
            "simulate: {} rounds over {} vars",
            rounds,
            words.first().map_or(0, |w| w.len())
        );
        Signatures { words, rounds }
    }
}
