//! Equivalence discovery from shared cuts.
//!
//! Two variables owning the same cut, or complementary cuts over the same
//! support, compute the same function up to sign. Such pairs are proposed
//! as [`Candidate`]s, filtered by simulation, confirmed by a [`Validator`]
//! and finally merged through [`AigCuts::set_root`].

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::aig_cuts::AigCuts;
use crate::cut::Cut;
use crate::emit::{equiv2clauses, ClauseSink};
use crate::simulate::Signatures;
use crate::types::{Lit, Var};

/// A proposed equivalence `var == repr`, witnessed by `cut`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub var: Var,
    pub repr: Lit,
    /// The cut of `var` that `repr` shares (up to complement).
    pub cut: Cut,
}

/// Confirms candidate equivalences before they are merged.
pub trait Validator {
    fn validate(&mut self, aig: &AigCuts, candidate: &Candidate) -> bool;
}

impl<F> Validator for F
where
    F: FnMut(&AigCuts, &Candidate) -> bool,
{
    fn validate(&mut self, aig: &AigCuts, candidate: &Candidate) -> bool {
        self(aig, candidate)
    }
}

/// Cut with its table normalized to be false on row 0, plus whether it was
/// complemented to get there.
fn normalize(cut: &Cut) -> (Cut, bool) {
    if cut.eval_row(0) {
        (cut.negated(), true)
    } else {
        (*cut, false)
    }
}

impl AigCuts {
    /// Pairs of canonical variables sharing a cut, at most one per variable.
    ///
    /// The representative is the lowest variable owning the cut. Constant
    /// cuts are skipped. Pairs whose signatures differ are dropped.
    pub fn find_candidates(&self, sigs: &Signatures) -> Vec<Candidate> {
        let mut owners: HashMap<Cut, Lit> = HashMap::new();
        let mut proposed: HashSet<Var> = HashSet::new();
        let mut candidates = Vec::new();

        for (i, cs) in self.cuts.iter().enumerate() {
            let v = Var::new(i as u32);
            if !self.roots.is_root(v) || !self.store.is_registered(v) {
                continue;
            }
            for cut in cs {
                if cut.is_empty() {
                    continue;
                }
                let (key, phase) = normalize(cut);
                match owners.get(&key) {
                    Some(&owner) if owner.var() != v => {
                        let repr = owner.xor_sign(phase);
                        if proposed.contains(&v) || !sigs.may_equal(v.pos(), repr) {
                            continue;
                        }
                        debug!("find_candidates: {} == {} via {}", v, repr, cut);
                        proposed.insert(v);
                        candidates.push(Candidate { var: v, repr, cut: *cut });
                    }
                    Some(_) => {}
                    None => {
                        owners.insert(key, v.pos().xor_sign(phase));
                    }
                }
            }
        }
        candidates
    }

    /// Merges every candidate the validator accepts and emits the two
    /// binary clauses of each merge. Returns the number of merges.
    ///
    /// Candidates made redundant by earlier merges are skipped.
    pub fn apply_candidates(
        &mut self,
        candidates: &[Candidate],
        validator: &mut dyn Validator,
        sink: &mut dyn ClauseSink,
    ) -> usize {
        let mut merged = 0;
        for c in candidates {
            let a = self.roots.canonical_of(c.var.pos());
            let b = self.roots.canonical_of(c.repr);
            if a.var() == b.var() {
                continue;
            }
            if !validator.validate(self, c) {
                debug!("apply_candidates: rejected {} == {}", c.var, c.repr);
                continue;
            }
            self.set_root(c.var, c.repr);
            equiv2clauses(c.var.pos(), c.repr, |clause| sink.add_clause(clause));
            merged += 1;
        }
        info!("apply_candidates: {} of {} merged", merged, candidates.len());
        merged
    }
}
