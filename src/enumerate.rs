//! Cut enumeration.
//!
//! One pass walks the canonical variables children-first and augments the
//! cut-set of every variable whose definition or children were touched.
//! Each definition is composed from its children's cut-sets:
//!
//! - constant: the single constant cut
//! - 1 child: the child's cuts, complemented as needed
//! - 2 children: pairwise AND/XOR of the children's cuts over the joint support
//! - N children: the pairwise composition folded left to right
//! - ITE: `(i & t) | (!i & e)` over every compatible triple of cuts
//!
//! Candidates whose joint support exceeds [`MAX_CUT_SIZE`][crate::cut::MAX_CUT_SIZE]
//! are dropped during composition.

use log::{info, trace};

use crate::aig_cuts::AigCuts;
use crate::cut::Cut;
use crate::cutset::{CutInsert, CutSet, NoObserver};
use crate::node::{BoolOp, Node};
use crate::topo;
use crate::types::{Lit, Var};

impl AigCuts {
    /// Runs one enumeration pass and returns every cut-set.
    ///
    /// Pending roots are flushed first. Without intervening changes a
    /// repeated call leaves all cut-sets as they are.
    pub fn enumerate(&mut self) -> &[CutSet] {
        self.flush_roots();
        if self.store.garbage() > self.store.arena().len() / 2 {
            self.store.compact();
        }
        self.touched.begin_pass();
        let ids = self.filter_valid_nodes();
        let before = self.num_cuts;
        self.augment_all(&ids);
        info!(
            "enumerate: pass {} over {} vars, {} new cuts",
            self.touched.pass(),
            ids.len(),
            self.num_cuts - before
        );
        &self.cuts
    }

    /// Registered canonical variables, children first.
    fn filter_valid_nodes(&self) -> Vec<Var> {
        let roots = &self.roots;
        topo::postorder(&self.store, |v| roots.is_root(v))
    }

    fn augment_all(&mut self, ids: &[Var]) {
        let mut candidates = Vec::new();
        let mut scratch = Vec::new();
        for &v in ids {
            self.augment(v, &mut candidates, &mut scratch);
        }
    }

    fn is_touched_node(&self, v: Var, node: &Node) -> bool {
        self.touched.is_touched(v)
            || self
                .store
                .children(node)
                .iter()
                .any(|lit| self.touched.is_touched(lit.var()))
    }

    /// Offers the cuts of every definition of `v` to its cut-set in one
    /// sweep, narrowest first.
    ///
    /// In that order a cut accepted during the sweep is never removed later
    /// in the same sweep, and a rejected one stays rejected, so offering the
    /// same candidates again changes nothing.
    fn augment(&mut self, v: Var, candidates: &mut Vec<Cut>, scratch: &mut Vec<Cut>) {
        let defs = self.store.defs(v);
        if !defs.iter().any(|n| n.is_valid() && !n.is_var() && self.is_touched_node(v, n)) {
            return;
        }
        candidates.clear();
        for node in defs {
            if !node.is_valid() || node.is_var() {
                continue;
            }
            scratch.clear();
            self.compose(v, node, scratch);
            canonicalize(scratch);
            scratch.truncate(self.config.max_insertions);
            candidates.extend_from_slice(scratch);
        }
        canonicalize(candidates);

        let mut added = 0;
        for &cut in candidates.iter() {
            if self.insert_cut(v, cut) {
                added += 1;
            }
        }
        if added > 0 {
            self.touch(v);
        }
    }

    /// Candidate cuts of `v` derived from one definition.
    fn compose(&self, v: Var, node: &Node, out: &mut Vec<Cut>) {
        let children = self.store.children(node);
        match (node.op, node.len()) {
            (BoolOp::Ite, _) => compose_ite(&self.cuts, node, children, out),
            (_, 0) => out.push(Cut::constant(node.is_and() != node.sign)),
            (_, 1) => compose_unary(&self.cuts, node, children, out),
            (_, 2) => compose_binary(&self.cuts, node, children, out),
            _ => {
                let cap = if self.config.full {
                    usize::MAX
                } else {
                    self.max_cutset_size(v)
                };
                compose_nary(&self.cuts, v, node, children, cap, out)
            }
        }
    }

    /// Offers a cut to `v`'s set. Returns whether it was added.
    fn insert_cut(&mut self, v: Var, cut: Cut) -> bool {
        let max = self.max_cutset_size(v);
        match self.cuts[v.index()].insert(v, cut, max, &mut *self.observer) {
            CutInsert::Added => {
                trace!("insert_cut: {} <- {}", v, cut);
                self.num_cuts += 1;
                true
            }
            CutInsert::Subsumed | CutInsert::Full => false,
        }
    }
}

/// Sorts by width, then support, then table, and drops duplicates.
fn canonicalize(cuts: &mut Vec<Cut>) {
    cuts.sort_unstable_by(|a, b| {
        a.len()
            .cmp(&b.len())
            .then_with(|| a.support().cmp(b.support()))
            .then_with(|| a.table().cmp(&b.table()))
    });
    cuts.dedup();
}

/// Table of `cut` over `joint`, complemented if `lit` is negative.
fn literal_table(cut: &Cut, joint: &Cut, lit: Lit) -> u64 {
    let t = cut.shift_table(joint);
    if lit.sign() {
        !t
    } else {
        t
    }
}

fn compose_unary(cuts: &[CutSet], node: &Node, children: &[Lit], out: &mut Vec<Cut>) {
    let lit = children[0];
    for a in &cuts[lit.var().index()] {
        let mut c = *a;
        if lit.sign() != node.sign {
            c.negate();
        }
        out.push(c);
    }
}

fn compose_binary(cuts: &[CutSet], node: &Node, children: &[Lit], out: &mut Vec<Cut>) {
    let (l1, l2) = (children[0], children[1]);
    for a in &cuts[l1.var().index()] {
        for b in &cuts[l2.var().index()] {
            let Some(mut c) = Cut::merge(a, b) else {
                continue;
            };
            let t1 = literal_table(a, &c, l1);
            let t2 = literal_table(b, &c, l2);
            c.set_table(if node.is_and() { t1 & t2 } else { t1 ^ t2 });
            if node.sign {
                c.negate();
            }
            out.push(c);
        }
    }
}

fn compose_ite(cuts: &[CutSet], node: &Node, children: &[Lit], out: &mut Vec<Cut>) {
    let (l1, l2, l3) = (children[0], children[1], children[2]);
    for a in &cuts[l1.var().index()] {
        for b in &cuts[l2.var().index()] {
            let Some(ab) = Cut::merge(a, b) else {
                continue;
            };
            for e in &cuts[l3.var().index()] {
                let Some(mut abe) = Cut::merge(&ab, e) else {
                    continue;
                };
                let t1 = literal_table(a, &abe, l1);
                let t2 = literal_table(b, &abe, l2);
                let t3 = literal_table(e, &abe, l3);
                abe.set_table((t1 & t2) | (!t1 & t3));
                if node.sign {
                    abe.negate();
                }
                out.push(abe);
            }
        }
    }
}

/// Folds the children left to right, keeping at most `cap` partial cuts
/// per step.
fn compose_nary(
    cuts: &[CutSet],
    v: Var,
    node: &Node,
    children: &[Lit],
    cap: usize,
    out: &mut Vec<Cut>,
) {
    let first = children[0];
    let mut acc = CutSet::new();
    for a in &cuts[first.var().index()] {
        let mut c = *a;
        if first.sign() {
            c.negate();
        }
        acc.insert(v, c, cap, &mut NoObserver);
    }
    for &lit in &children[1..] {
        let mut next = CutSet::new();
        for a in &acc {
            for b in &cuts[lit.var().index()] {
                let Some(mut c) = Cut::merge(a, b) else {
                    continue;
                };
                let t1 = a.shift_table(&c);
                let t2 = literal_table(b, &c, lit);
                c.set_table(if node.is_and() { t1 & t2 } else { t1 ^ t2 });
                next.insert(v, c, cap, &mut NoObserver);
            }
        }
        if next.is_empty() {
            return;
        }
        acc = next;
    }
    for c in &acc {
        out.push(if node.sign { c.negated() } else { *c });
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::config::Config;

    fn x(i: u32) -> Var {
        Var::new(i)
    }

    fn has(aig: &AigCuts, v: Var, support: &[u32], table: u64) -> bool {
        let vars: Vec<Var> = support.iter().map(|&i| x(i)).collect();
        let want = Cut::new(&vars, table);
        aig.cut_set(v).unwrap().contains(&want)
    }

    #[test]
    fn test_and2() {
        let mut aig = AigCuts::default();
        aig.add_node(x(2).pos(), BoolOp::And, &[x(0).pos(), x(1).pos()]);
        aig.enumerate();
        assert!(has(&aig, x(2), &[0, 1], 0b1000));
        assert!(aig.cut_set(x(2)).unwrap()[0].is_unit_of(x(2)));
    }

    #[test]
    fn test_nand_with_negated_input() {
        // x2 = !(x0 & !x1)
        let mut aig = AigCuts::default();
        aig.add_node(x(2).neg(), BoolOp::And, &[x(0).pos(), x(1).neg()]);
        aig.enumerate();
        // x0 & !x1 is row (1,0) = 0b0010; complemented: 0b1101.
        assert!(has(&aig, x(2), &[0, 1], 0b1101));
    }

    #[test]
    fn test_xor2() {
        let mut aig = AigCuts::default();
        aig.add_node(x(2).pos(), BoolOp::Xor, &[x(0).pos(), x(1).pos()]);
        aig.enumerate();
        assert!(has(&aig, x(2), &[0, 1], 0b0110));
    }

    #[test]
    fn test_unary_propagates_sign() {
        let mut aig = AigCuts::default();
        aig.add_node(x(1).pos(), BoolOp::And, &[x(0).neg()]);
        aig.enumerate();
        assert!(has(&aig, x(1), &[0], 0b01));
    }

    #[test]
    fn test_ite() {
        let mut aig = AigCuts::default();
        aig.add_node(x(3).pos(), BoolOp::Ite, &[x(0).pos(), x(1).pos(), x(2).pos()]);
        aig.enumerate();
        // rows (x0, x1, x2): x0 ? x1 : x2
        let mut table = 0u64;
        for row in 0..8 {
            let (i, t, e) = (row & 1 != 0, row & 2 != 0, row & 4 != 0);
            if if i { t } else { e } {
                table |= 1 << row;
            }
        }
        assert_eq!(table, 0xd8);
        assert!(has(&aig, x(3), &[0, 1, 2], table));
    }

    #[test]
    fn test_nary_and() {
        for full in [false, true] {
            let mut aig = AigCuts::new(Config::default().with_full(full));
            aig.add_node(
                x(4).pos(),
                BoolOp::And,
                &[x(0).pos(), x(1).pos(), x(2).pos(), x(3).pos()],
            );
            aig.enumerate();
            assert!(has(&aig, x(4), &[0, 1, 2, 3], 1 << 15));
        }
    }

    #[test]
    fn test_nary_xor_negated() {
        let mut aig = AigCuts::default();
        aig.add_node(x(3).neg(), BoolOp::Xor, &[x(0).pos(), x(1).pos(), x(2).pos()]);
        aig.enumerate();
        // odd parity rows 1, 2, 4, 7 = 0x96; complemented: 0x69
        assert!(has(&aig, x(3), &[0, 1, 2], 0x69));
    }

    #[test]
    fn test_too_wide_yields_nothing() {
        let mut aig = AigCuts::default();
        let args: Vec<Lit> = (0..7).map(|i| x(i).pos()).collect();
        aig.add_node(x(7).pos(), BoolOp::And, &args);
        aig.enumerate();
        assert_eq!(aig.cut_set(x(7)).unwrap().len(), 1);
    }

    #[test]
    fn test_constant_child() {
        // x1 = false: x2 = x0 & x1 is false over {x0}, and x3 = x1 is
        // the constant itself.
        let mut aig = AigCuts::default();
        aig.add_node(x(1).neg(), BoolOp::And, &[]);
        aig.add_node(x(2).pos(), BoolOp::And, &[x(0).pos(), x(1).pos()]);
        aig.add_node(x(3).pos(), BoolOp::And, &[x(1).pos()]);
        aig.enumerate();
        assert!(has(&aig, x(2), &[0], 0));
        assert!(!has(&aig, x(2), &[0, 1], 0b1000));
        assert!(aig.cut_set(x(3)).unwrap().contains(&Cut::constant(false)));
    }

    #[test]
    fn test_insertion_budget() {
        let mut aig = AigCuts::new(Config::default().with_max_insertions(1));
        aig.add_node(x(2).pos(), BoolOp::And, &[x(0).pos(), x(1).pos()]);
        aig.add_node(x(4).pos(), BoolOp::And, &[x(2).pos(), x(3).pos()]);
        aig.enumerate();
        // Budget 1: of {x2, x3} and {x0, x1, x3} only the narrower is offered.
        let cs = aig.cut_set(x(4)).unwrap();
        assert_eq!(cs.len(), 2);
        assert!(has(&aig, x(4), &[2, 3], 0b1000));
        // Later passes offer the same candidates again.
        aig.enumerate();
        aig.enumerate();
        assert_eq!(aig.cut_set(x(4)).unwrap().len(), 2);
    }

    #[test]
    fn test_canonicalize() {
        let wide = Cut::new(&[x(0), x(1), x(2)], 0x80);
        let narrow = Cut::new(&[x(1), x(2)], 0b1000);
        let other = Cut::new(&[x(0), x(3)], 0b0110);
        let mut cuts = vec![wide, narrow, other, narrow, Cut::constant(true)];
        canonicalize(&mut cuts);
        assert_eq!(cuts, vec![Cut::constant(true), other, narrow, wide]);
    }

    #[test]
    fn test_rejected_candidate_stays_rejected() {
        // x6 = x4 & x5 with x4 = x0 & x1 and x5 = x2 & x3. Only three cuts
        // fit, so {x0, x1, x5} and {x2, x3, x4} compete for the last slot.
        let mut aig = AigCuts::new(Config::default().with_max_cutset_size(3));
        aig.add_node(x(4).pos(), BoolOp::And, &[x(0).pos(), x(1).pos()]);
        aig.add_node(x(5).pos(), BoolOp::And, &[x(2).pos(), x(3).pos()]);
        aig.add_node(x(6).pos(), BoolOp::And, &[x(4).pos(), x(5).pos()]);
        aig.enumerate();
        let first = aig.cuts().to_vec();
        aig.enumerate();
        assert_eq!(aig.cuts(), first.as_slice());
        assert!(has(&aig, x(6), &[4, 5], 0b1000));
        assert!(has(&aig, x(6), &[0, 1, 5], 0x80));
        assert!(!has(&aig, x(6), &[2, 3, 4], 0x80));
    }

    #[test]
    fn test_cycle_does_not_feed_itself() {
        let mut aig = AigCuts::default();
        aig.add_node(x(1).pos(), BoolOp::And, &[x(2).pos(), x(0).pos()]);
        aig.add_node(x(2).pos(), BoolOp::And, &[x(1).pos(), x(3).pos()]);
        for _ in 0..4 {
            aig.enumerate();
        }
        for v in [x(1), x(2)] {
            assert!(aig.cut_set(v).unwrap().iter().skip(1).all(|c| !c.contains(v)));
        }
    }

    #[test]
    fn test_cap_respected() {
        let mut aig = AigCuts::new(Config::default().with_max_cutset_size(3));
        aig.add_node(x(2).pos(), BoolOp::And, &[x(0).pos(), x(1).pos()]);
        aig.add_node(x(5).pos(), BoolOp::And, &[x(3).pos(), x(4).pos()]);
        aig.add_node(x(6).pos(), BoolOp::Xor, &[x(2).pos(), x(5).pos()]);
        for _ in 0..3 {
            aig.enumerate();
        }
        for cs in aig.cuts() {
            assert!(cs.len() <= 3);
        }
    }
}
