//! Applying recorded equivalences.
//!
//! [`AigCuts::set_root`] only records a merge. Flushing rewrites every
//! definition child and every cut input to its canonical literal, so the
//! retired variable disappears from the graph and from all supports.

use log::debug;

use crate::aig_cuts::AigCuts;
use crate::cut::Cut;
use crate::types::{Lit, Var};

impl AigCuts {
    /// Rewrites definitions and cut-sets through the pending roots.
    ///
    /// Does nothing when no merge happened since the last flush. Variables
    /// whose definitions or cuts change are touched.
    pub fn flush_roots(&mut self) {
        if !self.roots.has_pending() {
            return;
        }
        let to_root = self.roots.to_root(self.store.len());

        let changed = self.store.flatten(&to_root);
        for &v in &changed {
            self.touch(v);
        }

        let mut rewritten = 0;
        for i in 0..self.cuts.len() {
            let v = Var::new(i as u32);
            if !self.cuts[i].iter().any(|c| is_stale(c, &to_root)) {
                continue;
            }
            self.rewrite_cut_set(v, &to_root);
            self.touch(v);
            rewritten += 1;
        }

        debug!(
            "flush_roots: {} definitions and {} cut-sets rewritten",
            changed.len(),
            rewritten
        );
        self.roots.clear_pending();
    }

    fn rewrite_cut_set(&mut self, v: Var, to_root: &[Lit]) {
        let old: Vec<Cut> = self.cuts[v.index()].iter().copied().collect();
        let max = self.max_cutset_size(v);
        let cs = &mut self.cuts[v.index()];
        cs.reset(v, &mut *self.observer);
        for (k, cut) in old.iter().enumerate() {
            let cut = cut.substitute(|u| to_root[u.index()]);
            if k == 0 {
                // The unit cut, or its image for a retired variable.
                cs.push_back(v, cut, &mut *self.observer);
            } else {
                cs.insert(v, cut, max, &mut *self.observer);
            }
        }
    }
}

fn is_stale(cut: &Cut, to_root: &[Lit]) -> bool {
    cut.support()
        .iter()
        .any(|u| to_root.get(u.index()).is_some_and(|&r| r != u.pos()))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::node::BoolOp;

    fn x(i: u32) -> Var {
        Var::new(i)
    }

    #[test]
    fn test_nothing_pending() {
        let mut aig = AigCuts::default();
        aig.add_node(x(2).pos(), BoolOp::And, &[x(0).pos(), x(1).pos()]);
        aig.enumerate();
        let before = aig.cuts().to_vec();
        aig.flush_roots();
        assert_eq!(aig.cuts(), before.as_slice());
    }

    #[test]
    fn test_children_and_cuts_rewritten() {
        let mut aig = AigCuts::default();
        // x3 = x1 & x2
        aig.add_node(x(3).pos(), BoolOp::And, &[x(1).pos(), x(2).pos()]);
        aig.enumerate();
        aig.set_root(x(2), x(0).neg());
        aig.flush_roots();

        let node = aig.store().defs(x(3))[0];
        assert_eq!(aig.store().children(&node), &[x(0).neg(), x(1).pos()]);
        // {x1, x2}:AND became {x0, x1}: !x0 & x1.
        let want = Cut::new(&[x(0), x(1)], 0b0100);
        assert!(aig.cut_set(x(3)).unwrap().contains(&want));
        // The retired variable's unit cut now names its root.
        let retired = aig.cut_set(x(2)).unwrap();
        assert_eq!(retired[0], Cut::new(&[x(0)], 0b01));
        assert!(aig.is_touched(x(3)));
    }

    #[test]
    fn test_self_reference_dropped() {
        // x2 = x0 & x1; merging x1 into x2 would make {x0, x2} a cut of x2.
        let mut aig = AigCuts::default();
        aig.add_node(x(2).pos(), BoolOp::And, &[x(0).pos(), x(1).pos()]);
        aig.enumerate();
        aig.set_root(x(1), x(2).pos());
        aig.flush_roots();
        let cs = aig.cut_set(x(2)).unwrap();
        assert!(cs[0].is_unit_of(x(2)));
        assert!(cs.iter().skip(1).all(|c| !c.contains(x(2))));
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut aig = AigCuts::default();
        aig.add_node(x(3).pos(), BoolOp::Xor, &[x(1).pos(), x(2).pos()]);
        aig.set_root(x(2), x(0).pos());
        aig.flush_roots();
        let cuts = aig.cuts().to_vec();
        let node = aig.store().defs(x(3))[0];
        let children = aig.store().children(&node).to_vec();
        aig.set_root(x(2), x(0).pos());
        aig.flush_roots();
        assert_eq!(aig.cuts(), cuts.as_slice());
        assert_eq!(aig.store().children(&aig.store().defs(x(3))[0]), children.as_slice());
    }
}
