//! Bounded per-variable collections of cuts.
//!
//! Every mutation reports the cuts it adds or removes to a [`CutObserver`],
//! so external bookkeeping (a validator caching per-cut state, statistics)
//! can mirror the sets without diffing them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cut::Cut;
use crate::types::Var;

/// Receives cut-set change notifications.
pub trait CutObserver {
    fn on_cut_add(&mut self, _v: Var, _cut: &Cut) {}
    fn on_cut_del(&mut self, _v: Var, _cut: &Cut) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoObserver;

impl CutObserver for NoObserver {}

impl<T: CutObserver + ?Sized> CutObserver for Rc<RefCell<T>> {
    fn on_cut_add(&mut self, v: Var, cut: &Cut) {
        self.borrow_mut().on_cut_add(v, cut)
    }
    fn on_cut_del(&mut self, v: Var, cut: &Cut) {
        self.borrow_mut().on_cut_del(v, cut)
    }
}

/// Outcome of [`CutSet::insert`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CutInsert {
    /// The cut was added.
    Added,
    /// An existing cut is identical to or subsumes the candidate.
    Subsumed,
    /// The set is full and the candidate is no better than its worst cut.
    Full,
}

/// The cuts of one variable, in insertion order.
///
/// The unit cut of the owner is never evicted by [`CutSet::insert`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CutSet {
    cuts: Vec<Cut>,
}

impl CutSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cut> {
        self.cuts.iter()
    }

    pub fn as_slice(&self) -> &[Cut] {
        &self.cuts
    }

    pub fn contains(&self, cut: &Cut) -> bool {
        self.cuts.contains(cut)
    }

    /// Appends without any subsumption or capacity check.
    pub fn push_back(&mut self, v: Var, cut: Cut, obs: &mut dyn CutObserver) {
        obs.on_cut_add(v, &cut);
        self.cuts.push(cut);
    }

    pub fn evict(&mut self, v: Var, idx: usize, obs: &mut dyn CutObserver) {
        let cut = self.cuts.remove(idx);
        obs.on_cut_del(v, &cut);
    }

    pub fn shrink(&mut self, v: Var, len: usize, obs: &mut dyn CutObserver) {
        while self.cuts.len() > len {
            if let Some(cut) = self.cuts.pop() {
                obs.on_cut_del(v, &cut);
            }
        }
    }

    pub fn reset(&mut self, v: Var, obs: &mut dyn CutObserver) {
        self.shrink(v, 0, obs);
    }

    /// Resets the set to hold only the unit cut of `v`.
    pub fn init(&mut self, v: Var, obs: &mut dyn CutObserver) {
        self.reset(v, obs);
        self.push_back(v, Cut::unit(v), obs);
    }

    /// Offers `cut` to the set of variable `v`, keeping at most `max` cuts.
    ///
    /// The candidate is rejected if some cut's support is a subset of its
    /// support. Otherwise every cut whose support is a superset of the
    /// candidate's is removed. If the set is still full, the candidate must
    /// be strictly narrower than the widest cut, and the oldest among the
    /// widest is evicted to make room.
    pub fn insert(&mut self, v: Var, cut: Cut, max: usize, obs: &mut dyn CutObserver) -> CutInsert {
        if self.cuts.iter().any(|c| c.subset_of(&cut)) {
            return CutInsert::Subsumed;
        }
        let mut i = 0;
        while i < self.cuts.len() {
            if cut.subset_of(&self.cuts[i]) && !self.cuts[i].is_unit_of(v) {
                self.evict(v, i, obs);
            } else {
                i += 1;
            }
        }
        if self.cuts.len() >= max {
            let worst = self
                .cuts
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.is_unit_of(v))
                .max_by(|(i, a), (j, b)| a.len().cmp(&b.len()).then(j.cmp(i)))
                .map(|(i, c)| (i, c.len()));
            match worst {
                Some((idx, len)) if len > cut.len() => {
                    log::trace!("evict {} from {}", self.cuts[idx], v);
                    self.evict(v, idx, obs);
                }
                _ => return CutInsert::Full,
            }
            if self.cuts.len() >= max {
                return CutInsert::Full;
            }
        }
        self.push_back(v, cut, obs);
        CutInsert::Added
    }
}

impl<'a> IntoIterator for &'a CutSet {
    type Item = &'a Cut;
    type IntoIter = std::slice::Iter<'a, Cut>;

    fn into_iter(self) -> Self::IntoIter {
        self.cuts.iter()
    }
}

impl std::ops::Index<usize> for CutSet {
    type Output = Cut;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cuts[index]
    }
}

impl fmt::Debug for CutSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.cuts.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        added: usize,
        deleted: usize,
    }

    impl CutObserver for Counter {
        fn on_cut_add(&mut self, _v: Var, _cut: &Cut) {
            self.added += 1;
        }
        fn on_cut_del(&mut self, _v: Var, _cut: &Cut) {
            self.deleted += 1;
        }
    }

    fn cut(ids: &[u32], table: u64) -> Cut {
        let vars: Vec<Var> = ids.iter().map(|&i| Var::new(i)).collect();
        Cut::new(&vars, table)
    }

    #[test]
    fn test_init_holds_unit() {
        let v = Var::new(5);
        let mut cs = CutSet::new();
        cs.init(v, &mut NoObserver);
        assert_eq!(cs.len(), 1);
        assert!(cs[0].is_unit_of(v));
    }

    #[test]
    fn test_insert_rejects_duplicate_and_subsumed() {
        let v = Var::new(9);
        let mut cs = CutSet::new();
        cs.init(v, &mut NoObserver);
        assert_eq!(cs.insert(v, cut(&[1, 2], 0b1000), 10, &mut NoObserver), CutInsert::Added);
        assert_eq!(cs.insert(v, cut(&[1, 2], 0b1000), 10, &mut NoObserver), CutInsert::Subsumed);
        assert_eq!(cs.insert(v, cut(&[1, 2, 3], 0x80), 10, &mut NoObserver), CutInsert::Subsumed);
        assert_eq!(cs.len(), 2);
    }

    #[test]
    fn test_insert_removes_supersets() {
        let v = Var::new(9);
        let mut obs = Counter::default();
        let mut cs = CutSet::new();
        cs.init(v, &mut obs);
        cs.insert(v, cut(&[1, 2, 3], 0x80), 10, &mut obs);
        cs.insert(v, cut(&[1, 2, 4], 0x80), 10, &mut obs);
        assert_eq!(cs.insert(v, cut(&[1, 2], 0b1000), 10, &mut obs), CutInsert::Added);
        assert_eq!(cs.len(), 2);
        assert_eq!(obs.added, 4);
        assert_eq!(obs.deleted, 2);
    }

    #[test]
    fn test_constant_keeps_unit() {
        let v = Var::new(9);
        let mut cs = CutSet::new();
        cs.init(v, &mut NoObserver);
        cs.insert(v, cut(&[1, 2], 0b1000), 10, &mut NoObserver);
        cs.insert(v, Cut::constant(false), 10, &mut NoObserver);
        assert_eq!(cs.len(), 2);
        assert!(cs[0].is_unit_of(v));
        assert_eq!(cs[1], Cut::constant(false));
    }

    #[test]
    fn test_capacity_evicts_oldest_widest() {
        let v = Var::new(9);
        let mut cs = CutSet::new();
        cs.init(v, &mut NoObserver);
        cs.insert(v, cut(&[1, 2, 3], 0x80), 3, &mut NoObserver);
        cs.insert(v, cut(&[4, 5, 6], 0x80), 3, &mut NoObserver);
        assert_eq!(cs.len(), 3);
        // Same width as the widest: rejected.
        assert_eq!(cs.insert(v, cut(&[1, 5, 7], 0x80), 3, &mut NoObserver), CutInsert::Full);
        // Narrower: the older of the two 3-cuts goes.
        assert_eq!(cs.insert(v, cut(&[7, 8], 0b1000), 3, &mut NoObserver), CutInsert::Added);
        assert_eq!(cs.len(), 3);
        assert!(cs[0].is_unit_of(v));
        assert_eq!(cs[1], cut(&[4, 5, 6], 0x80));
        assert_eq!(cs[2], cut(&[7, 8], 0b1000));
    }

    #[test]
    fn test_capacity_one_keeps_only_unit() {
        let v = Var::new(0);
        let mut cs = CutSet::new();
        cs.init(v, &mut NoObserver);
        assert_eq!(cs.insert(v, cut(&[1, 2], 0b1000), 1, &mut NoObserver), CutInsert::Full);
        assert_eq!(cs.len(), 1);
    }

    #[test]
    fn test_reset_notifies() {
        let v = Var::new(1);
        let mut obs = Counter::default();
        let mut cs = CutSet::new();
        cs.init(v, &mut obs);
        cs.insert(v, cut(&[2, 3], 0b0110), 10, &mut obs);
        cs.reset(v, &mut obs);
        assert!(cs.is_empty());
        assert_eq!(obs.deleted, 2);
    }
}
