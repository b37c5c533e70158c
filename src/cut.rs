//! Cuts: a bounded support plus a truth table over it.
//!
//! A cut `(support, table)` of variable `v` states that `v` equals the
//! function `table` evaluated on the values of `support`. Row `i` of the
//! table is the assignment where `support[j]` takes bit `j` of `i`, so for
//! a two-variable support `{a, b}` the rows are `(a,b) = (0,0), (1,0),
//! (0,1), (1,1)` and AND is `0b1000`. The first (smallest) support variable
//! is the least-significant bit of the row index.
//!
//! Supports are kept sorted and duplicate-free, and table bits above row
//! `2^len` are always zero, so structural equality is functional equality.

use std::fmt;

use crate::types::{Lit, Var};

/// Maximum support width. A 6-input table fills exactly one `u64`.
pub const MAX_CUT_SIZE: usize = 6;

/// Mask of the meaningful table bits for a support of `size` inputs.
pub fn table_mask(size: usize) -> u64 {
    if size >= MAX_CUT_SIZE {
        u64::MAX
    } else {
        (1u64 << (1 << size)) - 1
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Cut {
    size: u8,
    elems: [Var; MAX_CUT_SIZE],
    table: u64,
}

impl Cut {
    /// Builds a cut from a sorted, duplicate-free support.
    ///
    /// # Panics
    ///
    /// Panics if the support is wider than [`MAX_CUT_SIZE`] or not strictly
    /// increasing.
    pub fn new(support: &[Var], table: u64) -> Self {
        assert!(
            support.len() <= MAX_CUT_SIZE,
            "Cut support {} exceeds {}",
            support.len(),
            MAX_CUT_SIZE
        );
        assert!(
            support.windows(2).all(|w| w[0] < w[1]),
            "Cut support must be strictly increasing"
        );
        let mut elems = [Var::new(0); MAX_CUT_SIZE];
        elems[..support.len()].copy_from_slice(support);
        Self {
            size: support.len() as u8,
            elems,
            table: table & table_mask(support.len()),
        }
    }

    /// The trivial cut `{v}` with the identity table.
    pub fn unit(v: Var) -> Self {
        Self::new(&[v], 0b10)
    }

    /// The cut with empty support denoting a constant.
    pub fn constant(value: bool) -> Self {
        Self::new(&[], value as u64)
    }

    pub fn len(&self) -> usize {
        self.size as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn support(&self) -> &[Var] {
        &self.elems[..self.len()]
    }

    pub fn table(&self) -> u64 {
        self.table
    }

    pub fn set_table(&mut self, table: u64) {
        self.table = table & table_mask(self.len());
    }

    pub fn contains(&self, v: Var) -> bool {
        self.support().binary_search(&v).is_ok()
    }

    /// Whether this is the trivial cut of `v`.
    pub fn is_unit_of(&self, v: Var) -> bool {
        self.size == 1 && self.elems[0] == v && self.table == 0b10
    }

    /// Complements the function.
    pub fn negate(&mut self) {
        self.table = !self.table & table_mask(self.len());
    }

    pub fn negated(mut self) -> Self {
        self.negate();
        self
    }

    /// Joint support of two cuts, with an empty table.
    ///
    /// Returns `None` if the union is wider than [`MAX_CUT_SIZE`].
    pub fn merge(a: &Cut, b: &Cut) -> Option<Cut> {
        let mut elems = [Var::new(0); MAX_CUT_SIZE];
        let mut n = 0;
        let (xs, ys) = (a.support(), b.support());
        let (mut i, mut j) = (0, 0);
        while i < xs.len() || j < ys.len() {
            let next = if j == ys.len() || (i < xs.len() && xs[i] < ys[j]) {
                i += 1;
                xs[i - 1]
            } else if i == xs.len() || ys[j] < xs[i] {
                j += 1;
                ys[j - 1]
            } else {
                i += 1;
                j += 1;
                xs[i - 1]
            };
            if n == MAX_CUT_SIZE {
                return None;
            }
            elems[n] = next;
            n += 1;
        }
        Some(Cut {
            size: n as u8,
            elems,
            table: 0,
        })
    }

    /// This cut's table re-expressed over the (wider) support of `to`.
    ///
    /// Requires `self.support()` to be a subset of `to.support()`.
    pub fn shift_table(&self, to: &Cut) -> u64 {
        debug_assert!(self.subset_of(to));
        let mut positions = [0usize; MAX_CUT_SIZE];
        let mut k = 0;
        for (j, v) in self.support().iter().enumerate() {
            while to.elems[k] != *v {
                k += 1;
            }
            positions[j] = k;
        }
        let mut result = 0u64;
        for row in 0..(1usize << to.len()) {
            let mut src = 0usize;
            for (j, &p) in positions[..self.len()].iter().enumerate() {
                src |= ((row >> p) & 1) << j;
            }
            if self.table & (1u64 << src) != 0 {
                result |= 1u64 << row;
            }
        }
        result
    }

    /// Whether this cut's support is contained in `other`'s.
    pub fn subset_of(&self, other: &Cut) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let ys = other.support();
        let mut j = 0;
        for x in self.support() {
            while j < ys.len() && ys[j] < *x {
                j += 1;
            }
            if j == ys.len() || ys[j] != *x {
                return false;
            }
            j += 1;
        }
        true
    }

    /// Table value at a single row.
    pub fn eval_row(&self, row: usize) -> bool {
        self.table & (1u64 << row) != 0
    }

    /// Bit-parallel evaluation: `words[v]` holds 64 samples of variable `v`.
    pub fn eval(&self, words: &[u64]) -> u64 {
        let mut result = 0u64;
        for row in 0..(1usize << self.len()) {
            if !self.eval_row(row) {
                continue;
            }
            let mut term = u64::MAX;
            for (j, v) in self.support().iter().enumerate() {
                let w = words[v.index()];
                term &= if (row >> j) & 1 != 0 { w } else { !w };
            }
            result |= term;
        }
        result
    }

    /// Rewrites every support variable `v` to the literal `map(v)`.
    ///
    /// Inputs mapped to the same variable collapse into one, and negated
    /// targets are absorbed into the table.
    pub fn substitute(&self, map: impl Fn(Var) -> Lit) -> Cut {
        let lits: Vec<Lit> = self.support().iter().map(|&v| map(v)).collect();
        let mut vars: Vec<Var> = lits.iter().map(|l| l.var()).collect();
        vars.sort_unstable();
        vars.dedup();
        let mut cut = Cut::new(&vars, 0);
        let mut table = 0u64;
        for row in 0..(1usize << vars.len()) {
            let mut src = 0usize;
            for (j, lit) in lits.iter().enumerate() {
                let pos = vars.binary_search(&lit.var()).unwrap_or_default();
                let bit = ((row >> pos) & 1 != 0) ^ lit.sign();
                src |= (bit as usize) << j;
            }
            if self.eval_row(src) {
                table |= 1u64 << row;
            }
        }
        cut.set_table(table);
        cut
    }
}

impl fmt::Display for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.support().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "}}:{:#x}", self.table)
    }
}

impl fmt::Debug for Cut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(ids: &[u32]) -> Vec<Var> {
        ids.iter().map(|&i| Var::new(i)).collect()
    }

    #[test]
    fn test_mask() {
        assert_eq!(table_mask(0), 0b1);
        assert_eq!(table_mask(1), 0b11);
        assert_eq!(table_mask(2), 0xf);
        assert_eq!(table_mask(6), u64::MAX);
    }

    #[test]
    fn test_unit_and_constant() {
        let u = Cut::unit(Var::new(3));
        assert!(u.is_unit_of(Var::new(3)));
        assert!(!u.is_unit_of(Var::new(2)));
        assert_eq!(Cut::constant(true).table(), 1);
        assert_eq!(Cut::constant(false).table(), 0);
        assert!(Cut::constant(true).is_empty());
    }

    #[test]
    fn test_new_masks_table() {
        let c = Cut::new(&vars(&[1]), u64::MAX);
        assert_eq!(c.table(), 0b11);
    }

    #[test]
    #[should_panic(expected = "strictly increasing")]
    fn test_unsorted_support_panics() {
        Cut::new(&vars(&[2, 1]), 0);
    }

    #[test]
    fn test_merge() {
        let a = Cut::new(&vars(&[1, 3]), 0);
        let b = Cut::new(&vars(&[2, 3, 5]), 0);
        let c = Cut::merge(&a, &b).unwrap();
        assert_eq!(c.support(), vars(&[1, 2, 3, 5]).as_slice());
    }

    #[test]
    fn test_merge_overflow() {
        let a = Cut::new(&vars(&[0, 1, 2, 3]), 0);
        let b = Cut::new(&vars(&[4, 5, 6]), 0);
        assert!(Cut::merge(&a, &b).is_none());
        let c = Cut::new(&vars(&[0, 1, 2, 3, 4, 5]), 0);
        assert!(Cut::merge(&c, &a).is_some());
    }

    #[test]
    fn test_shift_table() {
        // a over {a}, lifted to {a, b}: true on rows where a = 1.
        let a = Cut::unit(Var::new(1));
        let b = Cut::unit(Var::new(2));
        let ab = Cut::merge(&a, &b).unwrap();
        assert_eq!(a.shift_table(&ab), 0b1010);
        assert_eq!(b.shift_table(&ab), 0b1100);
        assert_eq!(a.shift_table(&ab) & b.shift_table(&ab), 0b1000);
    }

    #[test]
    fn test_subset_of() {
        let a = Cut::new(&vars(&[1, 3]), 0);
        let b = Cut::new(&vars(&[1, 2, 3]), 0);
        assert!(a.subset_of(&b));
        assert!(!b.subset_of(&a));
        assert!(Cut::constant(true).subset_of(&a));
    }

    #[test]
    fn test_negate() {
        let mut c = Cut::new(&vars(&[1, 2]), 0b1000);
        c.negate();
        assert_eq!(c.table(), 0b0111);
        assert_eq!(c.negated().table(), 0b1000);
    }

    #[test]
    fn test_eval() {
        let mut words = vec![0u64; 3];
        words[1] = 0b1100;
        words[2] = 0b1010;
        let and = Cut::new(&vars(&[1, 2]), 0b1000);
        assert_eq!(and.eval(&words), 0b1000);
        let xor = Cut::new(&vars(&[1, 2]), 0b0110);
        assert_eq!(xor.eval(&words), 0b0110);
        assert_eq!(Cut::constant(true).eval(&words), u64::MAX);
    }

    #[test]
    fn test_substitute_rename() {
        // f(x1, x2) = x1 & !x2, with x2 := x3
        let c = Cut::new(&vars(&[1, 2]), 0b0010);
        let d = c.substitute(|v| if v == Var::new(2) { Var::new(3).pos() } else { v.pos() });
        assert_eq!(d.support(), vars(&[1, 3]).as_slice());
        assert_eq!(d.table(), 0b0010);
    }

    #[test]
    fn test_substitute_negated_collapse() {
        // f(x1, x2) = x1 & x2, with x2 := ~x1 gives constant false over {x1}.
        let c = Cut::new(&vars(&[1, 2]), 0b1000);
        let d = c.substitute(|v| if v == Var::new(2) { Var::new(1).neg() } else { v.pos() });
        assert_eq!(d.support(), vars(&[1]).as_slice());
        assert_eq!(d.table(), 0);
    }

    #[test]
    fn test_substitute_unit_to_negation() {
        let c = Cut::unit(Var::new(4));
        let d = c.substitute(|_| Var::new(0).neg());
        assert_eq!(d.support(), vars(&[0]).as_slice());
        assert_eq!(d.table(), 0b01);
    }

    #[test]
    fn test_display() {
        let c = Cut::new(&vars(&[0, 1]), 0b1000);
        assert_eq!(c.to_string(), "{x0 x1}:0x8");
    }
}
