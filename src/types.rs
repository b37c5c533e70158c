//! Type-safe wrappers for variables and literals.
//!
//! This module provides newtype wrappers that enforce compile-time distinction
//! between variable IDs and signed literals, preventing the usual mix-ups
//! between "a Boolean unknown" and "an unknown with a polarity".
use std::fmt;
use std::ops::{Neg, Not};

/// A variable identifier (0-indexed).
///
/// Variables name Boolean unknowns of the surrounding clause database.
/// They are opaque: the engine only uses them as indices into its
/// per-variable tables, which grow on demand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given ID.
    pub const fn new(id: u32) -> Self {
        Var(id)
    }

    /// Returns the raw variable ID as a `u32`.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the variable ID as a table index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The positive literal of this variable.
    pub const fn pos(self) -> Lit {
        Lit::new(self, false)
    }

    /// The negative literal of this variable.
    pub const fn neg(self) -> Lit {
        Lit::new(self, true)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

impl From<u32> for Var {
    fn from(id: u32) -> Self {
        Var(id)
    }
}

/// Number of variables a [`Lit`] can encode.
pub const MAX_VARS: u32 = 1 << 31;

/// A literal: a variable together with a polarity.
///
/// Encoded as `2 * var + sign`, so a literal and its complement differ only
/// in the lowest bit and literals sort by variable first.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit(u32);

impl Lit {
    /// # Panics
    ///
    /// Panics if `var` does not fit in 31 bits.
    pub const fn new(var: Var, sign: bool) -> Self {
        assert!(var.0 < MAX_VARS, "Variable out of literal range");
        Lit((var.0 << 1) | sign as u32)
    }

    /// Builds a literal from a DIMACS integer (`3` is `x2`, `-3` is `~x2`).
    ///
    /// # Panics
    ///
    /// Panics if `value == 0`, which is the DIMACS clause terminator.
    pub fn from_dimacs(value: i32) -> Self {
        assert_ne!(value, 0, "DIMACS literal must be non-zero");
        Lit::new(Var(value.unsigned_abs() - 1), value < 0)
    }

    /// # Panics
    ///
    /// Panics if the variable has no positive `i32` encoding.
    pub fn to_dimacs(self) -> i32 {
        assert!(self.var().0 < i32::MAX as u32, "Variable out of DIMACS range");
        let v = (self.var().0 + 1) as i32;
        if self.sign() {
            -v
        } else {
            v
        }
    }

    pub const fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    /// True for the negative literal.
    pub const fn sign(self) -> bool {
        self.0 & 1 != 0
    }

    pub const fn is_positive(self) -> bool {
        !self.sign()
    }

    /// Flips the polarity when `flip` is set.
    pub const fn xor_sign(self, flip: bool) -> Self {
        Lit(self.0 ^ flip as u32)
    }

}

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Lit(self.0 ^ 1)
    }
}

impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        !self
    }
}

impl From<Var> for Lit {
    fn from(var: Var) -> Self {
        var.pos()
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign() {
            write!(f, "~")?;
        }
        write!(f, "{}", self.var())
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
