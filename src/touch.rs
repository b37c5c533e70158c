//! Per-variable recency stamps.
//!
//! A touch made before or during pass `k` keeps the variable dirty through
//! pass `k + 1`. The extra pass lets a parent that was enumerated before a
//! child (possible only through cyclic definitions) pick up the child's new
//! cuts. Offering the same candidates again changes nothing, so the
//! re-run is a no-op when nothing new was derived.

use crate::types::Var;

#[derive(Debug, Default, Clone)]
pub struct TouchTracker {
    stamps: Vec<u64>,
    pass: u64,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, n: usize) {
        if self.stamps.len() < n {
            self.stamps.resize(n, 0);
        }
    }

    pub fn touch(&mut self, v: Var) {
        self.reserve(v.index() + 1);
        self.stamps[v.index()] = self.pass + 1;
    }

    pub fn is_touched(&self, v: Var) -> bool {
        self.stamps
            .get(v.index())
            .is_some_and(|&s| s != 0 && s >= self.pass)
    }

    /// Starts the next enumeration pass.
    pub fn begin_pass(&mut self) {
        self.pass += 1;
    }

    /// Number of passes started so far.
    pub fn pass(&self) -> u64 {
        self.pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched() {
        let mut t = TouchTracker::new();
        t.reserve(4);
        t.begin_pass();
        assert!(!t.is_touched(Var::new(2)));
        assert!(!t.is_touched(Var::new(100)));
    }

    #[test]
    fn test_touch_before_pass() {
        let mut t = TouchTracker::new();
        t.touch(Var::new(1));
        t.begin_pass();
        assert!(t.is_touched(Var::new(1)));
        t.begin_pass();
        assert!(!t.is_touched(Var::new(1)));
    }

    #[test]
    fn test_touch_during_pass_survives_one_more() {
        let mut t = TouchTracker::new();
        t.begin_pass();
        t.touch(Var::new(3));
        assert!(t.is_touched(Var::new(3)));
        t.begin_pass();
        assert!(t.is_touched(Var::new(3)));
        t.begin_pass();
        assert!(!t.is_touched(Var::new(3)));
    }
}
