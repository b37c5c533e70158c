/// Tunables of an [`AigCuts`][crate::aig_cuts::AigCuts] instance.
///
/// Fixed at construction; the engine only reads it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cuts kept per variable.
    pub max_cutset_size: usize,
    /// Maximum number of alternative definitions per variable.
    pub max_aux: usize,
    /// Maximum number of candidate cuts one definition offers per pass.
    /// The narrowest candidates are kept.
    pub max_insertions: usize,
    /// Exhaustive composition of N-ary nodes instead of bounded folding.
    pub full: bool,
    /// Seed for the simulator. `None` draws a fresh seed from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cutset_size: 20,
            max_aux: 5,
            max_insertions: 20,
            full: false,
            seed: None,
        }
    }
}

impl Config {
    pub fn with_max_cutset_size(mut self, size: usize) -> Self {
        assert!(size >= 1, "Cut-set must hold at least the unit cut");
        self.max_cutset_size = size;
        self
    }

    pub fn with_max_aux(mut self, max_aux: usize) -> Self {
        assert!(max_aux >= 1, "At least one definition per variable");
        self.max_aux = max_aux;
        self
    }

    pub fn with_max_insertions(mut self, max_insertions: usize) -> Self {
        self.max_insertions = max_insertions;
        self
    }

    pub fn with_full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
