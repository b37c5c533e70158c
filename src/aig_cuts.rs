//! The engine: AIG store, cut-sets, touch stamps and roots under one owner.
//!
//! The inbound API lives here. Enumeration, simulation, root flattening and
//! clause emission are further `impl AigCuts` blocks in their own modules.

use std::fmt::Debug;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::cut::Cut;
use crate::cutset::{CutObserver, CutSet, NoObserver};
use crate::emit::{node2def, ClauseSink};
use crate::node::{BoolOp, Node};
use crate::roots::RootMap;
use crate::store::{AigStore, Insertion};
use crate::touch::TouchTracker;
use crate::types::{Lit, Var};

/// Amount by which [`AigCuts::inc_max_cutset_size`] raises a variable's cap.
pub const CUTSET_SIZE_INCREMENT: usize = 10;

pub struct AigCuts {
    pub(crate) config: Config,
    pub(crate) store: AigStore,
    pub(crate) cuts: Vec<CutSet>,
    pub(crate) max_cutset_size: Vec<usize>,
    pub(crate) touched: TouchTracker,
    pub(crate) roots: RootMap,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) num_cuts: usize,
    pub(crate) observer: Box<dyn CutObserver>,
    pub(crate) clause_sink: Option<Box<dyn ClauseSink>>,
}

impl AigCuts {
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        debug!("AigCuts::new: {:?}, simulation seed {}", config, seed);
        Self {
            store: AigStore::new(config.max_aux),
            config,
            cuts: Vec::new(),
            max_cutset_size: Vec::new(),
            touched: TouchTracker::new(),
            roots: RootMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            num_cuts: 0,
            observer: Box::new(NoObserver),
            clause_sink: None,
        }
    }
}

impl Default for AigCuts {
    fn default() -> Self {
        AigCuts::new(Config::default())
    }
}

impl Debug for AigCuts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AigCuts")
            .field("vars", &self.store.len())
            .field("literals", &self.store.arena().len())
            .field("num_cuts", &self.num_cuts)
            .field("passes", &self.touched.pass())
            .finish()
    }
}

// Getters
impl AigCuts {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &AigStore {
        &self.store
    }

    /// All cut-sets, indexed by variable.
    pub fn cuts(&self) -> &[CutSet] {
        &self.cuts
    }

    pub fn cut_set(&self, v: Var) -> Option<&CutSet> {
        self.cuts.get(v.index())
    }

    /// Total number of cuts accepted so far.
    pub fn num_cuts(&self) -> usize {
        self.num_cuts
    }

    pub fn num_passes(&self) -> u64 {
        self.touched.pass()
    }

    pub fn max_cutset_size(&self, v: Var) -> usize {
        self.max_cutset_size
            .get(v.index())
            .copied()
            .unwrap_or(self.config.max_cutset_size)
    }

    pub fn canonical_of(&self, lit: Lit) -> Lit {
        self.roots.canonical_of(lit)
    }

    pub fn is_root(&self, v: Var) -> bool {
        self.roots.is_root(v)
    }

    pub fn is_touched(&self, v: Var) -> bool {
        self.touched.is_touched(v)
    }
}

// Callbacks
impl AigCuts {
    /// Registers the observer of every cut-set change.
    pub fn set_cut_observer(&mut self, observer: Box<dyn CutObserver>) {
        self.observer = observer;
    }

    /// Registers the sink receiving the clauses of definitions as they are
    /// added to or evicted from the store.
    pub fn set_clause_sink(&mut self, sink: Box<dyn ClauseSink>) {
        self.clause_sink = Some(sink);
    }

    fn on_node_add(&mut self, v: Var, node: &Node) {
        if let Some(sink) = self.clause_sink.as_deref_mut() {
            node2def(node, self.store.children(node), v.pos(), |c| sink.add_clause(c));
        }
    }

    fn on_node_del(&mut self, v: Var, node: &Node, children: &[Lit]) {
        if let Some(sink) = self.clause_sink.as_deref_mut() {
            node2def(node, children, v.pos(), |c| sink.del_clause(c));
        }
    }
}

// Inbound API
impl AigCuts {
    /// Grows every per-variable table to hold `v`.
    pub(crate) fn reserve(&mut self, v: Var) {
        let n = v.index() + 1;
        self.store.reserve(v);
        if self.cuts.len() < n {
            self.cuts.resize_with(n, CutSet::new);
            self.max_cutset_size.resize(n, self.config.max_cutset_size);
        }
        self.touched.reserve(n);
        self.roots.reserve(n);
    }

    pub fn touch(&mut self, v: Var) {
        self.touched.touch(v);
    }

    /// Registers a leaf variable with its unit cut.
    pub fn add_var(&mut self, v: Var) {
        self.reserve(v);
        if self.store.add_var(v) {
            self.cuts[v.index()].init(v, &mut *self.observer);
            self.touch(v);
        }
    }

    /// Adds `head == op(args)` as a definition of `head.var()`.
    ///
    /// Malformed definitions (an ITE without three children, a `Var` with
    /// children, `Invalid`) are ignored.
    pub fn add_node(&mut self, head: Lit, op: BoolOp, args: &[Lit]) {
        let v = head.var();
        match op {
            BoolOp::Var if args.is_empty() => return self.add_var(v),
            BoolOp::Ite if args.len() == 3 => {}
            BoolOp::And | BoolOp::Xor => {}
            _ => {
                debug!("add_node: ignoring malformed {:?} with {} args", op, args.len());
                return;
            }
        }
        self.add_var(v);
        let args: Vec<Lit> = args
            .iter()
            .map(|&a| {
                self.add_var(a.var());
                self.roots.canonical_of(a)
            })
            .collect();

        let old: Vec<Node> = self.store.defs(v).to_vec();
        let old_children: Vec<Vec<Lit>> = old
            .iter()
            .map(|n| self.store.children(n).to_vec())
            .collect();
        match self.store.add_node(head, op, &args) {
            Insertion::Main { node, .. } => {
                debug!("add_node: {} == {}{:?} (main)", head, op, args);
                for (n, ch) in old.iter().zip(&old_children) {
                    self.on_node_del(v, n, ch);
                }
                self.on_node_add(v, &node);
                self.cuts[v.index()].init(v, &mut *self.observer);
                if node.is_const() {
                    let max = self.max_cutset_size(v);
                    let cut = Cut::constant(!node.sign);
                    self.cuts[v.index()].insert(v, cut, max, &mut *self.observer);
                }
                self.touch(v);
            }
            Insertion::Aux { node, evicted } => {
                debug!("add_node: {} == {}{:?} (aux)", head, op, args);
                if let Some(old_node) = evicted {
                    let idx = old.iter().position(|n| *n == old_node);
                    if let Some(i) = idx {
                        self.on_node_del(v, &old_node, &old_children[i]);
                    }
                }
                self.on_node_add(v, &node);
                self.touch(v);
            }
            Insertion::Rejected => {
                debug!("add_node: rejected {} == {}{:?}", head, op, args);
            }
        }
    }

    /// Records that `v` is equivalent to `r`.
    ///
    /// Takes effect at the next [`flush_roots`][AigCuts::flush_roots], which
    /// every enumeration pass runs first.
    pub fn set_root(&mut self, v: Var, r: Lit) {
        self.add_var(v);
        self.add_var(r.var());
        if self.roots.set_root(v, r) {
            debug!("set_root: {} -> {}", v, r);
        }
    }

    /// Raises the cut-set cap of `v` and schedules it for re-enumeration.
    pub fn inc_max_cutset_size(&mut self, v: Var) {
        self.reserve(v);
        self.max_cutset_size[v.index()] += CUTSET_SIZE_INCREMENT;
        self.touch(v);
    }
}
