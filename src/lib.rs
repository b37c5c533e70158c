//! # aig-cuts: incremental AIG cut enumeration
//!
//! **`aig-cuts`** maintains an And-Inverter Graph extracted from a growing clause database and
//! enumerates small **cuts** of it: for every variable, a bounded set of (support, truth table)
//! pairs describing the variable as a function of at most six other variables.
//! Variables sharing a cut compute the same function, so they can be merged and the clause
//! database shrinks.
//!
//! ## Key Features
//!
//! - **Alternative definitions**: every variable keeps up to `max_aux` definitions (AND, XOR, ITE over literals), narrower ones preferred.
//! - **Incremental**: touch stamps restrict each pass to variables whose definitions or inputs changed.
//! - **Merging**: [`set_root`][crate::aig_cuts::AigCuts::set_root] records an equivalence; the next pass rewrites the graph and all cuts onto the representative.
//! - **Clause output**: definitions, cuts and merges translate into clauses delivered to a [`ClauseSink`][crate::emit::ClauseSink].
//!
//! ## Basic Usage
//!
//! ```rust
//! use aig_cuts::aig_cuts::AigCuts;
//! use aig_cuts::cut::Cut;
//! use aig_cuts::node::BoolOp;
//! use aig_cuts::types::Var;
//!
//! let mut aig = AigCuts::default();
//! let (a, b, c) = (Var::new(0), Var::new(1), Var::new(2));
//!
//! // c = a & b
//! aig.add_node(c.pos(), BoolOp::And, &[a.pos(), b.pos()]);
//! let cuts = aig.enumerate();
//!
//! // The first support variable is the least-significant bit of the row
//! // index, so rows are (a,b) = 00, 10, 01, 11 and AND sets only bit 3.
//! assert!(cuts[c.index()].contains(&Cut::new(&[a, b], 0b1000)));
//! ```
//!
//! ## Core Components
//!
//! - **[`aig_cuts`]**: The [`AigCuts`][crate::aig_cuts::AigCuts] engine and its inbound API.
//! - **[`enumerate`]**: Cut composition for every operator.
//! - **[`simulate`]**: Random simulation and signatures.
//! - **[`equiv`]**: Candidate equivalences from shared cuts.
//! - **[`emit`]**: Clause translation.

pub mod aig_cuts;
pub mod arena;
pub mod config;
pub mod cut;
pub mod cutset;
pub mod emit;
pub mod enumerate;
pub mod equiv;
pub mod flatten;
pub mod node;
pub mod roots;
pub mod simulate;
pub mod store;
pub mod topo;
pub mod touch;
pub mod types;
