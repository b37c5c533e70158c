//! Equivalence discovery on redundant AND chains.
//!
//! Builds several copies of the same conjunctions, each associated in a
//! different random order, then alternates cut enumeration, simulation and
//! merging until no new equivalence is found. Merges are printed as DIMACS
//! clauses.
//!
//! Run with: `cargo run --example equivalences`
//! With options: `cargo run --example equivalences -- --copies 4 --width 5`

use std::time::Instant;

use aig_cuts::aig_cuts::AigCuts;
use aig_cuts::config::Config;
use aig_cuts::emit::ClauseLog;
use aig_cuts::equiv::Candidate;
use aig_cuts::node::BoolOp;
use aig_cuts::types::{Lit, Var};
use clap::Parser;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

#[derive(Parser, Debug)]
#[command(name = "equivalences")]
#[command(about = "Find equivalent gates through shared cuts")]
struct Args {
    /// Number of input variables
    #[arg(short, long, default_value_t = 8)]
    inputs: u32,

    /// Inputs per conjunction (at most 6)
    #[arg(short, long, default_value_t = 4)]
    width: usize,

    /// Number of conjunctions
    #[arg(short = 'k', long, default_value_t = 5)]
    conjunctions: usize,

    /// Differently associated copies of each conjunction
    #[arg(short, long, default_value_t = 3)]
    copies: usize,

    /// Simulation rounds per iteration
    #[arg(short, long, default_value_t = 1024)]
    rounds: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Print the emitted clauses
    #[arg(long)]
    show_clauses: bool,
}

/// Adds `lits[0] & ... & lits[n-1]` as a chain of binary ANDs starting at
/// `next`, returning the output variable.
fn add_chain(aig: &mut AigCuts, lits: &[Lit], next: &mut u32) -> Var {
    let mut acc = lits[0];
    for &lit in &lits[1..] {
        let out = Var::new(*next);
        *next += 1;
        aig.add_node(out.pos(), BoolOp::And, &[acc, lit]);
        acc = out.pos();
    }
    acc.var()
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Args::parse();
    if args.width < 2 || args.width > 6 || args.width > args.inputs as usize {
        color_eyre::eyre::bail!("width must be within 2..=min(6, inputs), got {}", args.width);
    }
    println!("args = {:?}", args);

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut aig = AigCuts::new(Config::default().with_seed(args.seed));
    for i in 0..args.inputs {
        aig.add_var(Var::new(i));
    }

    let mut next = args.inputs;
    let mut outputs: Vec<Vec<Var>> = Vec::new();
    for _ in 0..args.conjunctions {
        let vars: Vec<Var> = (0..args.inputs).map(Var::new).choose_multiple(&mut rng, args.width);
        let mut lits: Vec<Lit> = vars.iter().map(|&v| Lit::new(v, rng.random_bool(0.3))).collect();
        let mut copies = Vec::new();
        for _ in 0..args.copies {
            lits.shuffle(&mut rng);
            copies.push(add_chain(&mut aig, &lits, &mut next));
        }
        outputs.push(copies);
    }
    println!("aig = {:?}", aig);

    let time_total = Instant::now();
    let mut queue = ClauseLog::new();
    let mut iteration = 0;
    loop {
        iteration += 1;
        aig.enumerate();
        let sigs = aig.simulate(args.rounds);
        let candidates = aig.find_candidates(&sigs);
        let mut validator = |_: &AigCuts, c: &Candidate| sigs.matches_cut(c.var, &c.cut);
        let merged = aig.apply_candidates(&candidates, &mut validator, &mut queue);
        println!(
            "iteration {}: {} candidates, {} merged, {} cuts so far",
            iteration,
            candidates.len(),
            merged,
            aig.num_cuts()
        );
        if merged == 0 {
            break;
        }
    }
    println!("done in {:?}", time_total.elapsed());

    for (k, copies) in outputs.iter().enumerate() {
        let roots: Vec<String> = copies.iter().map(|&v| aig.canonical_of(v.pos()).to_string()).collect();
        println!("conjunction {}: copies {:?} -> roots [{}]", k, copies, roots.join(", "));
    }

    let clauses: Vec<Vec<i32>> = queue
        .added()
        .map(|c| c.iter().map(|l| l.to_dimacs()).collect())
        .collect();
    println!("{} clauses emitted", clauses.len());
    if args.show_clauses {
        for clause in &clauses {
            let line: Vec<String> = clause.iter().map(|l| l.to_string()).collect();
            println!("{} 0", line.join(" "));
        }
    }

    Ok(())
}
