//! The `stress` command: solve many random circuits at once.
//!
//! Every circuit is submitted before any result is awaited, so the solver
//! sees the whole batch concurrently. Each resolved value is compared with
//! the sequential reference solver. With `--stop-after-ms` the solver is
//! stopped mid-run, which exercises cancellation of in-flight evaluations.

use std::thread;
use std::time::{Duration, Instant};

use clap::Args;
use parcircuit::circuit::{Circuit, CircuitNode, SequentialSolver};
use parcircuit::solver::{CircuitValue, Outcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::common::{GlobalOptions, SolverSession};
use crate::error::CliError;

/// Arguments for `parcircuit stress`.
#[derive(Debug, Args)]
pub struct StressArgs {
    /// Number of circuits to generate
    #[arg(long, default_value_t = 100)]
    pub count: usize,

    /// Maximum depth of each generated circuit
    #[arg(long, default_value_t = 5)]
    pub depth: usize,

    /// Maximum leaf delay in milliseconds
    #[arg(long, default_value_t = 20)]
    pub max_delay_ms: u64,

    /// Random seed (default: random)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop the solver after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub stop_after_ms: Option<u64>,
}

/// Totals of a stress run.
#[derive(Debug, Default, PartialEq, Eq)]
struct StressReport {
    circuits: usize,
    resolved: usize,
    cancelled: usize,
    mismatches: usize,
}

/// Run the stress command.
pub fn run(args: StressArgs, options: &GlobalOptions) -> Result<(), CliError> {
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut generator = CircuitGenerator::new(seed, args.depth, args.max_delay_ms);
    let circuits: Vec<Circuit> = (0..args.count).map(|_| generator.circuit()).collect();

    let session = SolverSession::start(options)?;
    let solver = &session.solver;
    info!(seed, count = args.count, "Starting stress run");

    let started = Instant::now();
    let handles: Vec<_> = circuits.iter().map(|c| solver.solve(c)).collect();

    let report = thread::scope(|scope| {
        if let Some(ms) = args.stop_after_ms {
            scope.spawn(move || {
                thread::sleep(Duration::from_millis(ms));
                solver.stop();
            });
        }

        let reference = SequentialSolver::new();
        let mut report = StressReport {
            circuits: circuits.len(),
            ..StressReport::default()
        };
        for (circuit, handle) in circuits.iter().zip(&handles) {
            match wait_outcome(handle) {
                Outcome::Resolved(value) => {
                    report.resolved += 1;
                    if reference.solve(circuit) != Ok(value) {
                        tracing::error!(evaluation = %handle.id(), circuit = %circuit, "Result mismatch");
                        report.mismatches += 1;
                    }
                }
                Outcome::Cancelled => report.cancelled += 1,
            }
        }
        report
    });
    let elapsed = started.elapsed();

    solver.stop();
    let leftover = solver.active_evaluations();

    println!("seed:       {}", seed);
    println!("circuits:   {}", report.circuits);
    println!("resolved:   {}", report.resolved);
    println!("cancelled:  {}", report.cancelled);
    println!("mismatches: {}", report.mismatches);
    println!("elapsed:    {:.1}ms", elapsed.as_secs_f64() * 1000.0);

    if report.mismatches > 0 {
        return Err(CliError::Stress(format!(
            "{} results disagree with the sequential solver",
            report.mismatches
        )));
    }
    if report.cancelled > 0 && args.stop_after_ms.is_none() {
        return Err(CliError::Stress(format!(
            "{} evaluations were cancelled without a stop",
            report.cancelled
        )));
    }
    if leftover != 0 {
        return Err(CliError::Stress(format!(
            "{} evaluations still running after stop",
            leftover
        )));
    }
    Ok(())
}

fn wait_outcome(handle: &CircuitValue) -> Outcome {
    match handle.get_value() {
        Ok(value) => Outcome::Resolved(value),
        Err(_) => Outcome::Cancelled,
    }
}

// =============================================================================
// Circuit Generator
// =============================================================================

/// Seeded generator of random well-formed circuits.
struct CircuitGenerator {
    rng: StdRng,
    max_depth: usize,
    max_delay_ms: u64,
}

impl CircuitGenerator {
    const MAX_FAN_OUT: usize = 4;

    fn new(seed: u64, max_depth: usize, max_delay_ms: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_depth,
            max_delay_ms,
        }
    }

    fn circuit(&mut self) -> Circuit {
        Circuit::new_unchecked(self.node(self.max_depth))
    }

    fn node(&mut self, depth: usize) -> CircuitNode {
        if depth == 0 || self.rng.gen_bool(0.3) {
            return self.leaf();
        }
        let below = depth - 1;
        match self.rng.gen_range(0..6) {
            0 => CircuitNode::not(self.node(below)),
            1 => CircuitNode::and(self.children(below)),
            2 => CircuitNode::or(self.children(below)),
            3 => CircuitNode::if_then_else(self.node(below), self.node(below), self.node(below)),
            4 => {
                let args = self.children(below);
                let threshold = self.rng.gen_range(0..=args.len());
                CircuitNode::gt(threshold, args)
            }
            _ => {
                let args = self.children(below);
                let threshold = self.rng.gen_range(0..=args.len() + 1);
                CircuitNode::lt(threshold, args)
            }
        }
    }

    fn children(&mut self, depth: usize) -> Vec<CircuitNode> {
        let count = self.rng.gen_range(1..=Self::MAX_FAN_OUT);
        (0..count).map(|_| self.node(depth)).collect()
    }

    fn leaf(&mut self) -> CircuitNode {
        let value = self.rng.gen_bool(0.5);
        let delay = self.rng.gen_range(0..=self.max_delay_ms);
        CircuitNode::delayed_leaf(value, Duration::from_millis(delay))
    }
}
