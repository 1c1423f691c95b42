//! parcircuit - concurrent evaluation of boolean circuits.
//!
//! A circuit is a tree of gates (`NOT`, `AND`, `OR`, `IF`, `GT`, `LT`) over
//! leaves that may carry an artificial delay. The [`solver::ParallelSolver`]
//! evaluates every child of every gate concurrently and stops a subtree as
//! soon as its value can no longer change the result.
//!
//! # Modules
//!
//! - [`circuit`]: circuit model, text format and a sequential reference solver
//! - [`solver`]: the parallel solver, its handles and telemetry
//! - [`config`]: the `~/.parcircuit/config.ini` file
//! - [`logging`]: tracing subscriber setup
//!
//! # Example
//!
//! ```
//! use parcircuit::circuit::Circuit;
//! use parcircuit::solver::{ParallelSolver, SolverConfig};
//!
//! let solver = ParallelSolver::new(SolverConfig::default()).unwrap();
//! let circuit: Circuit = "AND(false, true@10s)".parse().unwrap();
//!
//! // Resolves immediately: the slow leaf is cancelled.
//! assert_eq!(solver.solve(&circuit).get_value(), Ok(false));
//! solver.stop();
//! ```

pub mod circuit;
pub mod config;
pub mod logging;
pub mod solver;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
