//! Parallel circuit solver.
//!
//! Evaluates a [`Circuit`](crate::circuit::Circuit) with one tokio task per
//! node and stops every subtree as soon as its value is no longer needed.
//!
//! # Architecture
//!
//! ```text
//! ParallelSolver::solve
//!   └─ root task (TaskTracker, child token of the shutdown token)
//!        └─ evaluate(node)
//!             ├─ AND / OR / GT / LT ─ TaskGroup ─ evaluate(child) ...
//!             ├─ NOT / IF ─────────── ChildTask ─ evaluate(child) ...
//!             └─ leaf ─────────────── sleep(delay), raced with cancellation
//! ```
//!
//! Results travel upward as [`Outcome`] values; cancellation travels downward
//! through a tree of `CancellationToken`s. The only shared state between
//! tasks is the join channel of each task and the single-publish cell behind
//! each [`CircuitValue`].
//!
//! # Stopping
//!
//! [`ParallelSolver::stop`] flips the solver to non-accepting, cancels the
//! shutdown token and waits for every root task to finish. Since each gate
//! drains its children before returning, a finished root task means the
//! whole evaluation is gone.

mod cell;
mod config;
mod context;
mod core;
mod error;
mod evaluator;
mod group;
mod handle;
mod outcome;
mod telemetry;

pub use config::{SolverConfig, DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_THREAD_NAME};
pub use core::ParallelSolver;
pub use error::{SolveError, SolverError};
pub use handle::{CircuitValue, EvaluationId};
pub use outcome::{EvaluationStatus, Outcome};
pub use telemetry::{
    MultiplexTelemetrySink, NullTelemetrySink, TelemetryEvent, TelemetrySink,
    TracingTelemetrySink,
};
