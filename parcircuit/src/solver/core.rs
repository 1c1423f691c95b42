//! Parallel solver front door.
//!
//! This module contains [`ParallelSolver`], which accepts circuits, starts
//! their evaluation on a tokio runtime and hands back a [`CircuitValue`]
//! immediately.
//!
//! The solver either owns a multi-thread runtime built from its
//! [`SolverConfig`] or borrows the runtime of the caller. Every root
//! evaluation is spawned through a `TaskTracker` and gets a child token of
//! the solver's shutdown token, which is what `stop()` cancels and waits on.

use super::cell::ResultCell;
use super::config::SolverConfig;
use super::context::EvalContext;
use super::error::SolverError;
use super::evaluator::evaluate;
use super::handle::{CircuitValue, EvaluationId};
use super::outcome::Outcome;
use super::telemetry::{NullTelemetrySink, TelemetryEvent, TelemetrySink};
use crate::circuit::Circuit;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

// =============================================================================
// Solver State
// =============================================================================

/// Where root evaluations are spawned.
enum SolverRuntime {
    /// Runtime built and owned by the solver.
    Owned(Runtime),
    /// Runtime owned by someone else.
    Borrowed(Handle),
    /// Stopped; no runtime available.
    Released,
}

impl SolverRuntime {
    fn handle(&self) -> Option<&Handle> {
        match self {
            Self::Owned(runtime) => Some(runtime.handle()),
            Self::Borrowed(handle) => Some(handle),
            Self::Released => None,
        }
    }
}

struct SolverState {
    accepting: bool,
    runtime: SolverRuntime,
}

// =============================================================================
// Parallel Solver
// =============================================================================

/// Evaluates circuits concurrently, one task per node.
///
/// # Example
///
/// ```
/// use parcircuit::circuit::Circuit;
/// use parcircuit::solver::{ParallelSolver, SolverConfig};
///
/// let solver = ParallelSolver::new(SolverConfig::default().with_worker_threads(2)).unwrap();
/// let circuit: Circuit = "IF(GT(1, true, true), AND(true, true), OR(false, false))"
///     .parse()
///     .unwrap();
///
/// let value = solver.solve(&circuit);
/// assert_eq!(value.get_value(), Ok(true));
///
/// solver.stop();
/// assert!(solver.solve(&circuit).get_value().is_err());
/// ```
pub struct ParallelSolver {
    state: Mutex<SolverState>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    telemetry: Arc<dyn TelemetrySink>,
    config: SolverConfig,
}

impl ParallelSolver {
    /// Creates a solver with its own multi-thread runtime.
    pub fn new(config: SolverConfig) -> Result<Self, SolverError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .thread_name(config.thread_name.clone())
            .enable_time()
            .build()?;
        info!(
            workers = config.worker_threads,
            thread_name = %config.thread_name,
            "Parallel solver started"
        );
        Ok(Self::with_runtime(SolverRuntime::Owned(runtime), config))
    }

    /// Creates a solver that spawns onto an existing runtime.
    ///
    /// The runtime must have the time driver enabled. `worker_threads` and
    /// `thread_name` from `config` are not used.
    pub fn with_handle(handle: Handle, config: SolverConfig) -> Self {
        Self::with_runtime(SolverRuntime::Borrowed(handle), config)
    }

    fn with_runtime(runtime: SolverRuntime, config: SolverConfig) -> Self {
        Self {
            state: Mutex::new(SolverState {
                accepting: true,
                runtime,
            }),
            shutdown: CancellationToken::new(),
            tracker: TaskTracker::new(),
            telemetry: Arc::new(NullTelemetrySink),
            config,
        }
    }

    /// Replaces the telemetry sink.
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Returns the solver's configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Returns true until `stop()` (or `shutdown()`) has been called.
    pub fn is_accepting(&self) -> bool {
        self.state.lock().accepting
    }

    /// Number of root evaluations whose tasks are still alive.
    pub fn active_evaluations(&self) -> usize {
        self.tracker.len()
    }

    /// Submits a circuit and returns its handle without waiting.
    ///
    /// After the solver has stopped the returned handle is already
    /// cancelled.
    pub fn solve(&self, circuit: &Circuit) -> CircuitValue {
        let evaluation = EvaluationId::next();
        let (cell, status_rx) = ResultCell::new();
        let cancellation = self.shutdown.child_token();
        let value = CircuitValue::new(evaluation, status_rx, cancellation.clone());

        // Held while spawning so `stop()` cannot slip in between the check
        // and the tracker registration.
        let state = self.state.lock();
        let handle = match state.accepting {
            true => state.runtime.handle().cloned(),
            false => None,
        };
        let Some(handle) = handle else {
            drop(state);
            cell.publish(Outcome::Cancelled);
            self.telemetry
                .emit(TelemetryEvent::EvaluationRejected { evaluation });
            return value;
        };

        self.telemetry.emit(TelemetryEvent::EvaluationSubmitted {
            evaluation,
            nodes: circuit.size(),
        });

        let root = Arc::clone(circuit.root());
        let telemetry = Arc::clone(&self.telemetry);
        self.tracker.spawn_on(
            async move {
                let started = Instant::now();
                let ctx = EvalContext::root(evaluation, cancellation, Arc::clone(&telemetry));
                let outcome = evaluate(root, ctx).await;
                telemetry.emit(TelemetryEvent::EvaluationFinished {
                    evaluation,
                    outcome,
                    duration: started.elapsed(),
                });
                cell.publish(outcome);
            },
            &handle,
        );
        value
    }

    /// Stops the solver and blocks until all its work has ended.
    ///
    /// New submissions are rejected, every pending evaluation is cancelled
    /// and drained, and an owned runtime is shut down. Values published
    /// before the call are kept. Idempotent.
    ///
    /// Blocks the calling thread. With a borrowed runtime, call
    /// [`ParallelSolver::shutdown`] from async code instead.
    pub fn stop(&self) {
        let runtime = self.begin_stop();
        futures::executor::block_on(self.tracker.wait());
        if let SolverRuntime::Owned(runtime) = runtime {
            release_runtime(runtime, &self.config);
        }
    }

    /// Async variant of [`ParallelSolver::stop`].
    ///
    /// An owned runtime is shut down on a blocking thread, and the call
    /// returns once its worker threads have been joined.
    pub async fn shutdown(&self) {
        let runtime = self.begin_stop();
        self.tracker.wait().await;
        let SolverRuntime::Owned(runtime) = runtime else {
            return;
        };

        let timeout = self.config.shutdown_timeout;
        let released =
            tokio::task::spawn_blocking(move || runtime.shutdown_timeout(timeout)).await;
        if let Err(e) = released {
            warn!(error = %e, "Runtime shutdown did not complete");
        }
    }

    /// Flips the solver to non-accepting and signals all evaluations.
    ///
    /// Returns the runtime on the first call and `Released` afterwards.
    fn begin_stop(&self) -> SolverRuntime {
        let (was_accepting, runtime) = {
            let mut state = self.state.lock();
            let was_accepting = std::mem::replace(&mut state.accepting, false);
            let runtime = std::mem::replace(&mut state.runtime, SolverRuntime::Released);
            (was_accepting, runtime)
        };

        if was_accepting {
            let in_flight = self.tracker.len();
            info!(in_flight, "Stopping parallel solver");
            self.telemetry
                .emit(TelemetryEvent::SolverStopped { in_flight });
        }
        self.shutdown.cancel();
        self.tracker.close();
        runtime
    }
}

/// Shuts down an owned runtime and joins its worker threads.
///
/// Blocking shutdown panics inside a runtime context, so from async code
/// it runs on a scoped thread that has none.
fn release_runtime(runtime: Runtime, config: &SolverConfig) {
    let timeout = config.shutdown_timeout;
    if Handle::try_current().is_ok() {
        std::thread::scope(|scope| {
            scope.spawn(move || runtime.shutdown_timeout(timeout));
        });
    } else {
        runtime.shutdown_timeout(timeout);
    }
}

impl Drop for ParallelSolver {
    fn drop(&mut self) {
        match self.begin_stop() {
            SolverRuntime::Owned(runtime) => {
                // Root tasks run on the owned runtime, not the caller's.
                futures::executor::block_on(self.tracker.wait());
                release_runtime(runtime, &self.config);
            }
            // Tasks on a foreign runtime were signalled and end on their own.
            SolverRuntime::Borrowed(_) | SolverRuntime::Released => {}
        }
    }
}

impl std::fmt::Debug for ParallelSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelSolver")
            .field("accepting", &self.is_accepting())
            .field("active_evaluations", &self.active_evaluations())
            .field("config", &self.config)
            .finish()
    }
}
