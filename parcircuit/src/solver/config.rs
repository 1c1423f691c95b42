//! Solver configuration.
//!
//! This module contains the [`SolverConfig`] struct and related constants
//! for configuring the parallel solver's worker runtime.

use crate::config::{clamp_worker_threads, num_cpus};
use std::time::Duration;

// =============================================================================
// Configuration Constants
// =============================================================================

/// Default name given to the solver's worker threads.
pub const DEFAULT_THREAD_NAME: &str = "parcircuit-worker";

/// Default time `stop()` waits for worker threads to exit.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Solver Configuration
// =============================================================================

/// Configuration for a [`super::ParallelSolver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Number of worker threads in an owned runtime.
    ///
    /// Ignored when the solver borrows an existing runtime.
    pub worker_threads: usize,

    /// Name of the worker threads in an owned runtime.
    pub thread_name: String,

    /// How long `stop()` waits for the owned runtime to shut down.
    pub shutdown_timeout: Duration,
}

impl SolverConfig {
    /// Sets the number of worker threads (at least one).
    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = clamp_worker_threads(worker_threads);
        self
    }

    /// Sets the worker thread name.
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = thread_name.into();
        self
    }

    /// Sets the runtime shutdown timeout.
    pub fn with_shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus(),
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}
