//! Telemetry for solver observability.
//!
//! The solver and every node evaluation emit structured events through a
//! [`TelemetrySink`]. The solver does not decide how events are presented:
//! sinks may log them, count them, or record them for tests.
//!
//! # Example
//!
//! ```ignore
//! use parcircuit::solver::{TelemetryEvent, TelemetrySink};
//!
//! struct LoggingSink;
//!
//! impl TelemetrySink for LoggingSink {
//!     fn emit(&self, event: TelemetryEvent) {
//!         tracing::info!(?event, "Solver event");
//!     }
//! }
//! ```

use super::handle::EvaluationId;
use super::outcome::Outcome;
use crate::circuit::NodeType;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Telemetry Events
// =============================================================================

/// Events emitted while solving circuits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelemetryEvent {
    // -------------------------------------------------------------------------
    // Evaluation Lifecycle Events
    // -------------------------------------------------------------------------
    /// A circuit was accepted for evaluation.
    EvaluationSubmitted {
        evaluation: EvaluationId,
        nodes: usize,
    },

    /// A circuit was submitted after the solver stopped.
    EvaluationRejected { evaluation: EvaluationId },

    /// The root of an evaluation published its outcome.
    EvaluationFinished {
        evaluation: EvaluationId,
        outcome: Outcome,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Node Events
    // -------------------------------------------------------------------------
    /// A node resolved to a value.
    NodeResolved {
        evaluation: EvaluationId,
        node_type: NodeType,
        depth: usize,
        value: bool,
    },

    /// A node ended without a value.
    NodeCancelled {
        evaluation: EvaluationId,
        node_type: NodeType,
        depth: usize,
    },

    /// A gate decided its value while some children were still running.
    ShortCircuited {
        evaluation: EvaluationId,
        node_type: NodeType,
        depth: usize,
        pending: usize,
    },

    // -------------------------------------------------------------------------
    // Solver Events
    // -------------------------------------------------------------------------
    /// The solver stopped accepting work.
    SolverStopped { in_flight: usize },
}

impl TelemetryEvent {
    /// Returns the evaluation this event belongs to, if any.
    pub fn evaluation(&self) -> Option<EvaluationId> {
        match self {
            Self::EvaluationSubmitted { evaluation, .. }
            | Self::EvaluationRejected { evaluation }
            | Self::EvaluationFinished { evaluation, .. }
            | Self::NodeResolved { evaluation, .. }
            | Self::NodeCancelled { evaluation, .. }
            | Self::ShortCircuited { evaluation, .. } => Some(*evaluation),
            Self::SolverStopped { .. } => None,
        }
    }

    /// Returns a short name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::EvaluationSubmitted { .. } => "evaluation_submitted",
            Self::EvaluationRejected { .. } => "evaluation_rejected",
            Self::EvaluationFinished { .. } => "evaluation_finished",
            Self::NodeResolved { .. } => "node_resolved",
            Self::NodeCancelled { .. } => "node_cancelled",
            Self::ShortCircuited { .. } => "short_circuited",
            Self::SolverStopped { .. } => "solver_stopped",
        }
    }
}

// =============================================================================
// Telemetry Sink Trait
// =============================================================================

/// Sink for telemetry events.
///
/// Events are emitted from many tasks at once, so implementations must be
/// thread-safe. `emit` is called on the evaluation hot path and should not
/// block.
pub trait TelemetrySink: Send + Sync {
    /// Called when a telemetry event occurs.
    fn emit(&self, event: TelemetryEvent);
}

// =============================================================================
// Built-in Sink Implementations
// =============================================================================

/// No-op sink for when telemetry is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn emit(&self, _event: TelemetryEvent) {}
}

/// Sink that logs events using the `tracing` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn emit(&self, event: TelemetryEvent) {
        match &event {
            TelemetryEvent::EvaluationSubmitted { evaluation, nodes } => {
                tracing::debug!(evaluation = %evaluation, nodes = nodes, "Evaluation submitted");
            }
            TelemetryEvent::EvaluationRejected { evaluation } => {
                tracing::debug!(evaluation = %evaluation, "Evaluation rejected, solver stopped");
            }
            TelemetryEvent::EvaluationFinished {
                evaluation,
                outcome,
                duration,
            } => {
                tracing::debug!(
                    evaluation = %evaluation,
                    outcome = %outcome,
                    duration_ms = duration.as_millis(),
                    "Evaluation finished"
                );
            }
            TelemetryEvent::NodeResolved {
                evaluation,
                node_type,
                depth,
                value,
            } => {
                tracing::trace!(
                    evaluation = %evaluation,
                    node = %node_type,
                    depth = depth,
                    value = value,
                    "Node resolved"
                );
            }
            TelemetryEvent::NodeCancelled {
                evaluation,
                node_type,
                depth,
            } => {
                tracing::trace!(
                    evaluation = %evaluation,
                    node = %node_type,
                    depth = depth,
                    "Node cancelled"
                );
            }
            TelemetryEvent::ShortCircuited {
                evaluation,
                node_type,
                depth,
                pending,
            } => {
                tracing::trace!(
                    evaluation = %evaluation,
                    node = %node_type,
                    depth = depth,
                    pending = pending,
                    "Short-circuited"
                );
            }
            TelemetryEvent::SolverStopped { in_flight } => {
                tracing::debug!(in_flight = in_flight, "Solver stopped");
            }
        }
    }
}

/// Sink that forwards events to multiple sinks.
pub struct MultiplexTelemetrySink {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl MultiplexTelemetrySink {
    /// Creates a new multiplex sink with the given sinks.
    pub fn new(sinks: Vec<Arc<dyn TelemetrySink>>) -> Self {
        Self { sinks }
    }

    /// Adds a sink to the multiplex.
    pub fn add_sink(&mut self, sink: Arc<dyn TelemetrySink>) {
        self.sinks.push(sink);
    }
}

impl TelemetrySink for MultiplexTelemetrySink {
    fn emit(&self, event: TelemetryEvent) {
        for sink in &self.sinks {
            sink.emit(event.clone());
        }
    }
}

impl std::fmt::Debug for MultiplexTelemetrySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiplexTelemetrySink")
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}
