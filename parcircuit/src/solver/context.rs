//! Per-node evaluation context.
//!
//! Every node task receives an [`EvalContext`] carrying the evaluation it
//! belongs to, its own cancellation token, the telemetry sink and its depth
//! in the tree. Contexts for children are derived with
//! [`EvalContext::child`], so cancelling a node's token reaches its whole
//! subtree.

use super::handle::EvaluationId;
use super::outcome::Outcome;
use super::telemetry::{TelemetryEvent, TelemetrySink};
use crate::circuit::NodeType;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Execution context passed to each node evaluation.
#[derive(Clone)]
pub(crate) struct EvalContext {
    evaluation: EvaluationId,
    cancellation: CancellationToken,
    telemetry: Arc<dyn TelemetrySink>,
    depth: usize,
}

impl EvalContext {
    /// Creates the context for the root of an evaluation.
    pub(crate) fn root(
        evaluation: EvaluationId,
        cancellation: CancellationToken,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            evaluation,
            cancellation,
            telemetry,
            depth: 0,
        }
    }

    /// Creates the context for a child node one level deeper.
    pub(crate) fn child(&self, cancellation: CancellationToken) -> Self {
        Self {
            evaluation: self.evaluation,
            cancellation,
            telemetry: Arc::clone(&self.telemetry),
            depth: self.depth + 1,
        }
    }

    pub(crate) fn evaluation(&self) -> EvaluationId {
        self.evaluation
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Races `fut` against this node's cancellation.
    ///
    /// Returns `None` if the node was cancelled first. Cancellation wins ties.
    pub(crate) async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => None,
            output = fut => Some(output),
        }
    }

    pub(crate) fn emit(&self, event: TelemetryEvent) {
        self.telemetry.emit(event);
    }

    /// Emits the resolved/cancelled event for a finished node.
    pub(crate) fn report(&self, node_type: NodeType, outcome: Outcome) {
        let event = match outcome {
            Outcome::Resolved(value) => TelemetryEvent::NodeResolved {
                evaluation: self.evaluation,
                node_type,
                depth: self.depth,
                value,
            },
            Outcome::Cancelled => TelemetryEvent::NodeCancelled {
                evaluation: self.evaluation,
                node_type,
                depth: self.depth,
            },
        };
        self.emit(event);
    }

    /// Emits a short-circuit event if any children were still running.
    pub(crate) fn report_short_circuit(&self, node_type: NodeType, pending: usize) {
        if pending == 0 {
            return;
        }
        tracing::debug!(
            evaluation = %self.evaluation,
            node = %node_type,
            depth = self.depth,
            pending,
            "Gate decided early, cancelling remaining children"
        );
        self.emit(TelemetryEvent::ShortCircuited {
            evaluation: self.evaluation,
            node_type,
            depth: self.depth,
            pending,
        });
    }
}
