//! Cancellation-aware fan-out primitives.
//!
//! [`TaskGroup`] runs a batch of sibling node evaluations and yields their
//! outcomes in completion order. [`ChildTask`] is the single-child variant
//! used where the identity of the child matters (NOT and IF).
//!
//! Both own the tasks they spawn. Before the owner reports its own outcome
//! it calls [`TaskGroup::cancel_all`] / [`ChildTask::cancel_and_join`],
//! which signal the children and then wait until every one of them has
//! finished, so no child task outlives its parent.

use super::context::EvalContext;
use super::evaluator::evaluate;
use super::outcome::Outcome;
use crate::circuit::CircuitNode;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Maps a failed join to a cancellation outcome.
fn join_failure(err: JoinError) -> Outcome {
    if err.is_panic() {
        warn!(error = %err, "Node evaluation panicked, treating as cancelled");
    }
    Outcome::Cancelled
}

// =============================================================================
// Task Group
// =============================================================================

/// A dynamically-sized group of concurrently evaluated sibling nodes.
pub(crate) struct TaskGroup {
    tasks: JoinSet<Outcome>,
    cancellation: CancellationToken,
    ctx: EvalContext,
}

impl TaskGroup {
    /// Creates an empty group whose members are cancelled with `ctx`.
    pub(crate) fn new(ctx: &EvalContext) -> Self {
        Self {
            tasks: JoinSet::new(),
            cancellation: ctx.cancellation().child_token(),
            ctx: ctx.clone(),
        }
    }

    /// Starts evaluating `node` as a new member. Does not wait.
    pub(crate) fn submit(&mut self, node: Arc<CircuitNode>) {
        let ctx = self.ctx.child(self.cancellation.child_token());
        self.tasks.spawn(evaluate(node, ctx));
    }

    /// Waits for the next member to finish.
    ///
    /// Returns `None` once every submitted member has been consumed. A member
    /// that panicked or was aborted yields `Cancelled`.
    pub(crate) async fn next(&mut self) -> Option<Outcome> {
        let joined = self.tasks.join_next().await?;
        Some(joined.unwrap_or_else(join_failure))
    }

    /// Number of members not yet consumed by [`TaskGroup::next`].
    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Signals every running member to stop and waits until all have ended.
    ///
    /// Idempotent: once the group is drained further calls return at once.
    pub(crate) async fn cancel_all(&mut self) {
        self.cancellation.cancel();
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(err) = joined {
                join_failure(err);
            }
        }
    }
}

// =============================================================================
// Child Task
// =============================================================================

/// A single spawned child evaluation with its own cancellation token.
pub(crate) struct ChildTask {
    handle: Option<JoinHandle<Outcome>>,
    cancellation: CancellationToken,
}

impl ChildTask {
    /// Spawns the evaluation of `node` as a child of `ctx`.
    pub(crate) fn spawn(node: Arc<CircuitNode>, ctx: &EvalContext) -> Self {
        let cancellation = ctx.cancellation().child_token();
        let handle = tokio::spawn(evaluate(node, ctx.child(cancellation.clone())));
        Self {
            handle: Some(handle),
            cancellation,
        }
    }

    /// Waits for the child's outcome.
    ///
    /// Cancel-safe: if the returned future is dropped early the child is
    /// still owned and can be joined later. After the outcome has been
    /// taken, further calls return `Cancelled`.
    pub(crate) async fn join(&mut self) -> Outcome {
        let Some(handle) = self.handle.as_mut() else {
            return Outcome::Cancelled;
        };
        let joined = handle.await;
        self.handle = None;
        joined.unwrap_or_else(join_failure)
    }

    /// Signals the child to stop without waiting.
    pub(crate) fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Returns true if the child has ended or was already joined.
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signals the child and waits until it has ended.
    pub(crate) async fn cancel_and_join(&mut self) {
        self.cancel();
        self.join().await;
    }
}

impl Drop for ChildTask {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            self.cancellation.cancel();
            handle.abort();
        }
    }
}
