//! Recursive node evaluator.
//!
//! [`evaluate`] turns one circuit node into one task-sized future. Gates fan
//! out to their children through [`TaskGroup`] or [`ChildTask`] and apply
//! their short-circuit rule as outcomes arrive:
//!
//! | Gate     | Decides `true`                  | Decides `false`                  |
//! |----------|---------------------------------|----------------------------------|
//! | `AND`    | every child true                | any child false                  |
//! | `OR`     | any child true                  | every child false                |
//! | `GT(t)`  | trues > t                       | trues + pending <= t             |
//! | `LT(t)`  | trues + pending < t             | trues >= t                       |
//!
//! Every wait is raced against the node's cancellation token. Whatever the
//! outcome, a gate cancels and drains its children before it returns, so a
//! parent never sees a result while work below it is still running.
//!
//! A child that ends `Cancelled` without the gate having asked for it makes
//! the gate `Cancelled` too; that is how internal faults travel upwards.

use super::context::EvalContext;
use super::group::{ChildTask, TaskGroup};
use super::outcome::Outcome;
use crate::circuit::{CircuitNode, NodeKind};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Evaluates `node` and every node below it.
pub(crate) fn evaluate(node: Arc<CircuitNode>, ctx: EvalContext) -> BoxFuture<'static, Outcome> {
    async move {
        let outcome = match node.check_arity() {
            Ok(()) => evaluate_checked(&node, &ctx).await,
            Err(err) => {
                warn!(
                    evaluation = %ctx.evaluation(),
                    depth = ctx.depth(),
                    error = %err,
                    "Malformed node, cancelling its subtree"
                );
                Outcome::Cancelled
            }
        };
        ctx.report(node.node_type(), outcome);
        outcome
    }
    .boxed()
}

async fn evaluate_checked(node: &CircuitNode, ctx: &EvalContext) -> Outcome {
    match node.kind() {
        NodeKind::Leaf { value, delay } => evaluate_leaf(value, delay, ctx).await,
        NodeKind::Not => evaluate_not(node, ctx).await,
        NodeKind::If => evaluate_if(node, ctx).await,
        NodeKind::And => evaluate_aggregate(node, Aggregate::And, ctx).await,
        NodeKind::Or => evaluate_aggregate(node, Aggregate::Or, ctx).await,
        NodeKind::GreaterThan(t) => evaluate_aggregate(node, Aggregate::GreaterThan(t), ctx).await,
        NodeKind::LessThan(t) => evaluate_aggregate(node, Aggregate::LessThan(t), ctx).await,
    }
}

async fn evaluate_leaf(value: bool, delay: Duration, ctx: &EvalContext) -> Outcome {
    if !delay.is_zero() && ctx.guard(tokio::time::sleep(delay)).await.is_none() {
        return Outcome::Cancelled;
    }
    if ctx.is_cancelled() {
        return Outcome::Cancelled;
    }
    Outcome::Resolved(value)
}

async fn evaluate_not(node: &CircuitNode, ctx: &EvalContext) -> Outcome {
    let mut child = ChildTask::spawn(Arc::clone(&node.args()[0]), ctx);
    let outcome = match ctx.guard(child.join()).await {
        Some(Outcome::Resolved(value)) => Outcome::Resolved(!value),
        Some(Outcome::Cancelled) | None => Outcome::Cancelled,
    };
    child.cancel_and_join().await;
    outcome
}

async fn evaluate_if(node: &CircuitNode, ctx: &EvalContext) -> Outcome {
    let args = node.args();
    // Both branches start with the condition to overlap their latency.
    let mut condition = ChildTask::spawn(Arc::clone(&args[0]), ctx);
    let mut when_true = ChildTask::spawn(Arc::clone(&args[1]), ctx);
    let mut when_false = ChildTask::spawn(Arc::clone(&args[2]), ctx);

    let outcome = match ctx.guard(condition.join()).await {
        Some(Outcome::Resolved(selector)) => {
            let (chosen, unchosen) = if selector {
                (&mut when_true, &when_false)
            } else {
                (&mut when_false, &when_true)
            };
            let pending = usize::from(!unchosen.is_finished());
            unchosen.cancel();
            ctx.report_short_circuit(node.node_type(), pending);
            ctx.guard(chosen.join()).await.unwrap_or(Outcome::Cancelled)
        }
        Some(Outcome::Cancelled) | None => Outcome::Cancelled,
    };

    condition.cancel_and_join().await;
    when_true.cancel_and_join().await;
    when_false.cancel_and_join().await;
    outcome
}

async fn evaluate_aggregate(node: &CircuitNode, rule: Aggregate, ctx: &EvalContext) -> Outcome {
    let total = node.args().len();
    if let Some(value) = rule.decide(0, 0, total) {
        return Outcome::Resolved(value);
    }

    let mut group = TaskGroup::new(ctx);
    for arg in node.args() {
        group.submit(Arc::clone(arg));
    }

    let (mut trues, mut falses) = (0, 0);
    let outcome = loop {
        match ctx.guard(group.next()).await {
            Some(Some(Outcome::Resolved(true))) => trues += 1,
            Some(Some(Outcome::Resolved(false))) => falses += 1,
            // Cancelled from above, or a child failed on its own.
            Some(Some(Outcome::Cancelled)) | Some(None) | None => break Outcome::Cancelled,
        }
        if let Some(value) = rule.decide(trues, falses, total) {
            ctx.report_short_circuit(node.node_type(), group.len());
            break Outcome::Resolved(value);
        }
    };

    group.cancel_all().await;
    outcome
}

// =============================================================================
// Aggregation Rules
// =============================================================================

/// Short-circuit rule of a multi-child gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Aggregate {
    And,
    Or,
    GreaterThan(usize),
    LessThan(usize),
}

impl Aggregate {
    /// Returns the gate value if it is already determined.
    ///
    /// `trues` and `falses` count the children seen so far out of `total`.
    pub(crate) fn decide(self, trues: usize, falses: usize, total: usize) -> Option<bool> {
        let pending = total.saturating_sub(trues + falses);
        match self {
            Self::And if falses > 0 => Some(false),
            Self::And if pending == 0 => Some(true),
            Self::Or if trues > 0 => Some(true),
            Self::Or if pending == 0 => Some(false),
            Self::GreaterThan(t) if trues > t => Some(true),
            Self::GreaterThan(t) if trues + pending <= t => Some(false),
            Self::LessThan(t) if trues >= t => Some(false),
            Self::LessThan(t) if trues + pending < t => Some(true),
            _ => None,
        }
    }
}
