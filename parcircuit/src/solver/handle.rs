//! Evaluation handle returned by the solver.
//!
//! A [`CircuitValue`] is handed out as soon as a circuit is submitted. It
//! can be queried without waiting, awaited from async code, read with a
//! blocking call from ordinary threads, or used to cancel its own
//! evaluation.
//!
//! # Example
//!
//! ```ignore
//! let value = solver.solve(&circuit);
//!
//! // Check status without waiting
//! if value.status() == EvaluationStatus::Pending {
//!     println!("still running");
//! }
//!
//! // Block until the result is published
//! match value.get_value() {
//!     Ok(result) => println!("{}", result),
//!     Err(SolveError::Cancelled) => println!("cancelled"),
//! }
//! ```

use super::cell;
use super::error::SolveError;
use super::outcome::{EvaluationStatus, Outcome};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Global counter for generating evaluation IDs.
static EVALUATION_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique identifier of one submitted circuit evaluation.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct EvaluationId(u64);

impl EvaluationId {
    /// Returns a fresh, process-unique ID.
    pub fn next() -> Self {
        Self(EVALUATION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the numeric value of this ID.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eval-{}", self.0)
    }
}

/// Handle to a submitted circuit.
///
/// Cloneable; all clones observe the same single published value. Once the
/// handle has left `Pending` its status never changes again, including after
/// the solver is stopped.
#[derive(Clone)]
pub struct CircuitValue {
    id: EvaluationId,
    status_rx: watch::Receiver<EvaluationStatus>,
    cancellation: CancellationToken,
}

impl CircuitValue {
    pub(crate) fn new(
        id: EvaluationId,
        status_rx: watch::Receiver<EvaluationStatus>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            id,
            status_rx,
            cancellation,
        }
    }

    /// Returns the evaluation's identifier.
    pub fn id(&self) -> EvaluationId {
        self.id
    }

    /// Returns the current status without waiting.
    pub fn status(&self) -> EvaluationStatus {
        cell::current_status(&self.status_rx)
    }

    /// Returns true once a value (not a cancellation) has been published.
    pub fn is_resolved(&self) -> bool {
        matches!(self.status(), EvaluationStatus::Resolved(_))
    }

    /// Waits for the evaluation to finish.
    pub async fn outcome(&self) -> Outcome {
        cell::wait_outcome(&self.status_rx).await
    }

    /// Waits for the evaluation to finish and returns its value.
    pub async fn value(&self) -> Result<bool, SolveError> {
        self.outcome().await.value().ok_or(SolveError::Cancelled)
    }

    /// Blocks the calling thread until the evaluation finishes.
    ///
    /// Must not be called from a task running on the solver's own runtime
    /// with a single worker; use [`CircuitValue::value`] in async code.
    pub fn get_value(&self) -> Result<bool, SolveError> {
        futures::executor::block_on(self.value())
    }

    /// Requests cancellation of this evaluation.
    ///
    /// Has no effect if the value was already published.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }
}

impl fmt::Debug for CircuitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitValue")
            .field("id", &self.id)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::cell::ResultCell;

    fn value_with_cell() -> (CircuitValue, ResultCell) {
        let (cell, rx) = ResultCell::new();
        let value = CircuitValue::new(EvaluationId::next(), rx, CancellationToken::new());
        (value, cell)
    }

    #[test]
    fn test_evaluation_ids_are_unique() {
        let a = EvaluationId::next();
        let b = EvaluationId::next();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
        assert!(a.to_string().starts_with("eval-"));
    }

    #[test]
    fn test_get_value_after_publish() {
        let (value, cell) = value_with_cell();
        assert_eq!(value.status(), EvaluationStatus::Pending);
        assert!(!value.is_resolved());

        cell.publish(Outcome::Resolved(true));
        assert!(value.is_resolved());
        assert_eq!(value.get_value(), Ok(true));
        assert_eq!(value.get_value(), Ok(true));
    }

    #[test]
    fn test_cancelled_value_is_error() {
        let (value, cell) = value_with_cell();
        cell.publish(Outcome::Cancelled);
        assert_eq!(value.get_value(), Err(SolveError::Cancelled));
        assert!(!value.is_resolved());
    }

    #[test]
    fn test_clones_share_result() {
        let (value, cell) = value_with_cell();
        let clone = value.clone();
        cell.publish(Outcome::Resolved(false));
        assert_eq!(value.get_value(), Ok(false));
        assert_eq!(clone.get_value(), Ok(false));
        assert_eq!(clone.id(), value.id());
    }

    #[test]
    fn test_cancel_triggers_token() {
        let token = CancellationToken::new();
        let (_cell, rx) = ResultCell::new();
        let value = CircuitValue::new(EvaluationId::next(), rx, token.clone());
        value.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_value_waits_for_publish() {
        let (value, cell) = value_with_cell();
        let waiter = tokio::spawn(async move { value.value().await });
        tokio::task::yield_now().await;
        cell.publish(Outcome::Resolved(true));
        assert_eq!(waiter.await.unwrap(), Ok(true));
    }

    #[test]
    fn test_debug_includes_status() {
        let (value, _cell) = value_with_cell();
        let debug = format!("{:?}", value);
        assert!(debug.contains("CircuitValue"));
        assert!(debug.contains("Pending"));
    }
}
