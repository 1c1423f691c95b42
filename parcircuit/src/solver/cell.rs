//! Single-publish result slot.
//!
//! A [`ResultCell`] is the write side of an evaluation handle. It wraps a
//! `watch` channel whose value starts at `Pending` and may be changed exactly
//! once. Readers hold the receiver; if the cell is dropped without publishing
//! (the owning task panicked or its runtime went away) readers observe
//! `Cancelled` instead of waiting forever.

use super::outcome::{EvaluationStatus, Outcome};
use tokio::sync::watch;

/// Write side of an evaluation result.
#[derive(Debug)]
pub(crate) struct ResultCell {
    tx: watch::Sender<EvaluationStatus>,
}

impl ResultCell {
    /// Creates an empty cell and the receiver readers will observe.
    pub(crate) fn new() -> (Self, watch::Receiver<EvaluationStatus>) {
        let (tx, rx) = watch::channel(EvaluationStatus::Pending);
        (Self { tx }, rx)
    }

    /// Publishes the outcome.
    ///
    /// Returns `false` if a value was already published, in which case the
    /// stored value is left untouched.
    pub(crate) fn publish(&self, outcome: Outcome) -> bool {
        self.tx.send_if_modified(|status| {
            if status.is_terminal() {
                return false;
            }
            *status = outcome.into();
            true
        })
    }
}

/// Reads the current status, treating a dropped writer as cancellation.
pub(crate) fn current_status(rx: &watch::Receiver<EvaluationStatus>) -> EvaluationStatus {
    let status = *rx.borrow();
    if !status.is_terminal() && rx.has_changed().is_err() {
        return EvaluationStatus::Cancelled;
    }
    status
}

/// Waits until the status is terminal and returns the outcome.
pub(crate) async fn wait_outcome(rx: &watch::Receiver<EvaluationStatus>) -> Outcome {
    let mut rx = rx.clone();
    let waited = rx.wait_for(EvaluationStatus::is_terminal).await.map(|status| *status);
    match waited {
        Ok(status) => status.outcome().unwrap_or(Outcome::Cancelled),
        // Writer dropped. It may still have published just before going away.
        Err(_) => rx.borrow().outcome().unwrap_or(Outcome::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_once() {
        let (cell, rx) = ResultCell::new();
        assert_eq!(current_status(&rx), EvaluationStatus::Pending);

        assert!(cell.publish(Outcome::Resolved(true)));
        assert!(!cell.publish(Outcome::Cancelled));
        assert!(!cell.publish(Outcome::Resolved(false)));
        assert_eq!(current_status(&rx), EvaluationStatus::Resolved(true));
    }

    #[test]
    fn test_dropped_writer_reads_cancelled() {
        let (cell, rx) = ResultCell::new();
        drop(cell);
        assert_eq!(current_status(&rx), EvaluationStatus::Cancelled);
    }

    #[test]
    fn test_published_value_survives_writer_drop() {
        let (cell, rx) = ResultCell::new();
        cell.publish(Outcome::Resolved(false));
        drop(cell);
        assert_eq!(current_status(&rx), EvaluationStatus::Resolved(false));
    }

    #[tokio::test]
    async fn test_wait_outcome_sees_later_publish() {
        let (cell, rx) = ResultCell::new();
        let reader = tokio::spawn(async move { wait_outcome(&rx).await });

        tokio::task::yield_now().await;
        cell.publish(Outcome::Resolved(true));

        assert_eq!(reader.await.unwrap(), Outcome::Resolved(true));
    }

    #[tokio::test]
    async fn test_wait_outcome_after_writer_drop() {
        let (cell, rx) = ResultCell::new();
        let reader = tokio::spawn(async move { wait_outcome(&rx).await });
        drop(cell);
        assert_eq!(reader.await.unwrap(), Outcome::Cancelled);
    }

    #[tokio::test]
    async fn test_many_readers_agree() {
        let (cell, rx) = ResultCell::new();
        let readers: Vec<_> = (0..8)
            .map(|_| {
                let rx = rx.clone();
                tokio::spawn(async move { wait_outcome(&rx).await })
            })
            .collect();

        cell.publish(Outcome::Resolved(false));
        for reader in readers {
            assert_eq!(reader.await.unwrap(), Outcome::Resolved(false));
        }
    }
}
