//! Evaluation outcomes and handle status.

use std::fmt;

/// Terminal result of evaluating one node.
///
/// Cancellation travels through the same channels as values, so a caller
/// cannot read a result without deciding what to do about cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The node evaluated to this value.
    Resolved(bool),
    /// The node was cancelled, or a fault occurred somewhere in its subtree.
    Cancelled,
}

impl Outcome {
    /// Returns the resolved value, if any.
    pub fn value(self) -> Option<bool> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Cancelled => None,
        }
    }

    /// Returns true if this outcome is a cancellation.
    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(value) => write!(f, "{}", value),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Observable state of an evaluation handle.
///
/// `Pending` moves to exactly one of the terminal states and never changes
/// again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EvaluationStatus {
    /// Evaluation still in progress.
    #[default]
    Pending,
    /// Evaluation finished with a value.
    Resolved(bool),
    /// Evaluation was cancelled.
    Cancelled,
}

impl EvaluationStatus {
    /// Returns true for `Resolved` and `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Converts a terminal status into an outcome.
    pub fn outcome(&self) -> Option<Outcome> {
        match *self {
            Self::Pending => None,
            Self::Resolved(value) => Some(Outcome::Resolved(value)),
            Self::Cancelled => Some(Outcome::Cancelled),
        }
    }
}

impl From<Outcome> for EvaluationStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Resolved(value) => Self::Resolved(value),
            Outcome::Cancelled => Self::Cancelled,
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Resolved(value) => write!(f, "Resolved({})", value),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}
