//! Circuit construction errors.

use super::node::{Arity, NodeType};
use thiserror::Error;

/// Errors produced while building or parsing a circuit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CircuitError {
    /// A node has the wrong number of arguments for its type.
    #[error("{node_type} node expects {expected} argument(s), found {found}")]
    Arity {
        node_type: NodeType,
        expected: Arity,
        found: usize,
    },

    /// The textual circuit description could not be parsed.
    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },
}
