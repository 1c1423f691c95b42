//! Circuit model.
//!
//! Pure data: an immutable tree of gates and leaves plus structural queries.
//! The parallel evaluator lives in [`crate::solver`]; this module only knows
//! how to build, validate, print and parse circuits, and how to evaluate one
//! sequentially for cross-checking.
//!
//! # Example
//!
//! ```
//! use parcircuit::circuit::{Circuit, CircuitNode, SequentialSolver};
//!
//! let circuit: Circuit = "IF(GT(1, true, true), AND(true, true), OR(false, false))"
//!     .parse()
//!     .unwrap();
//! assert_eq!(SequentialSolver::new().solve(&circuit), Ok(true));
//!
//! let built = Circuit::new(CircuitNode::not(CircuitNode::leaf(false))).unwrap();
//! assert_eq!(built.to_string(), "NOT(false)");
//! ```

mod error;
mod node;
mod parser;
mod sequential;

pub use error::CircuitError;
pub use node::{Arity, CircuitNode, NodeKind, NodeType};
pub use parser::MAX_NESTING_DEPTH;
pub use sequential::SequentialSolver;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A complete circuit: a shared handle to its root node.
///
/// Cloning a circuit is cheap and never copies the tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Circuit {
    root: Arc<CircuitNode>,
}

impl Circuit {
    /// Creates a circuit after checking the arity of every node.
    pub fn new(root: CircuitNode) -> Result<Self, CircuitError> {
        root.validate()?;
        Ok(Self::new_unchecked(root))
    }

    /// Creates a circuit without validation.
    ///
    /// Malformed nodes are reported by the parallel solver as a cancelled
    /// evaluation of the affected subtree.
    pub fn new_unchecked(root: CircuitNode) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// Returns the root node.
    pub fn root(&self) -> &Arc<CircuitNode> {
        &self.root
    }

    /// Returns the number of nodes in the circuit.
    pub fn size(&self) -> usize {
        self.root.size()
    }

    /// Returns the height of the circuit.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl FromStr for Circuit {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(parser::parse_node(s)?)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl From<Circuit> for Arc<CircuitNode> {
    fn from(circuit: Circuit) -> Self {
        circuit.root
    }
}
