//! Single-threaded reference evaluator.
//!
//! Walks the tree recursively and ignores leaf delays. It exists to
//! cross-check the parallel solver, not to be fast.

use super::error::CircuitError;
use super::node::{CircuitNode, NodeKind};
use super::Circuit;

/// Reference solver that evaluates a circuit on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSolver;

impl SequentialSolver {
    /// Creates a new sequential solver.
    pub fn new() -> Self {
        Self
    }

    /// Evaluates the circuit, ignoring delays.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitError::Arity`] for a tree built with
    /// [`Circuit::new_unchecked`] that contains a malformed node.
    pub fn solve(&self, circuit: &Circuit) -> Result<bool, CircuitError> {
        circuit.root().validate()?;
        Ok(evaluate(circuit.root()))
    }
}

fn evaluate(node: &CircuitNode) -> bool {
    let args = node.args();
    let count_true = || args.iter().filter(|arg| evaluate(arg)).count();
    match node.kind() {
        NodeKind::Leaf { value, .. } => value,
        NodeKind::Not => !evaluate(&args[0]),
        NodeKind::And => args.iter().all(|arg| evaluate(arg)),
        NodeKind::Or => args.iter().any(|arg| evaluate(arg)),
        NodeKind::If => {
            if evaluate(&args[0]) {
                evaluate(&args[1])
            } else {
                evaluate(&args[2])
            }
        }
        NodeKind::GreaterThan(threshold) => count_true() > threshold,
        NodeKind::LessThan(threshold) => count_true() < threshold,
    }
}
