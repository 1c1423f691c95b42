//! Circuit node types.
//!
//! A circuit is an immutable tree of [`CircuitNode`]s. Each node carries a
//! [`NodeKind`] and an ordered list of arguments. Nodes are shared through
//! `Arc` so that concurrently running evaluations can hold on to the subtree
//! they work on without copying it.
//!
//! # Example
//!
//! ```
//! use parcircuit::circuit::CircuitNode;
//! use std::time::Duration;
//!
//! let node = CircuitNode::or([
//!     CircuitNode::leaf(false),
//!     CircuitNode::delayed_leaf(true, Duration::from_millis(20)),
//! ]);
//! assert_eq!(node.args().len(), 2);
//! assert_eq!(node.size(), 3);
//! ```

use super::error::CircuitError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Node Type
// =============================================================================

/// The gate (or leaf) tag of a node, without any payload.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum NodeType {
    /// Constant value, available after a delay.
    Leaf,
    /// Negation of a single argument.
    Not,
    /// Conjunction of one or more arguments.
    And,
    /// Disjunction of one or more arguments.
    Or,
    /// `condition ? when_true : when_false`.
    If,
    /// True iff more than `threshold` arguments are true.
    Gt,
    /// True iff fewer than `threshold` arguments are true.
    Lt,
}

impl NodeType {
    /// Returns the number of arguments a well-formed node of this type takes.
    pub fn arity(&self) -> Arity {
        match self {
            Self::Leaf => Arity::Exactly(0),
            Self::Not => Arity::Exactly(1),
            Self::If => Arity::Exactly(3),
            Self::And | Self::Or | Self::Gt | Self::Lt => Arity::AtLeast(1),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf => write!(f, "LEAF"),
            Self::Not => write!(f, "NOT"),
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::If => write!(f, "IF"),
            Self::Gt => write!(f, "GT"),
            Self::Lt => write!(f, "LT"),
        }
    }
}

/// Argument count constraint for a node type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exactly(usize),
    /// This many arguments or more.
    AtLeast(usize),
}

impl Arity {
    /// Returns true if `count` arguments satisfy this constraint.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {}", n),
            Self::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

// =============================================================================
// Node Kind
// =============================================================================

/// Node tag plus the per-kind payload (leaf value/delay, threshold).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeKind {
    /// A constant whose value becomes available after `delay`.
    Leaf { value: bool, delay: Duration },
    Not,
    And,
    Or,
    If,
    /// True iff the number of true arguments is greater than the threshold.
    GreaterThan(usize),
    /// True iff the number of true arguments is less than the threshold.
    LessThan(usize),
}

impl NodeKind {
    /// Returns the payload-free tag of this kind.
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Leaf { .. } => NodeType::Leaf,
            Self::Not => NodeType::Not,
            Self::And => NodeType::And,
            Self::Or => NodeType::Or,
            Self::If => NodeType::If,
            Self::GreaterThan(_) => NodeType::Gt,
            Self::LessThan(_) => NodeType::Lt,
        }
    }
}

// =============================================================================
// Circuit Node
// =============================================================================

/// An immutable circuit node.
///
/// Nodes are built bottom-up with the constructor helpers and never change
/// afterwards. The helpers do not check arity; that is the job of
/// [`CircuitNode::validate`] (called by [`super::Circuit::new`]).
///
/// Cloning is shallow: the clone shares its argument subtrees.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CircuitNode {
    kind: NodeKind,
    args: Vec<Arc<CircuitNode>>,
}

impl CircuitNode {
    /// Creates a node of the given kind without validating its arguments.
    pub fn with_args(kind: NodeKind, args: impl IntoIterator<Item = CircuitNode>) -> Self {
        Self {
            kind,
            args: args.into_iter().map(Arc::new).collect(),
        }
    }

    /// Creates a leaf that is available immediately.
    pub fn leaf(value: bool) -> Self {
        Self::delayed_leaf(value, Duration::ZERO)
    }

    /// Creates a leaf whose value becomes available after `delay`.
    pub fn delayed_leaf(value: bool, delay: Duration) -> Self {
        Self {
            kind: NodeKind::Leaf { value, delay },
            args: Vec::new(),
        }
    }

    /// Creates a NOT gate.
    pub fn not(arg: CircuitNode) -> Self {
        Self::with_args(NodeKind::Not, [arg])
    }

    /// Creates an AND gate.
    pub fn and(args: impl IntoIterator<Item = CircuitNode>) -> Self {
        Self::with_args(NodeKind::And, args)
    }

    /// Creates an OR gate.
    pub fn or(args: impl IntoIterator<Item = CircuitNode>) -> Self {
        Self::with_args(NodeKind::Or, args)
    }

    /// Creates an IF gate with the fixed `condition, when_true, when_false` roles.
    pub fn if_then_else(
        condition: CircuitNode,
        when_true: CircuitNode,
        when_false: CircuitNode,
    ) -> Self {
        Self::with_args(NodeKind::If, [condition, when_true, when_false])
    }

    /// Creates a GT(threshold) gate.
    pub fn gt(threshold: usize, args: impl IntoIterator<Item = CircuitNode>) -> Self {
        Self::with_args(NodeKind::GreaterThan(threshold), args)
    }

    /// Creates an LT(threshold) gate.
    pub fn lt(threshold: usize, args: impl IntoIterator<Item = CircuitNode>) -> Self {
        Self::with_args(NodeKind::LessThan(threshold), args)
    }

    /// Returns the node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the node type tag.
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Returns the node's arguments in insertion order.
    pub fn args(&self) -> &[Arc<CircuitNode>] {
        &self.args
    }

    /// Returns the threshold of a GT/LT node.
    pub fn threshold(&self) -> Option<usize> {
        match self.kind {
            NodeKind::GreaterThan(t) | NodeKind::LessThan(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the value of a leaf node.
    pub fn leaf_value(&self) -> Option<bool> {
        match self.kind {
            NodeKind::Leaf { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns the delay of a leaf node (zero for gates).
    pub fn delay(&self) -> Duration {
        match self.kind {
            NodeKind::Leaf { delay, .. } => delay,
            _ => Duration::ZERO,
        }
    }

    /// Returns the total number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.args.iter().map(|arg| arg.size()).sum::<usize>()
    }

    /// Returns the height of this subtree (a lone leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.args.iter().map(|arg| arg.depth()).max().unwrap_or(0)
    }

    /// Checks the argument count of this node only.
    pub fn check_arity(&self) -> Result<(), CircuitError> {
        let node_type = self.node_type();
        let expected = node_type.arity();
        if expected.accepts(self.args.len()) {
            Ok(())
        } else {
            Err(CircuitError::Arity {
                node_type,
                expected,
                found: self.args.len(),
            })
        }
    }

    /// Checks the argument count of every node in this subtree.
    pub fn validate(&self) -> Result<(), CircuitError> {
        self.check_arity()?;
        self.args.iter().try_for_each(|arg| arg.validate())
    }
}

impl fmt::Display for CircuitNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Leaf { value, delay } => {
                write!(f, "{}", value)?;
                if !delay.is_zero() {
                    write!(f, "@{}", DisplayDelay(delay))?;
                }
                Ok(())
            }
            kind => {
                write!(f, "{}(", kind.node_type())?;
                let mut first = true;
                if let Some(threshold) = self.threshold() {
                    write!(f, "{}", threshold)?;
                    first = false;
                }
                for arg in &self.args {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                    first = false;
                }
                write!(f, ")")
            }
        }
    }
}

/// Formats a delay in the largest unit that represents it exactly.
struct DisplayDelay(Duration);

impl fmt::Display for DisplayDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let micros = self.0.as_micros();
        if micros % 1_000_000 == 0 {
            write!(f, "{}s", micros / 1_000_000)
        } else if micros % 1_000 == 0 {
            write!(f, "{}ms", micros / 1_000)
        } else {
            write!(f, "{}us", micros)
        }
    }
}
