//! Text format for circuits.
//!
//! ```text
//! expr   := leaf | gate
//! leaf   := ("true" | "false") ["@" INT ("us" | "ms" | "s")]
//! gate   := ("NOT" | "AND" | "OR" | "IF") "(" args ")"
//!         | ("GT" | "LT") "(" INT ["," args] ")"
//! args   := expr ("," expr)*
//! ```
//!
//! Keywords are case-insensitive and whitespace is allowed between tokens.
//! The parser does not check arity; `Circuit::from_str` validates afterwards
//! so that arity errors are reported the same way as for hand-built trees.
//! Gates nested deeper than [`MAX_NESTING_DEPTH`] are rejected.

use super::error::CircuitError;
use super::node::{CircuitNode, NodeKind};
use std::time::Duration;

/// Maximum number of gates enclosing any node in parsed text.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parses a single node expression covering the whole input.
pub(super) fn parse_node(input: &str) -> Result<CircuitNode, CircuitError> {
    let mut parser = Parser {
        input: input.as_bytes(),
        pos: 0,
        nesting: 0,
    };
    let node = parser.expr()?;
    parser.skip_ws();
    if parser.pos != parser.input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(node)
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    nesting: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b) if b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> CircuitError {
        CircuitError::Parse {
            position: self.pos,
            message: message.into(),
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), CircuitError> {
        self.skip_ws();
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }

    /// Reads an ASCII alphabetic run, lowercased.
    fn word(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).to_ascii_lowercase()
    }

    fn number(&mut self) -> Result<u64, CircuitError> {
        self.skip_ws();
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(b - b'0')))
                .ok_or_else(|| self.error("number too large"))?;
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a number"));
        }
        Ok(value)
    }

    fn expr(&mut self) -> Result<CircuitNode, CircuitError> {
        self.skip_ws();
        let start = self.pos;
        let word = self.word();
        let kind = match word.as_str() {
            "true" => return self.leaf(true),
            "false" => return self.leaf(false),
            "not" => NodeKind::Not,
            "and" => NodeKind::And,
            "or" => NodeKind::Or,
            "if" => NodeKind::If,
            "gt" => NodeKind::GreaterThan(0),
            "lt" => NodeKind::LessThan(0),
            "" => return Err(self.error("expected a leaf or a gate")),
            other => {
                return Err(CircuitError::Parse {
                    position: start,
                    message: format!("unknown gate '{}'", other),
                })
            }
        };
        self.gate(kind)
    }

    fn leaf(&mut self, value: bool) -> Result<CircuitNode, CircuitError> {
        self.skip_ws();
        if self.peek() != Some(b'@') {
            return Ok(CircuitNode::leaf(value));
        }
        self.pos += 1;
        let amount = self.number()?;
        self.skip_ws();
        let delay = match self.word().as_str() {
            "us" => Duration::from_micros(amount),
            "ms" => Duration::from_millis(amount),
            "s" => Duration::from_secs(amount),
            "" => return Err(self.error("missing delay unit (us, ms or s)")),
            other => return Err(self.error(format!("unknown delay unit '{}'", other))),
        };
        Ok(CircuitNode::delayed_leaf(value, delay))
    }

    fn gate(&mut self, kind: NodeKind) -> Result<CircuitNode, CircuitError> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(self.error(format!("gates nested deeper than {}", MAX_NESTING_DEPTH)));
        }
        self.nesting += 1;
        let node = self.gate_body(kind);
        self.nesting -= 1;
        node
    }

    fn gate_body(&mut self, kind: NodeKind) -> Result<CircuitNode, CircuitError> {
        self.expect(b'(')?;
        let kind = match kind {
            NodeKind::GreaterThan(_) => NodeKind::GreaterThan(self.threshold()?),
            NodeKind::LessThan(_) => NodeKind::LessThan(self.threshold()?),
            other => other,
        };
        let has_threshold = matches!(kind, NodeKind::GreaterThan(_) | NodeKind::LessThan(_));

        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(CircuitNode::with_args(kind, args));
        }
        if has_threshold {
            self.expect(b',')?;
        }
        loop {
            args.push(self.expr()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error("expected ',' or ')'")),
            }
        }
        Ok(CircuitNode::with_args(kind, args))
    }

    fn threshold(&mut self) -> Result<usize, CircuitError> {
        let value = self.number()?;
        usize::try_from(value).map_err(|_| self.error("threshold too large"))
    }
}
