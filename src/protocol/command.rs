//! Command definitions
//!
//! Represents validated requests from clients.

use std::fmt;
use std::str::FromStr;

use super::DecodeError;

/// Arithmetic operations understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    /// All operations, in wire order
    pub const ALL: [Operation; 4] = [Operation::Add, Operation::Sub, Operation::Mul, Operation::Div];

    /// Upper-case name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Sub => "SUB",
            Operation::Mul => "MUL",
            Operation::Div => "DIV",
        }
    }
}

impl FromStr for Operation {
    type Err = DecodeError;

    /// Case-insensitive match against the wire names
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| DecodeError::UnknownCommand(token.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request
///
/// Only produced by [`super::decode_request`], after the line had exactly
/// three tokens, a known command and two numeric operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request {
    operation: Operation,
    lhs: f64,
    rhs: f64,
}

impl Request {
    pub(crate) fn new(operation: Operation, lhs: f64, rhs: f64) -> Self {
        Self { operation, lhs, rhs }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// First operand
    pub fn lhs(&self) -> f64 {
        self.lhs
    }

    /// Second operand
    pub fn rhs(&self) -> f64 {
        self.rhs
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} {:?}", self.operation, self.lhs, self.rhs)
    }
}
