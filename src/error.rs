//! Error kinds raised at the engine's call boundaries.
//!
//! These are input-validation errors: malformed netlists, wrong-length or
//! wrong-alphabet vectors, malformed fault strings, and faults naming an
//! unknown net. Invariant violations (evaluating a gate with unassigned
//! inputs, XOR outside `{0,1}`) are never wrapped in these types: they are
//! programmer bugs and simply panic.

use thiserror::Error;

/// The net-list text failed to parse, or violated a `Circuit` invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("netlist format error: {message}")]
pub struct NetlistFormatError {
    /// Human-readable description of the problem, including the line and
    /// offending token when known.
    pub message: String,
    /// 1-based source line number, when the error can be attributed to one.
    pub line: Option<usize>,
    /// The offending token, when there is a single one to blame.
    pub token: Option<String>,
}

impl NetlistFormatError {
    /// Build an error with no line/token context.
    pub fn new(message: impl Into<String>) -> Self {
        NetlistFormatError {
            message: message.into(),
            line: None,
            token: None,
        }
    }

    /// Attach a 1-based source line number, folding it into the message.
    pub fn at_line(mut self, line: usize) -> Self {
        self.message = format!("{} (line {line})", self.message);
        self.line = Some(line);
        self
    }

    /// Attach the offending token, folding it into the message.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.message = format!("{} [token: {token}]", self.message);
        self.token = Some(token);
        self
    }
}

/// An input or output vector had the wrong length or an invalid alphabet.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidVectorError {
    /// The vector's length did not match `circuit.inputs.len()`.
    #[error("vector length {got} does not match the circuit's {expected} inputs")]
    WrongLength {
        /// Number of primary inputs the circuit expects.
        expected: usize,
        /// Length of the vector actually given.
        got: usize,
    },
    /// The vector contained a character outside the accepted alphabet.
    #[error("invalid character {char:?} at position {position} (expected one of {alphabet})")]
    InvalidChar {
        /// The offending character.
        char: char,
        /// 0-based position of the offending character.
        position: usize,
        /// The alphabet that was expected, for the error message.
        alphabet: &'static str,
    },
}

/// A fault named a net that does not exist in the circuit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("net {net} does not exist in the circuit")]
pub struct InvalidNetError {
    /// String representation of the unknown net id.
    pub net: String,
}

/// A fault string could not be parsed, or named a non-binary stuck-at value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid fault string {text:?}: {reason}")]
pub struct InvalidFaultError {
    /// The text that failed to parse.
    pub text: String,
    /// Why parsing failed.
    pub reason: String,
}
