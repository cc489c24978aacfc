use std::fmt;

use thiserror::Error;

use crate::diagnostics::Pos;

/// Parser error. Parsing stops at the first one.
#[derive(Debug, Clone, Error)]
#[error("{}: {kind}", .pos.location())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub pos: Pos,
}

/// What the parser saw where it could not continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    Char(char),
    Eof,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Char(c) => write!(f, "unexpected '{}'", c),
            Found::Eof => write!(f, "unexpected EOF"),
        }
    }
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Input left over after a complete program.
    #[error("{found}")]
    Trailing { found: Found },

    /// A construct was started but a required piece is missing.
    #[error("{found}, {expected}")]
    Unexpected {
        found: Found,
        expected: &'static str,
    },

    #[error("wrong string format")]
    UnterminatedString,

    #[error("expect identifier after '@'")]
    MissingBuiltinName,

    #[error("number {text} is out of range")]
    NumberOutOfRange { text: String },

    #[error("expression nesting depth exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { max_depth: usize },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, pos: Pos) -> Self {
        Self { kind, pos }
    }

    /// The message without its location.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
