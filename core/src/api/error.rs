//! Public error types for the lazylam API.
//!
//! Every stage has its own error type; at the API boundary they are folded
//! into [`Error`], and compile errors can also be turned into a
//! [`Diagnostic`] for renderers that want more than one line.

use std::fmt;
use std::ops::Range;
use std::time::Duration;

use thiserror::Error;

use crate::binder::{BindError, BindErrorKind};
use crate::diagnostics::Pos;
use crate::evaluator::{ExecutionError, RuntimeError};
use crate::parser::{ParseError, ParseErrorKind};

/// A program was rejected before it ran.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Bind(#[from] BindError),
}

impl CompileError {
    pub fn pos(&self) -> &Pos {
        match self {
            CompileError::Parse(err) => &err.pos,
            CompileError::Bind(err) => &err.pos,
        }
    }

    /// The message without its location.
    pub fn message(&self) -> String {
        match self {
            CompileError::Parse(err) => err.message(),
            CompileError::Bind(err) => err.message(),
        }
    }

    fn help(&self) -> Option<String> {
        match self {
            CompileError::Parse(ParseError {
                kind: ParseErrorKind::MaxDepthExceeded { .. },
                ..
            }) => Some("split the expression into smaller definitions".to_string()),
            CompileError::Bind(BindError {
                kind: BindErrorKind::Unbound { .. },
                ..
            }) => Some("names are bound by an enclosing `\\name.` or by the prelude".to_string()),
            CompileError::Bind(BindError {
                kind: BindErrorKind::Arity { missing },
                ..
            }) => Some(format!(
                "the builtin needs {} more argument{}",
                missing,
                if *missing == 1 { "" } else { "s" }
            )),
            _ => None,
        }
    }

    /// Convert to a Diagnostic for API boundary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let pos = self.pos();
        // Underline the token the error points at, or one character of it.
        let span = pos.user_offset().map(|start| {
            let rest = &pos.source.text()[start..];
            let token = rest
                .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
                .unwrap_or(rest.len());
            let first = rest.chars().next().map_or(0, char::len_utf8);
            start..start + token.max(first)
        });
        Diagnostic {
            message: self.message(),
            location: pos.location().to_string(),
            span,
            help: self.help(),
        }
    }
}

/// Public error type for all lazylam operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Parse and binding errors.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The program failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// The run was stopped at its deadline.
    #[error("Timeout")]
    Timeout { limit: Duration },

    /// The continuation stack grew past its cap.
    #[error("evaluation stack exceeds maximum of {max_frames} frames")]
    ResourceExceeded { max_frames: usize },
}

impl From<ExecutionError> for Error {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::Runtime(err) => Error::Runtime(err),
            ExecutionError::Timeout { limit } => Error::Timeout { limit },
            ExecutionError::ResourceExceeded { max_frames } => {
                Error::ResourceExceeded { max_frames }
            }
        }
    }
}

/// A compile error with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Primary diagnostic message.
    pub message: String,

    /// `name:line:column`, or `<PREDEF>` when the error is in the prelude.
    pub location: String,

    /// Byte range in the program text. `None` for prelude code.
    pub span: Option<Range<usize>>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
}

/// The one-line form used in run output.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}
