use ecow::EcoString;
use thiserror::Error;

use crate::diagnostics::Pos;

/// Scope or arity violation found by the binder.
#[derive(Debug, Clone, Error)]
#[error("{}: {kind}", .pos.location())]
pub struct BindError {
    pub kind: BindErrorKind,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindErrorKind {
    /// Identifier with no enclosing lambda binding it.
    #[error("name {name} is not bound")]
    Unbound { name: EcoString },

    /// `@name` that is not a builtin.
    #[error("name @{name} is not bound")]
    UnknownBuiltin { name: EcoString },

    /// The program as a whole is a builtin still waiting for arguments.
    #[error("wrong number of arguments for builtin")]
    Arity { missing: usize },
}

impl BindError {
    pub fn new(kind: BindErrorKind, pos: Pos) -> Self {
        Self { kind, pos }
    }

    /// The message without its location.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
