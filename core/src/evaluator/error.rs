//! Evaluation errors.
//!
//! # Error Categories
//!
//! - **Runtime errors**: the program did something that has no meaning,
//!   such as applying a number or dividing by zero. Nothing in the language
//!   can catch them; they end the run.
//!
//! - **Limits**: the run was stopped from the outside, either because its
//!   deadline passed or because its continuation stack grew past the
//!   configured cap. These are not faults in the program as such.

use std::time::Duration;

use thiserror::Error;

/// Something went wrong inside the program being evaluated.
///
/// Runtime errors carry no source position: by the time code runs, the
/// names and offsets of the syntax tree are gone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A number or string was applied to an argument.
    #[error(
        "{value} is not a function (a value was used as if it were callable; check the argument types)"
    )]
    NotCallable { value: String },

    /// A strict builtin received a value it cannot work with.
    #[error("@{builtin} cannot be applied to {found}")]
    TypeMismatch { builtin: &'static str, found: String },

    #[error("division by zero in @{builtin}")]
    DivisionByZero { builtin: &'static str },

    #[error("integer overflow in @{builtin}")]
    Overflow { builtin: &'static str },

    /// A suspended computation needed its own result.
    #[error("infinite loop: a value depends on itself")]
    InfiniteLoop,

    /// Only reachable with code that was not produced by the compiler.
    #[error("variable #{index} is not in scope")]
    UnboundVariable { index: usize },
}

/// Why an evaluation did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// The deadline passed.
    #[error("evaluation exceeded the time limit of {limit:?}")]
    Timeout { limit: Duration },

    /// The continuation stack grew past its cap.
    #[error("evaluation stack exceeds maximum of {max_frames} frames")]
    ResourceExceeded { max_frames: usize },
}
