//! lazylam - a lazy lambda calculus interpreter
//!
//! # Overview
//!
//! lazylam runs programs written in an untyped lambda calculus with
//! integers, strings, infix operators and a small set of `@builtins`.
//! Arguments are passed by need: nothing is evaluated until a builtin
//! or the final result demands it, and nothing is evaluated twice.
//! Evaluation runs on a trampoline under a deadline, so runaway or deeply
//! recursive submissions end in `Timeout` or an error instead of a crash.
//!
//! # Quick Start
//!
//! ```
//! use lazylam::{Prelude, RunOptions, run};
//!
//! let options = RunOptions::default().with_prelude(Prelude::Standard);
//!
//! assert_eq!(run("main", "(\\x.\\y.x) 1 (U U)", &options), "=> 1");
//! assert_eq!(run("main", "print \"hi\" + \"!\"", &options), "hi\n=> hi!");
//! ```
//!
//! # Grading
//!
//! [`grade`] runs a submission with a test call injected into its
//! definition chain and compares the output; [`render_error`] shows compile
//! errors with a source snippet.

pub mod error_renderer;
pub mod grade;

// Re-export public API from lazylam_core
pub use lazylam_core::api::{
    CompilationOptions, CompileError, CompiledProgram, Diagnostic, Error, ExecutionOptions,
    Outcome, RunOptions, compile, execute, run,
};
pub use lazylam_core::prelude::{Definition, Prelude};

// Re-export values and runtime errors
pub use lazylam_core::evaluator::{RuntimeError, Value};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};
