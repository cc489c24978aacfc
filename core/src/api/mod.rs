//! Public API for the lazylam interpreter.
//!
//! A run goes through four stages: the program is wrapped in its prelude
//! and parsed, an optional fragment is injected into its definition chain,
//! names and builtin arities are checked, and the result is compiled and
//! evaluated lazily under a deadline. [`run`] performs all of them and
//! renders the outcome as text; [`compile`] stops after checking so a
//! program can be run several times.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use lazylam_core::api::{self, RunOptions};
//! use lazylam_core::prelude::Prelude;
//!
//! let options = RunOptions::default()
//!     .with_prelude(Prelude::Standard)
//!     .with_time_limit(Duration::from_secs(5));
//!
//! let submission = "\\sum := Y (\\f.\\n. if (n == 0) 0 (n + f (n - 1))) ; sum 3";
//! assert_eq!(api::run("<SUBMIT>", submission, &options), "=> 6");
//!
//! let options = options.with_inject_body("sum 10");
//! assert_eq!(api::run("<SUBMIT>", submission, &options), "=> 55");
//! ```

pub mod engine;
pub mod error;
pub mod options;
pub mod program;

#[cfg(test)]
mod engine_test;

pub use engine::{INJECT_SOURCE, compile, execute, run};
pub use error::{CompileError, Diagnostic, Error};
pub use options::{CompilationOptions, ExecutionOptions, RunOptions};
pub use program::{CompiledProgram, Outcome};
