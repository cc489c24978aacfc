//! Call-by-need evaluator for compiled programs.
//!
//! Applications are not performed when they are built: an argument becomes
//! a thunk that is evaluated the first time something needs its value and
//! remembered afterwards. All of it runs on a trampoline (see `eval.rs`),
//! so neither deep recursion in the program nor long lazy chains can
//! overflow the host stack.
//!
//! ## Design Principles
//!
//! - **Never panic**: adversarial programs end in a [`RuntimeError`], a
//!   timeout or a resource error, never in a crash
//! - **Bounded**: the deadline is checked before every step, and the
//!   continuation stack has a configurable cap
//! - **Isolated**: every call builds its own environments and thunks;
//!   nothing is shared between runs
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use lazylam_core::{api::ExecutionOptions, compiler, diagnostics::Source, evaluator, parser};
//!
//! let source = Rc::new(Source::new("<EXAMPLE>", "(\\x.\\y.x) 5 (@print \"unused\")"));
//! let parsed = parser::parse(&source, &[]).unwrap();
//! let code = compiler::compile(&parsed).unwrap();
//!
//! let execution = evaluator::evaluate(&code, &ExecutionOptions::default());
//! assert_eq!(execution.result.unwrap().as_number(), Some(5));
//! assert_eq!(execution.output, "");
//! ```

mod error;
mod eval;
mod operators;
mod value;


pub use error::{ExecutionError, RuntimeError};
pub use value::{Args, Closure, Env, Partial, Thunk, ThunkCell, Value};

use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::api::ExecutionOptions;
use crate::compiler::Code;

/// Outcome of one evaluation.
#[derive(Debug)]
pub struct Execution {
    pub result: Result<Value, ExecutionError>,
    /// Everything `@print` wrote before the run ended, successful or not.
    pub output: String,
    /// Trampoline iterations taken.
    pub steps: u64,
    pub elapsed: Duration,
}

/// Evaluates `program` to a value under the limits in `options`.
pub fn evaluate(program: &Rc<Code>, options: &ExecutionOptions) -> Execution {
    let started = Instant::now();
    let mut machine = eval::Machine::new(options);
    let result = machine.run(Rc::clone(program));
    let elapsed = started.elapsed();

    match &result {
        Ok(_) => tracing::debug!(steps = machine.steps, ?elapsed, "Evaluation finished"),
        Err(ExecutionError::Runtime(err)) => {
            tracing::debug!(steps = machine.steps, error = %err, "Evaluation failed")
        }
        Err(err) => tracing::warn!(steps = machine.steps, ?elapsed, "Evaluation stopped: {}", err),
    }

    Execution {
        result,
        output: machine.output,
        steps: machine.steps,
        elapsed,
    }
}
