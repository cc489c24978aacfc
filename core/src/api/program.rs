//! Compiled programs and the outcome of running them.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use super::{Error, ExecutionOptions};
use crate::compiler::Code;
use crate::diagnostics::Source;
use crate::evaluator::{self, Value};

/// A program that parsed and passed every check.
///
/// The compiled code is immutable; every call to [`execute`] builds its own
/// environments and thunks, so one program can be run any number of times.
///
/// [`execute`]: CompiledProgram::execute
///
/// # Example
///
/// ```
/// use lazylam_core::api::{self, ExecutionOptions, RunOptions};
/// use lazylam_core::prelude::Prelude;
///
/// let options = RunOptions::default().with_prelude(Prelude::Standard);
/// let program = api::compile("<EXAMPLE>", "print (1 + 2)", &options).unwrap();
///
/// let outcome = program.execute(&ExecutionOptions::default());
/// assert_eq!(outcome.to_string(), "3\n=> 3");
/// ```
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    code: Rc<Code>,
    source: Rc<Source>,
}

impl CompiledProgram {
    pub(crate) fn new(code: Rc<Code>, source: Rc<Source>) -> Self {
        Self { code, source }
    }

    pub fn code(&self) -> &Rc<Code> {
        &self.code
    }

    pub fn source(&self) -> &Rc<Source> {
        &self.source
    }

    pub fn execute(&self, options: &ExecutionOptions) -> Outcome {
        let execution = evaluator::evaluate(&self.code, options);
        Outcome {
            output: execution.output,
            result: execution.result.map_err(Error::from),
            elapsed: execution.elapsed,
        }
    }
}

/// How a run ended, together with everything it printed on the way.
///
/// `Display` renders the run's text: the printed output followed by
/// `=> value`, `Runtime Error\n<message>` or `Timeout`. Compile errors print
/// as `Compile Error\n<diagnostic>` with no output in front.
#[derive(Debug)]
pub struct Outcome {
    pub output: String,
    pub result: Result<Value, Error>,
    pub elapsed: Duration,
}

impl Outcome {
    pub(crate) fn rejected(err: Error) -> Self {
        Self {
            output: String::new(),
            result: Err(err),
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(value) => write!(f, "{}=> {}", self.output, value),
            Err(Error::Compile(err)) => write!(f, "Compile Error\n{}", err),
            Err(Error::Timeout { .. }) => write!(f, "{}Timeout", self.output),
            Err(err @ (Error::Runtime(_) | Error::ResourceExceeded { .. })) => {
                write!(f, "{}Runtime Error\n{}", self.output, err)
            }
        }
    }
}
