//! The lazylam pipeline: parse, inject, check, compile and run.

use std::rc::Rc;

use tracing::debug;

use super::{CompileError, CompiledProgram, Error, Outcome, RunOptions};
use crate::diagnostics::Source;
use crate::{binder, compiler, injector, parser};

/// Source name given to an injected fragment.
pub const INJECT_SOURCE: &str = "<INJECT>";

/// Parse and check `text` under `options`, producing a runnable program.
///
/// The program is wrapped in `options.predefined` before parsing. When
/// `options.inject_body` is set, it is parsed as its own source (named
/// [`INJECT_SOURCE`], without a prelude) and replaces the innermost body of
/// the program's definition chain before anything is checked.
///
/// # Example
///
/// ```
/// use lazylam_core::api::{self, RunOptions};
///
/// let err = api::compile("main", "\\x. y", &RunOptions::default()).unwrap_err();
/// assert_eq!(err.to_string(), "main:1:5: name y is not bound");
/// ```
pub fn compile(name: &str, text: &str, options: &RunOptions) -> Result<CompiledProgram, CompileError> {
    let source = Rc::new(Source::new(name, text));
    let predefined = options.predefined.definitions();
    let max_depth = options.compilation.max_depth;

    let mut program = parser::parse_with_max_depth(&source, &predefined, max_depth)?;
    debug!(source = name, definitions = predefined.len(), "Parsed program");

    if let Some(body) = &options.inject_body {
        let fragment_source = Rc::new(Source::new(INJECT_SOURCE, body.as_str()));
        let fragment = parser::parse_with_max_depth(&fragment_source, &[], max_depth)?;
        program = injector::inject(program, fragment);
        debug!(fragment = %body, "Injected fragment");
    }

    binder::check(&program)?;
    let code = compiler::compile(&program)?;
    Ok(CompiledProgram::new(code, source))
}

/// Compile and run `text`, recovering every failure into the [`Outcome`].
pub fn execute(name: &str, text: &str, options: &RunOptions) -> Outcome {
    match compile(name, text, options) {
        Ok(program) => program.execute(&options.execution),
        Err(err) => {
            debug!(error = %err, "Program rejected");
            Outcome::rejected(Error::Compile(err))
        }
    }
}

/// Compile and run `text`, returning the run's text.
///
/// # Example
///
/// ```
/// use lazylam_core::api::{self, RunOptions};
/// use lazylam_core::prelude::Prelude;
///
/// let options = RunOptions::default().with_prelude(Prelude::Standard);
/// assert_eq!(api::run("main", "2 * 21", &options), "=> 42");
/// assert_eq!(api::run("main", "1 2", &options).lines().next(), Some("Runtime Error"));
///
/// let bare = RunOptions::default();
/// assert_eq!(api::run("main", "(a", &bare), "Compile Error\nmain:1:3: unexpected EOF, expect ')'");
/// ```
pub fn run(name: &str, text: &str, options: &RunOptions) -> String {
    execute(name, text, options).to_string()
}
