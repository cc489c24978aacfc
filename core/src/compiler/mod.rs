//! Translation of the syntax tree into executable [`Code`].
//!
//! Compilation does not evaluate anything. Names are resolved to de Bruijn
//! indices against the lambdas enclosing them, so at run time a variable is
//! a walk up a linked environment rather than a lookup by name.

mod code;


pub use code::Code;

use std::rc::Rc;

use ecow::EcoString;

use crate::binder::{BindError, BindErrorKind};
use crate::builtins::Builtin;
use crate::parser::{Expr, ExprKind};

/// Compiles a program. Programs that passed [`crate::binder::check`] always
/// compile; the errors are the binder's, for trees that did not.
pub fn compile(program: &Expr) -> Result<Rc<Code>, BindError> {
    let mut compiler = Compiler { scope: Vec::new() };
    let code = compiler.compile(program)?;
    tracing::debug!("Compiled program");
    Ok(code)
}

struct Compiler {
    /// Parameters of the enclosing lambdas, innermost last.
    scope: Vec<EcoString>,
}

/// Work left for the walk, kept on the heap like the evaluator's frames.
enum Task<'e> {
    Visit(&'e Expr),
    /// Close the innermost scope around the compiled body.
    Lambda,
    /// Pair up the compiled function and argument.
    Apply,
}

impl Compiler {
    fn resolve(&self, name: &str) -> Option<usize> {
        self.scope.iter().rev().position(|param| param == name)
    }

    fn compile(&mut self, expr: &Expr) -> Result<Rc<Code>, BindError> {
        let mut tasks = vec![Task::Visit(expr)];
        let mut done: Vec<Rc<Code>> = Vec::new();

        while let Some(task) = tasks.pop() {
            let code = match task {
                Task::Visit(expr) => match &expr.kind {
                    ExprKind::Number(n) => Code::Number(*n),
                    ExprKind::Str(s) => Code::Str(s.clone()),
                    ExprKind::Ident(name) => match self.resolve(name) {
                        Some(index) => Code::Var(index),
                        None => {
                            return Err(BindError::new(
                                BindErrorKind::Unbound { name: name.clone() },
                                expr.pos.clone(),
                            ));
                        }
                    },
                    ExprKind::Builtin(name) => match Builtin::lookup(name) {
                        Some(builtin) => Code::Builtin(builtin),
                        None => {
                            return Err(BindError::new(
                                BindErrorKind::UnknownBuiltin { name: name.clone() },
                                expr.pos.clone(),
                            ));
                        }
                    },
                    ExprKind::Lambda { param, body } => {
                        self.scope.push(param.clone());
                        tasks.push(Task::Lambda);
                        tasks.push(Task::Visit(body));
                        continue;
                    }
                    ExprKind::Apply { func, arg } => {
                        tasks.push(Task::Apply);
                        tasks.push(Task::Visit(arg));
                        tasks.push(Task::Visit(func));
                        continue;
                    }
                },
                Task::Lambda => {
                    self.scope.pop();
                    Code::Lambda(take(&mut done))
                }
                Task::Apply => {
                    let arg = take(&mut done);
                    let func = take(&mut done);
                    Code::Apply(func, arg)
                }
            };
            done.push(Rc::new(code));
        }
        Ok(take(&mut done))
    }
}

/// The most recently compiled subtree. Every task that reads one is pushed
/// below the visits that produce it, so the stack is never short.
fn take(done: &mut Vec<Rc<Code>>) -> Rc<Code> {
    done.pop().unwrap_or_else(|| Rc::new(Code::Number(0)))
}
