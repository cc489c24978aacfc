//! Static name and arity check.
//!
//! Every identifier must be bound by an enclosing lambda and every `@name`
//! must be a builtin. Arity is tracked through application: a builtin
//! reference starts at its declared arity and each argument applied to it
//! takes one off. Only the program as a whole is held to it; a program that
//! is a builtin still missing arguments is rejected, while extra arguments
//! are ordinary application.

mod error;


pub use error::{BindError, BindErrorKind};

use ecow::EcoString;
use hashbrown::HashMap;

use crate::builtins::Builtin;
use crate::parser::{Expr, ExprKind};

/// Checks `program`, which must be closed apart from builtins.
pub fn check(program: &Expr) -> Result<(), BindError> {
    let mut binder = Binder::default();
    let remaining = binder.visit(program)?;
    if remaining > 0 {
        return Err(BindError::new(
            BindErrorKind::Arity {
                missing: remaining as usize,
            },
            program.pos.clone(),
        ));
    }
    tracing::debug!("Binder check passed");
    Ok(())
}

/// Names in scope, each with the number of enclosing lambdas binding it.
#[derive(Default)]
struct Binder {
    scope: HashMap<EcoString, usize>,
}

/// Work left for the walk. Children are visited through an explicit stack,
/// so a chain of a million applications needs no host stack to check.
enum Task<'e> {
    Visit(&'e Expr),
    /// Leave the scope of `param` and turn the body's result into a value.
    Leave(&'e EcoString),
    /// Combine the results of an application's function and argument.
    Apply,
}

impl Binder {
    fn is_bound(&self, name: &str) -> bool {
        self.scope.get(name).is_some_and(|count| *count > 0)
    }

    /// Returns the arguments still owed if `expr` is a (partially applied)
    /// builtin, or a negative number otherwise.
    fn visit(&mut self, expr: &Expr) -> Result<isize, BindError> {
        let mut tasks = vec![Task::Visit(expr)];
        let mut results: Vec<isize> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(expr) => match &expr.kind {
                    ExprKind::Number(_) | ExprKind::Str(_) => results.push(-1),
                    ExprKind::Ident(name) => {
                        if !self.is_bound(name) {
                            return Err(BindError::new(
                                BindErrorKind::Unbound { name: name.clone() },
                                expr.pos.clone(),
                            ));
                        }
                        results.push(-1);
                    }
                    ExprKind::Builtin(name) => match Builtin::lookup(name) {
                        Some(builtin) => results.push(builtin.arity() as isize),
                        None => {
                            return Err(BindError::new(
                                BindErrorKind::UnknownBuiltin { name: name.clone() },
                                expr.pos.clone(),
                            ));
                        }
                    },
                    ExprKind::Lambda { param, body } => {
                        *self.scope.entry(param.clone()).or_insert(0) += 1;
                        tasks.push(Task::Leave(param));
                        tasks.push(Task::Visit(body));
                    }
                    ExprKind::Apply { func, arg } => {
                        // The function is checked first, so its errors win.
                        tasks.push(Task::Apply);
                        tasks.push(Task::Visit(arg));
                        tasks.push(Task::Visit(func));
                    }
                },
                Task::Leave(param) => {
                    if let Some(count) = self.scope.get_mut(param) {
                        *count -= 1;
                    }
                    results.pop();
                    results.push(-1);
                }
                Task::Apply => {
                    results.pop();
                    let remaining = results.pop().unwrap_or(-1);
                    results.push(remaining - 1);
                }
            }
        }
        Ok(results.pop().unwrap_or(-1))
    }
}
