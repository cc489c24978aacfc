use std::fmt;
use std::mem;
use std::rc::Rc;

use ecow::EcoString;

use crate::builtins::Builtin;

/// Executable form of a checked program.
///
/// Variables are de Bruijn indices: `Var(0)` is the parameter of the
/// innermost enclosing lambda, `Var(1)` the one around it, and so on.
/// Subtrees are shared behind `Rc` so that closures and suspended
/// applications can hold on to their code without copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    Number(i64),
    Str(EcoString),
    Var(usize),
    Builtin(Builtin),
    Lambda(Rc<Code>),
    Apply(Rc<Code>, Rc<Code>),
}

/// Code is torn down with a worklist: only the last owner of a subtree
/// takes it apart, and the detached slots point at one shared leaf.
impl Drop for Code {
    fn drop(&mut self) {
        let mut leaf = None;
        let mut pending = Vec::new();
        detach_children(self, &mut leaf, &mut pending);
        while let Some(code) = pending.pop() {
            if let Ok(mut code) = Rc::try_unwrap(code) {
                detach_children(&mut code, &mut leaf, &mut pending);
            }
        }
    }
}

fn detach_children(code: &mut Code, leaf: &mut Option<Rc<Code>>, out: &mut Vec<Rc<Code>>) {
    let children = match code {
        Code::Lambda(body) => [Some(body), None],
        Code::Apply(func, arg) => [Some(func), Some(arg)],
        _ => return,
    };
    for child in children.into_iter().flatten() {
        let nested = matches!(**child, Code::Lambda(_) | Code::Apply(..));
        if nested && Rc::strong_count(child) == 1 {
            let leaf = leaf.get_or_insert_with(|| Rc::new(Code::Number(0)));
            out.push(mem::replace(child, Rc::clone(leaf)));
        }
    }
}

/// Compact notation used in test expectations and trace logs:
/// `λ.(#0 #1)`.
impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Number(n) => write!(f, "{}", n),
            Code::Str(s) => write!(f, "{:?}", s.as_str()),
            Code::Var(index) => write!(f, "#{}", index),
            Code::Builtin(builtin) => write!(f, "@{}", builtin.name()),
            Code::Lambda(body) => write!(f, "λ.{}", body),
            Code::Apply(func, arg) => write!(f, "({} {})", func, arg),
        }
    }
}
