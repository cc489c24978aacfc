//! Run-time values, suspended computations and environments.
//!
//! Everything here is reference counted and owned by one evaluation. The
//! graph is acyclic: a thunk's result is built while the thunk itself is
//! unreachable from the code producing it, so plain `Rc` never leaks.
//! Chains can still be very long (a list of a million cells is a chain of a
//! million thunks), which is why [`ThunkCell`] tears its successors down
//! with a worklist instead of letting `Drop` recurse.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use ecow::EcoString;
use smallvec::SmallVec;

use crate::builtins::Builtin;
use crate::compiler::Code;

/// Arguments collected by a builtin that has not fired yet.
pub type Args = SmallVec<[Thunk; 3]>;

#[derive(Clone)]
pub enum Value {
    Number(i64),
    Str(EcoString),
    Closure(Rc<Closure>),
    /// A builtin together with the arguments it has received so far.
    Primitive(Rc<Partial>),
}

pub struct Closure {
    pub(crate) body: Rc<Code>,
    pub(crate) env: Env,
}

pub struct Partial {
    pub(crate) builtin: Builtin,
    pub(crate) args: Args,
}

impl Value {
    pub fn builtin(builtin: Builtin) -> Self {
        Self::partial(builtin, Args::new())
    }

    pub(crate) fn partial(builtin: Builtin, args: Args) -> Self {
        Value::Primitive(Rc::new(Partial { builtin, args }))
    }

    /// The Church boolean for `b`.
    pub fn boolean(b: bool) -> Self {
        Self::builtin(if b { Builtin::True } else { Builtin::False })
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Primitive(_))
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Value::Number(n) => format!("number {}", n),
            Value::Str(s) => format!("string {:?}", s.as_str()),
            other => other.to_string(),
        }
    }
}

/// Numbers in decimal, strings as their raw text, functions as a
/// placeholder: the result line of a run.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Closure(_) => write!(f, "<function>"),
            Value::Primitive(partial) => write!(f, "<builtin @{}>", partial.builtin.name()),
        }
    }
}

/// Shallow: never walks into environments or argument thunks.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::Str(s) => write!(f, "Str({:?})", s.as_str()),
            Value::Closure(closure) => write!(f, "Closure({})", closure.body),
            Value::Primitive(partial) => write!(
                f,
                "Primitive(@{}, {} args)",
                partial.builtin.name(),
                partial.args.len()
            ),
        }
    }
}

impl PartialEq for Value {
    /// Numbers and strings by value, functions by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            (Value::Primitive(a), Value::Primitive(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

// ============================================================================
// Thunks
// ============================================================================

pub type Thunk = Rc<ThunkCell>;

/// Memo cell of a call-by-need computation.
pub struct ThunkCell {
    state: RefCell<ThunkState>,
}

pub(crate) enum ThunkState {
    Pending(Suspension),
    /// Being forced. Demanding it again is an infinite loop.
    Blackhole,
    Done(Value),
}

pub(crate) enum Suspension {
    /// Evaluate code in an environment.
    Code { code: Rc<Code>, env: Env },
    /// Apply one thunk to another.
    Apply { func: Thunk, arg: Thunk },
}

impl ThunkCell {
    pub fn ready(value: Value) -> Thunk {
        Rc::new(Self {
            state: RefCell::new(ThunkState::Done(value)),
        })
    }

    pub(crate) fn suspend(code: Rc<Code>, env: Env) -> Thunk {
        Rc::new(Self {
            state: RefCell::new(ThunkState::Pending(Suspension::Code { code, env })),
        })
    }

    pub(crate) fn suspend_apply(func: Thunk, arg: Thunk) -> Thunk {
        Rc::new(Self {
            state: RefCell::new(ThunkState::Pending(Suspension::Apply { func, arg })),
        })
    }

    /// The memoized value, if the thunk has been forced.
    pub fn value(&self) -> Option<Value> {
        match &*self.state.borrow() {
            ThunkState::Done(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub(crate) fn take(&self) -> ThunkState {
        mem::replace(&mut *self.state.borrow_mut(), ThunkState::Blackhole)
    }

    pub(crate) fn fill(&self, value: Value) {
        *self.state.borrow_mut() = ThunkState::Done(value);
    }
}

impl Drop for ThunkCell {
    fn drop(&mut self) {
        let mut orphans = Vec::new();
        salvage(
            mem::replace(self.state.get_mut(), ThunkState::Blackhole),
            &mut orphans,
        );
        while let Some(thunk) = orphans.pop() {
            // Shared thunks stay alive; only the last owner dismantles them.
            if let Ok(mut cell) = Rc::try_unwrap(thunk) {
                salvage(
                    mem::replace(cell.state.get_mut(), ThunkState::Blackhole),
                    &mut orphans,
                );
            }
        }
    }
}

/// Moves the thunks owned by `state` into `out`.
fn salvage(state: ThunkState, out: &mut Vec<Thunk>) {
    match state {
        ThunkState::Blackhole => {}
        ThunkState::Done(value) => salvage_value(value, out),
        ThunkState::Pending(Suspension::Code { env, .. }) => salvage_env(env, out),
        ThunkState::Pending(Suspension::Apply { func, arg }) => {
            out.push(func);
            out.push(arg);
        }
    }
}

fn salvage_value(value: Value, out: &mut Vec<Thunk>) {
    match value {
        Value::Closure(closure) => {
            if let Ok(closure) = Rc::try_unwrap(closure) {
                salvage_env(closure.env, out);
            }
        }
        Value::Primitive(partial) => {
            if let Ok(partial) = Rc::try_unwrap(partial) {
                out.extend(partial.args);
            }
        }
        Value::Number(_) | Value::Str(_) => {}
    }
}

fn salvage_env(mut env: Env, out: &mut Vec<Thunk>) {
    while let Some(frame) = env.0.take() {
        match Rc::try_unwrap(frame) {
            Ok(EnvFrame { value, parent }) => {
                out.push(value);
                env = parent;
            }
            Err(_) => break,
        }
    }
}

// ============================================================================
// Environments
// ============================================================================

/// Argument thunks of the enclosing lambdas, innermost first.
#[derive(Clone, Default)]
pub struct Env(Option<Rc<EnvFrame>>);

pub(crate) struct EnvFrame {
    value: Thunk,
    parent: Env,
}

impl Env {
    pub fn extend(&self, value: Thunk) -> Env {
        Env(Some(Rc::new(EnvFrame {
            value,
            parent: self.clone(),
        })))
    }

    /// The thunk bound `index` lambdas out.
    pub fn lookup(&self, index: usize) -> Option<&Thunk> {
        let mut frame = self.0.as_ref()?;
        for _ in 0..index {
            frame = frame.parent.0.as_ref()?;
        }
        Some(&frame.value)
    }
}
