//! The trampoline.
//!
//! Evaluation is a loop over an explicit control register and a heap stack
//! of continuation frames. No step calls back into the loop, so the host
//! stack stays flat however deep the program recurses; depth shows up as
//! frames on `stack` instead, which the step limit can see and cap.

use std::rc::Rc;
use std::time::Instant;

use smallvec::SmallVec;

use crate::api::ExecutionOptions;
use crate::builtins::Builtin;
use crate::compiler::Code;
use crate::evaluator::operators::apply_strict;
use crate::evaluator::value::{
    Args, Closure, Env, Partial, Suspension, Thunk, ThunkCell, ThunkState, Value,
};
use crate::evaluator::{ExecutionError, RuntimeError};

/// What the machine does next.
enum Control {
    /// Evaluate code in an environment.
    Eval(Rc<Code>, Env),
    /// Produce the value of a thunk, evaluating it if needed.
    Force(Thunk),
    /// Hand a value to the frame on top of the stack.
    Return(Value),
}

/// Work waiting for a value.
enum Frame {
    /// Apply the returned function to this argument.
    Apply(Thunk),
    /// Memoize the returned value in this thunk, then pass it on.
    Update(Thunk),
    /// A strict builtin forcing its arguments left to right. `pending` is
    /// reversed so the next argument is at the end.
    Strict {
        builtin: Builtin,
        forced: SmallVec<[Value; 2]>,
        pending: Args,
    },
}

pub(super) struct Machine<'o> {
    options: &'o ExecutionOptions,
    deadline: Option<Instant>,
    stack: Vec<Frame>,
    /// Text written by `@print`.
    pub(super) output: String,
    pub(super) steps: u64,
}

impl<'o> Machine<'o> {
    pub(super) fn new(options: &'o ExecutionOptions) -> Self {
        Self {
            options,
            deadline: Instant::now().checked_add(options.time_limit),
            stack: Vec::new(),
            output: String::new(),
            steps: 0,
        }
    }

    pub(super) fn run(&mut self, program: Rc<Code>) -> Result<Value, ExecutionError> {
        let mut control = Control::Eval(program, Env::default());
        loop {
            self.steps += 1;
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(ExecutionError::Timeout {
                    limit: self.options.time_limit,
                });
            }
            if let Some(max_frames) = self.options.max_frames {
                if self.stack.len() > max_frames {
                    return Err(ExecutionError::ResourceExceeded { max_frames });
                }
            }

            control = match control {
                Control::Eval(code, env) => self.eval(&code, env)?,
                Control::Force(thunk) => self.force(thunk)?,
                Control::Return(value) => match self.stack.pop() {
                    None => return Ok(value),
                    Some(frame) => self.resume(frame, value)?,
                },
            };
        }
    }

    fn eval(&mut self, code: &Rc<Code>, env: Env) -> Result<Control, RuntimeError> {
        Ok(match &**code {
            Code::Var(index) => Control::Force(lookup(&env, *index)?),
            Code::Apply(func, arg) => {
                let arg = delay(arg, &env)?;
                self.stack.push(Frame::Apply(arg));
                Control::Eval(Rc::clone(func), env)
            }
            Code::Number(n) => Control::Return(Value::Number(*n)),
            Code::Str(s) => Control::Return(Value::Str(s.clone())),
            Code::Builtin(builtin) => Control::Return(Value::builtin(*builtin)),
            Code::Lambda(body) => Control::Return(closure(body, env)),
        })
    }

    fn force(&mut self, thunk: Thunk) -> Result<Control, RuntimeError> {
        if let Some(value) = thunk.value() {
            return Ok(Control::Return(value));
        }
        match thunk.take() {
            ThunkState::Done(value) => {
                thunk.fill(value.clone());
                Ok(Control::Return(value))
            }
            ThunkState::Blackhole => Err(RuntimeError::InfiniteLoop),
            ThunkState::Pending(suspension) => {
                self.stack.push(Frame::Update(thunk));
                Ok(match suspension {
                    Suspension::Code { code, env } => Control::Eval(code, env),
                    Suspension::Apply { func, arg } => {
                        self.stack.push(Frame::Apply(arg));
                        Control::Force(func)
                    }
                })
            }
        }
    }

    fn resume(&mut self, frame: Frame, value: Value) -> Result<Control, RuntimeError> {
        match frame {
            Frame::Update(thunk) => {
                thunk.fill(value.clone());
                Ok(Control::Return(value))
            }
            Frame::Apply(arg) => self.apply(value, arg),
            Frame::Strict {
                builtin,
                mut forced,
                mut pending,
            } => {
                forced.push(value);
                match pending.pop() {
                    Some(next) => {
                        self.stack.push(Frame::Strict {
                            builtin,
                            forced,
                            pending,
                        });
                        Ok(Control::Force(next))
                    }
                    None => self.finish_strict(builtin, &forced).map(Control::Return),
                }
            }
        }
    }

    fn apply(&mut self, func: Value, arg: Thunk) -> Result<Control, RuntimeError> {
        match func {
            Value::Closure(closure) => Ok(Control::Eval(
                Rc::clone(&closure.body),
                closure.env.extend(arg),
            )),
            Value::Primitive(partial) => {
                let Partial { builtin, mut args } =
                    Rc::try_unwrap(partial).unwrap_or_else(|shared| Partial {
                        builtin: shared.builtin,
                        args: shared.args.clone(),
                    });
                args.push(arg);
                if args.len() < builtin.runtime_arity() {
                    Ok(Control::Return(Value::partial(builtin, args)))
                } else {
                    self.fire(builtin, args)
                }
            }
            other @ (Value::Number(_) | Value::Str(_)) => Err(RuntimeError::NotCallable {
                value: other.to_string(),
            }),
        }
    }

    /// Pushes frames applying `func` to `args` in order and forces `func`.
    fn call<const N: usize>(&mut self, func: Thunk, args: [Thunk; N]) -> Control {
        for arg in args.into_iter().rev() {
            self.stack.push(Frame::Apply(arg));
        }
        Control::Force(func)
    }

    /// Runs a builtin that has all of its arguments.
    fn fire(&mut self, builtin: Builtin, args: Args) -> Result<Control, RuntimeError> {
        let arg = |i: usize| Rc::clone(&args[i]);
        Ok(match builtin {
            Builtin::Print
            | Builtin::Add
            | Builtin::Sub
            | Builtin::Mul
            | Builtin::Div
            | Builtin::Mod
            | Builtin::Length
            | Builtin::Eq
            | Builtin::Lt
            | Builtin::Le => self.force_strict(builtin, args)?,
            Builtin::True => Control::Force(arg(0)),
            Builtin::False | Builtin::Nil => Control::Force(arg(1)),
            Builtin::If => self.call(arg(0), [arg(1), arg(2)]),
            Builtin::Not => self.call(arg(0), [constant(Builtin::False), constant(Builtin::True)]),
            Builtin::And => self.call(arg(0), [arg(1), constant(Builtin::False)]),
            Builtin::Or => self.call(arg(0), [constant(Builtin::True), arg(1)]),
            Builtin::Pair => self.call(arg(2), [arg(0), arg(1)]),
            Builtin::First => self.call(arg(0), [constant(Builtin::True)]),
            Builtin::Second => self.call(arg(0), [constant(Builtin::False)]),
            Builtin::Append => {
                // append a l f x = f a (l f x)
                let rest = ThunkCell::suspend_apply(
                    ThunkCell::suspend_apply(arg(1), arg(2)),
                    arg(3),
                );
                self.call(arg(2), [arg(0), rest])
            }
            Builtin::Head => self.call(
                arg(0),
                [constant(Builtin::True), ThunkCell::ready(Value::Number(0))],
            ),
            Builtin::IsEmpty => {
                // \a.\b.false, spelled with partially applied `true`s.
                let always_false = partial(Builtin::True, [constant(Builtin::False)]);
                let step = partial(Builtin::True, [ThunkCell::ready(always_false)]);
                self.call(arg(0), [ThunkCell::ready(step), constant(Builtin::True)])
            }
            Builtin::Tail => {
                // Fold the list into (tail, list) pairs from the right and
                // keep the first component.
                let empty = partial(Builtin::Pair, [constant(Builtin::Nil), constant(Builtin::Nil)]);
                let folded = ThunkCell::suspend_apply(
                    ThunkCell::suspend_apply(arg(0), constant(Builtin::TailStep)),
                    ThunkCell::ready(empty),
                );
                self.call(folded, [constant(Builtin::True)])
            }
            Builtin::TailStep => {
                // (t, s) -> (s, a : s)
                let list = ThunkCell::suspend_apply(arg(1), constant(Builtin::False));
                let cons = partial(Builtin::Append, [arg(0), Rc::clone(&list)]);
                Control::Return(partial(Builtin::Pair, [list, ThunkCell::ready(cons)]))
            }
        })
    }

    /// Forces the arguments of a strict builtin one frame at a time.
    fn force_strict(&mut self, builtin: Builtin, mut args: Args) -> Result<Control, RuntimeError> {
        debug_assert!(builtin.is_strict(), "@{} is not strict", builtin.name());
        args.reverse();
        let Some(first) = args.pop() else {
            return self.finish_strict(builtin, &[]).map(Control::Return);
        };
        self.stack.push(Frame::Strict {
            builtin,
            forced: SmallVec::new(),
            pending: args,
        });
        Ok(Control::Force(first))
    }

    fn finish_strict(&mut self, builtin: Builtin, args: &[Value]) -> Result<Value, RuntimeError> {
        match (builtin, args) {
            (Builtin::Print, [value]) => {
                let text = value.to_string();
                self.output.push_str(&text);
                self.output.push('\n');
                Ok(Value::Str(text.into()))
            }
            _ => apply_strict(builtin, args),
        }
    }
}

fn lookup(env: &Env, index: usize) -> Result<Thunk, RuntimeError> {
    env.lookup(index)
        .cloned()
        .ok_or(RuntimeError::UnboundVariable { index })
}

fn closure(body: &Rc<Code>, env: Env) -> Value {
    Value::Closure(Rc::new(Closure {
        body: Rc::clone(body),
        env,
    }))
}

/// The argument thunk for `code`: variables share the thunk they are bound
/// to, values are stored ready, applications are suspended.
fn delay(code: &Rc<Code>, env: &Env) -> Result<Thunk, RuntimeError> {
    Ok(match &**code {
        Code::Var(index) => lookup(env, *index)?,
        Code::Apply(..) => ThunkCell::suspend(Rc::clone(code), env.clone()),
        Code::Number(n) => ThunkCell::ready(Value::Number(*n)),
        Code::Str(s) => ThunkCell::ready(Value::Str(s.clone())),
        Code::Builtin(builtin) => constant(*builtin),
        Code::Lambda(body) => ThunkCell::ready(closure(body, env.clone())),
    })
}

fn constant(builtin: Builtin) -> Thunk {
    ThunkCell::ready(Value::builtin(builtin))
}

fn partial<const N: usize>(builtin: Builtin, args: [Thunk; N]) -> Value {
    Value::partial(builtin, args.into_iter().collect())
}
