//! The fixed set of `@name` primitives.

use hashbrown::HashMap;
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Length,
    True,
    False,
    If,
    Not,
    And,
    Or,
    Eq,
    Lt,
    Le,
    Pair,
    First,
    Second,
    Nil,
    Append,
    Head,
    Tail,
    IsEmpty,
    /// Step function of the fold behind `tail`. Has no `@name`.
    TailStep,
}

/// Every builtin that can be written as `@name`.
pub const SURFACE: &[Builtin] = &[
    Builtin::Print,
    Builtin::Add,
    Builtin::Sub,
    Builtin::Mul,
    Builtin::Div,
    Builtin::Mod,
    Builtin::Length,
    Builtin::True,
    Builtin::False,
    Builtin::If,
    Builtin::Not,
    Builtin::And,
    Builtin::Or,
    Builtin::Eq,
    Builtin::Lt,
    Builtin::Le,
    Builtin::Pair,
    Builtin::First,
    Builtin::Second,
    Builtin::Nil,
    Builtin::Append,
    Builtin::Head,
    Builtin::Tail,
    Builtin::IsEmpty,
];

static BY_NAME: Lazy<HashMap<&'static str, Builtin>> =
    Lazy::new(|| SURFACE.iter().map(|b| (b.name(), *b)).collect());

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        BY_NAME.get(name).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Add => "add",
            Builtin::Sub => "sub",
            Builtin::Mul => "mul",
            Builtin::Div => "div",
            Builtin::Mod => "mod",
            Builtin::Length => "length",
            Builtin::True => "true",
            Builtin::False => "false",
            Builtin::If => "if",
            Builtin::Not => "not",
            Builtin::And => "and",
            Builtin::Or => "or",
            Builtin::Eq => "eq",
            Builtin::Lt => "lt",
            Builtin::Le => "le",
            Builtin::Pair => "pair",
            Builtin::First => "first",
            Builtin::Second => "second",
            Builtin::Nil => "nil",
            Builtin::Append => "append",
            Builtin::Head => "head",
            Builtin::Tail => "tail",
            Builtin::IsEmpty => "isEmpty",
            Builtin::TailStep => "tail-step",
        }
    }

    /// Arguments the checker requires before the builtin counts as applied.
    /// Constants such as `@true` are 0 even though their value is a function.
    pub fn arity(self) -> usize {
        match self {
            Builtin::True | Builtin::False | Builtin::Nil => 0,
            Builtin::Print
            | Builtin::Length
            | Builtin::Not
            | Builtin::First
            | Builtin::Second
            | Builtin::Head
            | Builtin::Tail
            | Builtin::IsEmpty => 1,
            Builtin::Add
            | Builtin::Sub
            | Builtin::Mul
            | Builtin::Div
            | Builtin::Mod
            | Builtin::And
            | Builtin::Or
            | Builtin::Eq
            | Builtin::Lt
            | Builtin::Le
            | Builtin::Pair
            | Builtin::Append
            | Builtin::TailStep => 2,
            Builtin::If => 3,
        }
    }

    /// Arguments collected at run time before the primitive fires. For the
    /// Church-encoded constants this includes the arguments of the function
    /// they stand for: `true = \x.\y.x` fires after two.
    pub fn runtime_arity(self) -> usize {
        match self {
            Builtin::True | Builtin::False | Builtin::Nil => 2,
            Builtin::Pair => 3,
            Builtin::Append => 4,
            other => other.arity(),
        }
    }

    /// Whether every argument is forced to a value before the primitive runs.
    pub fn is_strict(self) -> bool {
        matches!(
            self,
            Builtin::Print
                | Builtin::Add
                | Builtin::Sub
                | Builtin::Mul
                | Builtin::Div
                | Builtin::Mod
                | Builtin::Length
                | Builtin::Eq
                | Builtin::Lt
                | Builtin::Le
        )
    }
}
