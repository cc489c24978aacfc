use std::fmt;
use std::mem;

use ecow::EcoString;

use crate::diagnostics::Pos;
use crate::parser::syntax::{escape, is_operator_name};

/// A node of the syntax tree together with the position where it begins.
///
/// Equality is structural: positions are not compared, so trees parsed from
/// differently parenthesized text compare equal.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(i64),
    Str(EcoString),
    /// A variable. Operators used as values (`(+)`, or the `+` in `a + b`)
    /// are identifiers too.
    Ident(EcoString),
    /// `@name`
    Builtin(EcoString),
    Lambda {
        param: EcoString,
        body: Box<Expr>,
    },
    Apply {
        func: Box<Expr>,
        arg: Box<Expr>,
    },
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Pos) -> Self {
        Self { kind, pos }
    }

    pub fn apply(func: Expr, arg: Expr, pos: Pos) -> Self {
        Self::new(
            ExprKind::Apply {
                func: Box::new(func),
                arg: Box::new(arg),
            },
            pos,
        )
    }

    pub fn lambda(param: impl Into<EcoString>, body: Expr, pos: Pos) -> Self {
        Self::new(
            ExprKind::Lambda {
                param: param.into(),
                body: Box::new(body),
            },
            pos,
        )
    }

    pub fn ident(name: impl Into<EcoString>, pos: Pos) -> Self {
        Self::new(ExprKind::Ident(name.into()), pos)
    }
}

/// Flat chains such as `1 + 1 + ... + 1` nest as deep as they are long, so
/// subtrees are taken apart on a worklist instead of by recursive drops.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(&mut self.kind, &mut pending);
        while let Some(mut expr) = pending.pop() {
            detach_children(&mut expr.kind, &mut pending);
        }
    }
}

fn detach_children(kind: &mut ExprKind, out: &mut Vec<Expr>) {
    if !matches!(kind, ExprKind::Lambda { .. } | ExprKind::Apply { .. }) {
        return;
    }
    match mem::replace(kind, ExprKind::Number(0)) {
        ExprKind::Lambda { body, .. } => out.push(*body),
        ExprKind::Apply { func, arg } => {
            out.push(*func);
            out.push(*arg);
        }
        _ => {}
    }
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if is_operator_name(name) {
        write!(f, "({})", name)
    } else {
        write!(f, "{}", name)
    }
}

/// Prints surface syntax that parses back to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write!(f, "{}", n),
            ExprKind::Str(s) => write!(f, "\"{}\"", escape(s)),
            ExprKind::Ident(name) => write_name(f, name),
            ExprKind::Builtin(name) => write!(f, "@{}", name),
            ExprKind::Lambda { param, body } => {
                write!(f, "\\")?;
                write_name(f, param)?;
                write!(f, ".({})", body)
            }
            ExprKind::Apply { func, arg } => {
                match func.kind {
                    ExprKind::Lambda { .. } => write!(f, "({})", func)?,
                    _ => write!(f, "{}", func)?,
                }
                match arg.kind {
                    ExprKind::Apply { .. } | ExprKind::Lambda { .. } => write!(f, " ({})", arg),
                    ExprKind::Number(n) if n < 0 => write!(f, " ({})", arg),
                    _ => write!(f, " {}", arg),
                }
            }
        }
    }
}
