//! Splicing an expression into the innermost body of a definition chain.
//!
//! A program made of definitions has the shape
//!
//! ```text
//! (\a. (\b. body) rhs_b) rhs_a        plain application
//! (=:) rhs_a (\a. (=:) rhs_b (\b. body))   written as \a := rhs_a ; ...
//! ```
//!
//! and the two forms may be mixed. [`inject`] replaces `body` with another
//! expression, so a test call such as `sum 17` can run in the scope of a
//! submission's definitions.

use crate::parser::{Expr, ExprKind};

/// The operator produced by `\x := value ; body`.
pub const DEFINE_OP: &str = "=:";

/// Replaces the innermost body of `program`'s definition chain with
/// `fragment`. When `program` is not a definition at all, the result is
/// `fragment` alone.
pub fn inject(mut program: Expr, fragment: Expr) -> Expr {
    splice(&mut program, fragment);
    program
}

fn splice(expr: &mut Expr, fragment: Expr) {
    match definition_body(expr) {
        Some(body) => splice(body, fragment),
        None => *expr = fragment,
    }
}

/// The body under the binder of a definition, if `expr` is one.
fn definition_body(expr: &mut Expr) -> Option<&mut Expr> {
    let ExprKind::Apply { func, arg } = &mut expr.kind else {
        return None;
    };
    let binder = if matches!(func.kind, ExprKind::Lambda { .. }) {
        func
    } else if is_define(func) {
        arg
    } else {
        return None;
    };
    match &mut binder.kind {
        ExprKind::Lambda { body, .. } => Some(body.as_mut()),
        _ => None,
    }
}

/// `(=:) rhs`
fn is_define(partial: &Expr) -> bool {
    match &partial.kind {
        ExprKind::Apply { func, .. } => {
            matches!(&func.kind, ExprKind::Ident(name) if name == DEFINE_OP)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::diagnostics::Source;
    use crate::parser::parse;

    fn ast(text: &str) -> Expr {
        parse(&Rc::new(Source::new("<TEST>", text)), &[]).expect("parse failed")
    }

    #[test]
    fn test_inject_into_application_chain() {
        let program = ast("(\\a.(\\b.b) 2) 1");
        assert_eq!(
            inject(program, ast("a + b")),
            ast("(\\a.(\\b.a + b) 2) 1")
        );
    }

    #[test]
    fn test_inject_into_define_chain() {
        let program = ast("\\sq := \\n.n * n ; \\x := 3 ; sq x");
        assert_eq!(
            inject(program, ast("sq 4")),
            ast("\\sq := \\n.n * n ; \\x := 3 ; sq 4")
        );
    }

    #[test]
    fn test_inject_through_mixed_chain() {
        let program = ast("(\\a. \\b := a ; b) 1");
        assert_eq!(inject(program, ast("0")), ast("(\\a. \\b := a ; 0) 1"));
    }

    #[test]
    fn test_flat_program_is_replaced() {
        assert_eq!(inject(ast("1 + 2"), ast("f 3")), ast("f 3"));
        assert_eq!(inject(ast("\\x.x"), ast("7")), ast("7"));
    }

    #[test]
    fn test_other_operators_are_not_definitions() {
        // `(+) 1 (\x.x)` has the shape of a definition but not its operator.
        assert_eq!(inject(ast("1 + \\x.x"), ast("2")), ast("2"));
    }
}
