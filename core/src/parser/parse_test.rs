use std::rc::Rc;

use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::diagnostics::Source;
use crate::parser::{
    DEFAULT_MAX_DEPTH, Expr, ExprKind, Found, ParseError, ParseErrorKind, parse,
    parse_with_max_depth,
};
use crate::prelude::{self, Definition};

fn source(text: &str) -> Rc<Source> {
    Rc::new(Source::new("<TEST>", text))
}

fn ast(text: &str) -> Expr {
    parse(&source(text), &[]).unwrap_or_else(|e| panic!("Expression parsing failed: {}\n{}", text, e))
}

fn parse_err(text: &str) -> ParseError {
    match parse(&source(text), &[]) {
        Ok(expr) => panic!("Expected {:?} to fail, got {}", text, expr),
        Err(err) => err,
    }
}

/// Renders the tree and parses the rendering again.
fn round_trip(text: &str) {
    let first = ast(text);
    let printed = first.to_string();
    let second = ast(&printed);
    assert_eq!(first, second, "{} printed as {}", text, printed);
}

// ============================================================================
// Terms
// ============================================================================

#[test]
fn test_number() {
    assert_eq!(ast("42").kind, ExprKind::Number(42));
    assert_eq!(ast("-7").kind, ExprKind::Number(-7));
    assert_eq!(ast("+3").kind, ExprKind::Number(3));
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        ast(r#""a\tb\n\"q\" \\ \'""#).kind,
        ExprKind::Str("a\tb\n\"q\" \\ '".into())
    );
}

#[test]
fn test_identifier_and_builtin() {
    assert_eq!(ast("foo_1").kind, ExprKind::Ident("foo_1".into()));
    assert_eq!(ast("@add").kind, ExprKind::Builtin("add".into()));
    assert_eq!(ast("( + )").kind, ExprKind::Ident("+".into()));
}

#[test]
fn test_lambda() {
    let expr = ast("\\x. x");
    let ExprKind::Lambda { param, body } = &expr.kind else {
        panic!("expected a lambda");
    };
    assert_eq!(param, "x");
    assert_eq!(body.kind, ExprKind::Ident("x".into()));
}

#[test]
fn test_lambda_without_parameter_binds_underscore() {
    assert_eq!(ast("\\.1"), ast("\\_.1"));
}

#[test]
fn test_lambda_over_operator() {
    let expr = ast("\\(+).1 + 2");
    let ExprKind::Lambda { param, .. } = &expr.kind else {
        panic!("expected a lambda");
    };
    assert_eq!(param, "+");
}

#[test]
fn test_operator_section_sugar() {
    assert_eq!(ast("\\x := 5 ; x"), ast("(=:) 5 (\\x.x)"));
    assert_eq!(ast("\\x <- m ; f x"), ast("(->) m (\\x.f x)"));
    assert_eq!(ast("\\x <= m ; x"), ast("(=>) m (\\x.x)"));
}

#[test]
fn test_sugar_chains() {
    let program = indoc! {r#"
        \a := 1 ;
        \b := a + 1 ;
        b
    "#};
    assert_eq!(ast(program), ast("(=:) 1 (\\a.(=:) (a + 1) (\\b.b))"));
}

// ============================================================================
// Layout and comments
// ============================================================================

#[test]
fn test_comments_and_layout_are_blank() {
    let program = indoc! {"
        # a comment
        f\tx   # trailing comment
          y
    "};
    assert_eq!(ast(program), ast("f x y"));
}

#[test]
fn test_hash_in_string_is_not_a_comment() {
    assert_eq!(ast("\"#1\"").kind, ExprKind::Str("#1".into()));
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_positions_are_user_offsets() {
    let expr = ast("f  (g x)");
    let ExprKind::Apply { func, arg } = &expr.kind else {
        panic!("expected an application");
    };
    assert_eq!(func.pos.offset, 0);
    assert_eq!(arg.pos.offset, 4);
}

#[test]
fn test_positions_skip_the_prelude() {
    let defs = vec![Definition::new("one", "1"), Definition::new("two", "2")];
    let expr = parse(&source("  one"), &defs).unwrap();

    // Walk down the wrapping to the user's program.
    let mut node = &expr;
    loop {
        match &node.kind {
            ExprKind::Apply { func, .. } => match &func.kind {
                ExprKind::Lambda { body, .. } => node = body,
                _ => break,
            },
            _ => break,
        }
    }
    assert_eq!(node.kind, ExprKind::Ident("one".into()));
    assert_eq!(node.pos.offset, 2);
    assert_eq!(node.pos.location().to_string(), "<TEST>:1:3");
}

#[test]
fn test_standard_prelude_parses() {
    let parsed = parse(&source("1 + 2"), &prelude::standard());
    assert!(parsed.is_ok());
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_round_trip() {
    round_trip("1 + 2 * 3");
    round_trip("\\x.\\y.x + y * 2");
    round_trip("f (g x) (-3) \"s\\n\"");
    round_trip("(\\x.x x) (\\x.x x)");
    round_trip("\\x := 5 ; \\y := x : nil ; y");
    round_trip("a : b , c $ d ~ e");
    round_trip("@if (@lt 1 2) \"a\" \"b\"");
    round_trip("! a & b");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_close_paren() {
    let err = parse_err("(a");
    assert_eq!(
        err.kind,
        ParseErrorKind::Unexpected {
            found: Found::Eof,
            expected: "expect ')'"
        }
    );
    assert_eq!(err.to_string(), "<TEST>:1:3: unexpected EOF, expect ')'");
}

#[test]
fn test_trailing_input() {
    let err = parse_err("a )");
    assert_eq!(
        err.kind,
        ParseErrorKind::Trailing {
            found: Found::Char(')')
        }
    );
    assert_eq!(err.to_string(), "<TEST>:1:3: unexpected ')'");
}

#[test]
fn test_empty_program() {
    assert_eq!(
        parse_err("").to_string(),
        "<TEST>:1:1: unexpected EOF, expect expression"
    );
    assert_eq!(
        parse_err("   # only a comment").message(),
        "unexpected EOF, expect expression"
    );
}

#[test]
fn test_lambda_needs_dot_or_operator() {
    assert_eq!(
        parse_err("\\x x").to_string(),
        "<TEST>:1:4: unexpected 'x', expect '.' or operator"
    );
}

#[test]
fn test_lambda_needs_body() {
    assert_eq!(
        parse_err("\\x.").message(),
        "unexpected EOF, expect body of lambda"
    );
}

#[test]
fn test_sugar_needs_semicolon() {
    assert_eq!(
        parse_err("\\x := 1 x").message(),
        "unexpected EOF, expect ';'"
    );
}

#[test]
fn test_operator_needs_rhs() {
    assert_eq!(
        parse_err("a +").to_string(),
        "<TEST>:1:4: unexpected EOF, expect RHS of operator"
    );
}

#[test]
fn test_unterminated_string() {
    let err = parse_err("\"abc");
    assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
    assert_eq!(err.to_string(), "<TEST>:1:5: wrong string format");
}

#[test]
fn test_builtin_needs_name() {
    assert_eq!(
        parse_err("@ x").to_string(),
        "<TEST>:1:2: expect identifier after '@'"
    );
}

#[test]
fn test_number_out_of_range() {
    let err = parse_err("99999999999999999999");
    assert_eq!(
        err.to_string(),
        "<TEST>:1:1: number 99999999999999999999 is out of range"
    );
}

#[test]
fn test_error_on_second_line() {
    let err = parse_err("f x\n  (y");
    assert_eq!(err.to_string(), "<TEST>:2:5: unexpected EOF, expect ')'");
}

#[test]
fn test_error_inside_prelude_has_no_position() {
    let defs = vec![Definition::new("bad", "(")];
    let err = parse(&source("1"), &defs).unwrap_err();
    assert_eq!(err.to_string(), "<PREDEF>: unexpected ')', incorrect paren body");
}

#[test]
fn test_errors_at_program_end_match_bare_parse() {
    for text in ["1 +", "(f x", "\\x.", "1 + (2", "\"open"] {
        let bare = parse(&source(text), &[]).unwrap_err();
        let wrapped = parse(&source(text), &prelude::standard()).unwrap_err();
        assert_eq!(wrapped.to_string(), bare.to_string(), "for {:?}", text);
    }
    assert_eq!(
        parse(&source("1 +"), &prelude::standard()).unwrap_err().to_string(),
        "<TEST>:1:4: unexpected EOF, expect RHS of operator"
    );
}

#[test]
fn test_stray_paren_under_prelude_keeps_position() {
    let err = parse(&source("f 1) 2"), &prelude::standard()).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Trailing { found: Found::Char(')') });
    assert_eq!(err.to_string(), "<TEST>:1:4: unexpected ')'");
}

#[test]
fn test_parens_in_strings_and_comments_do_not_count() {
    let defs = prelude::standard();
    assert!(parse(&source("print \")\" # (\n1"), &defs).is_ok());
}

#[test]
fn test_long_flat_chain() {
    let text = vec!["x"; 100_000].join(" + ");
    let expr = ast(&text);
    assert!(matches!(expr.kind, ExprKind::Apply { .. }));
}

#[test]
fn test_max_depth() {
    let err = parse_with_max_depth(&source("((((1))))"), &[], 3).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MaxDepthExceeded { max_depth: 3 });

    assert!(parse_with_max_depth(&source("((((1))))"), &[], 10).is_ok());
}

#[test]
fn test_deep_nesting_within_default_limit() {
    let depth = DEFAULT_MAX_DEPTH / 4;
    let text = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(ast(&text).kind, ExprKind::Number(1));
}
