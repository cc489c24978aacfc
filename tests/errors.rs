#[macro_use]
mod cases;

use indoc::indoc;
use lazylam::{Definition, Prelude, RunOptions};

// ============================================================================
// Compile errors
// ============================================================================

test_case!(
    unbound_name,
    input: "\\x. x foo",
    output: "Compile Error\n<TEST>:1:7: name foo is not bound",
);

test_case!(
    unbound_name_on_later_line,
    input: indoc! {r#"
        \double := \n. n * 2 ;
        duble 4
    "#},
    output: "Compile Error\n<TEST>:2:1: name duble is not bound",
);

test_case!(
    unknown_builtin,
    input: "@frobnicate 1",
    output: "Compile Error\n<TEST>:1:1: name @frobnicate is not bound",
);

test_case!(
    missing_builtin_arguments,
    bare: "@add 1",
    output: "Compile Error\n<TEST>:1:1: wrong number of arguments for builtin",
);

test_case!(
    unclosed_paren,
    bare: "(\\x.x",
    output: "Compile Error\n<TEST>:1:6: unexpected EOF, expect ')'",
);

test_case!(
    unterminated_string,
    bare: "\"abc",
    output: "Compile Error\n<TEST>:1:5: wrong string format",
);

test_case!(
    missing_operand_at_end_under_prelude,
    input: "1 +",
    output: "Compile Error\n<TEST>:1:4: unexpected EOF, expect RHS of operator",
);

test_case!(
    unclosed_paren_under_prelude,
    input: "(\\x.x",
    output: "Compile Error\n<TEST>:1:6: unexpected EOF, expect ')'",
);

test_case!(
    stray_paren_under_prelude,
    input: "1)",
    output: "Compile Error\n<TEST>:1:2: unexpected ')'",
);

test_case!(
    program_cannot_close_the_prelude,
    input: "nil)(\\x.x",
    output: "Compile Error\n<TEST>:1:4: unexpected ')'",
);

test_case!(
    unterminated_string_under_prelude,
    input: "print \"abc",
    output: "Compile Error\n<TEST>:1:11: wrong string format",
);

#[test]
fn prelude_error_has_no_position() {
    let options = RunOptions::default()
        .with_prelude(Prelude::Custom(vec![Definition::new("broken", "(")]));
    assert_eq!(
        lazylam::run("<TEST>", "1", &options),
        "Compile Error\n<PREDEF>: unexpected ')', incorrect paren body"
    );
}

// ============================================================================
// Runtime errors
// ============================================================================

test_case!(
    applying_a_number,
    input: "print \"before\" + (1 2)",
    output: "before\nRuntime Error\n1 is not a function (a value was used as if it were callable; check the argument types)",
);

test_case!(
    applying_a_string,
    input: "\"text\" 1",
    output: "Runtime Error\ntext is not a function (a value was used as if it were callable; check the argument types)",
);

test_case!(
    arithmetic_on_a_function,
    input: "1 + (\\x.x)",
    output: "Runtime Error\n@add cannot be applied to <function>",
);

test_case!(
    subtracting_a_string,
    input: "\"a\" - 1",
    output: "Runtime Error\n@sub cannot be applied to string \"a\"",
);
