//! Tests for the run pipeline and its rendered output.

use std::time::Duration;

use indoc::indoc;
use pretty_assertions::assert_eq;

use super::*;
use crate::prelude::{Definition, Prelude};
use crate::test_utils;

fn standard() -> RunOptions {
    RunOptions::default().with_prelude(Prelude::Standard)
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_value_follows_printed_output() {
    test_utils::init_test_logging();
    let text = indoc! {r#"
        \greet := \who. print ("hello " + who) ;
        \unused := greet "world" ;
        greet "again"
    "#};
    // `unused` is never demanded, so only the final greeting runs.
    assert_eq!(run("main", text, &standard()), "hello again\n=> hello again");
}

#[test]
fn test_compile_error_has_no_output() {
    assert_eq!(
        run("main", "print 1 + foo", &standard()),
        "Compile Error\nmain:1:11: name foo is not bound"
    );
}

#[test]
fn test_runtime_error_keeps_output() {
    assert_eq!(
        run("main", "print \"a\" + (1 2)", &standard()),
        "a\nRuntime Error\n1 is not a function (a value was used as if it were callable; check the argument types)"
    );
}

#[test]
fn test_timeout() {
    let options = standard().with_time_limit(Duration::from_millis(100));
    assert_eq!(run("main", "U U", &options), "Timeout");
}

#[test]
fn test_frame_limit_is_a_runtime_error() {
    let options = standard().with_max_frames(Some(100));
    let text = "Y (\\f.\\n. if (n == 0) 0 (n + f (n - 1))) 5000";
    assert_eq!(
        run("main", text, &options),
        "Runtime Error\nevaluation stack exceeds maximum of 100 frames"
    );
}

#[test]
fn test_divergent_recursion_stops_at_lowered_frame_cap() {
    let options = standard()
        .with_max_frames(Some(50_000))
        .with_time_limit(Duration::from_secs(30));
    let outcome = execute("main", "U (\\x. 1 + x x)", &options);
    assert!(matches!(
        outcome.result,
        Err(Error::ResourceExceeded { max_frames: 50_000 })
    ));
    assert_eq!(
        outcome.to_string(),
        "Runtime Error\nevaluation stack exceeds maximum of 50000 frames"
    );
}

#[test]
fn test_prelude_errors_are_not_positioned() {
    let options = RunOptions::default()
        .with_prelude(Prelude::Custom(vec![Definition::new("bad", "nope")]));
    assert_eq!(
        run("main", "1", &options),
        "Compile Error\n<PREDEF>: name nope is not bound"
    );
}

#[test]
fn test_custom_prelude() {
    let options = RunOptions::default().with_prelude(Prelude::Custom(vec![
        Definition::new("(+)", "\\l.\\r. @add l r"),
        Definition::new("twice", "\\f.\\x. f (f x)"),
    ]));
    assert_eq!(run("main", "twice (\\n. n + 10) 1", &options), "=> 21");
}

// ============================================================================
// Injection
// ============================================================================

#[test]
fn test_inject_replaces_final_body() {
    let options = standard().with_inject_body("x * 2");
    assert_eq!(run("main", "\\x := 5 ; print x", &options), "=> 10");
}

#[test]
fn test_inject_ignores_unrelated_definitions() {
    let text = indoc! {r#"
        \unused := 1 2 ;
        \sum := Y (\f.\n. if (n == 0) 0 (n + f (n - 1))) ;
        sum 3
    "#};
    let options = standard().with_inject_body("sum 10");
    assert_eq!(run("main", text, &options), "=> 55");
}

#[test]
fn test_injected_fragment_is_positioned_in_its_own_text() {
    let options = standard().with_inject_body("sum 10");
    assert_eq!(
        run("main", "\\total := 0 ; total", &options),
        "Compile Error\n<INJECT>:1:1: name sum is not bound"
    );
}

// ============================================================================
// Compiled programs
// ============================================================================

#[test]
fn test_compiled_program_runs_repeatedly() {
    let program = compile("main", "print \"tick\"", &standard()).unwrap();
    let options = ExecutionOptions::default();
    for _ in 0..3 {
        assert_eq!(program.execute(&options).to_string(), "tick\n=> tick");
    }
    assert_eq!(program.source().name(), "main");
}

#[test]
fn test_outcome_result() {
    let outcome = execute("main", "@div 7 0", &RunOptions::default());
    assert!(!outcome.is_success());
    assert!(matches!(outcome.result, Err(Error::Runtime(_))));

    let outcome = execute("main", "@mul 6 7", &RunOptions::default());
    assert_eq!(outcome.result.unwrap().as_number(), Some(42));
}

#[test]
fn test_diagnostic_for_unbound_name() {
    let err = compile("main", "\\x.\n  foo", &RunOptions::default()).unwrap_err();
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.location, "main:2:3");
    assert_eq!(diagnostic.message, "name foo is not bound");
    assert_eq!(diagnostic.span, Some(6..9));
    assert!(diagnostic.help.is_some());
    assert_eq!(diagnostic.to_string(), "main:2:3: name foo is not bound");
}

#[test]
fn test_diagnostic_for_missing_arguments() {
    let err = compile("main", "@if 1", &RunOptions::default()).unwrap_err();
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.message, "wrong number of arguments for builtin");
    assert_eq!(
        diagnostic.help.as_deref(),
        Some("the builtin needs 2 more arguments")
    );
}
