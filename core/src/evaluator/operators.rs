//! Strict builtins on forced arguments.

use ecow::{EcoString, eco_format};

use crate::builtins::Builtin;
use crate::evaluator::RuntimeError;
use crate::evaluator::value::Value;

fn mismatch(builtin: Builtin, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        builtin: builtin.name(),
        found: found.describe(),
    }
}

fn overflow(builtin: Builtin) -> RuntimeError {
    RuntimeError::Overflow {
        builtin: builtin.name(),
    }
}

/// Applies a strict builtin other than `@print` to its forced arguments.
pub(super) fn apply_strict(builtin: Builtin, args: &[Value]) -> Result<Value, RuntimeError> {
    match (builtin, args) {
        (Builtin::Length, [Value::Str(s)]) => Ok(Value::Number(s.chars().count() as i64)),
        (Builtin::Length, [other]) => Err(mismatch(builtin, other)),

        (Builtin::Add, [Value::Number(a), Value::Number(b)]) => {
            a.checked_add(*b).map(Value::Number).ok_or_else(|| overflow(builtin))
        }
        (Builtin::Add, [a @ (Value::Str(_) | Value::Number(_)), b @ (Value::Str(_) | Value::Number(_))]) => {
            Ok(Value::Str(concat(a, b)))
        }
        (Builtin::Sub, [Value::Number(a), Value::Number(b)]) => {
            a.checked_sub(*b).map(Value::Number).ok_or_else(|| overflow(builtin))
        }
        (Builtin::Mul, [Value::Number(a), Value::Number(b)]) => {
            a.checked_mul(*b).map(Value::Number).ok_or_else(|| overflow(builtin))
        }
        (Builtin::Div, [Value::Number(a), Value::Number(b)]) => floor_div(*a, *b).map(Value::Number),
        (Builtin::Mod, [Value::Number(a), Value::Number(b)]) => {
            if *b == 0 {
                return Err(RuntimeError::DivisionByZero {
                    builtin: builtin.name(),
                });
            }
            // `i64::MIN % -1` is the only other `None`, and it is 0.
            Ok(Value::Number(a.checked_rem(*b).unwrap_or(0)))
        }

        (Builtin::Eq, [a, b]) => Ok(Value::boolean(match (a, b) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        })),
        (Builtin::Lt, [Value::Number(a), Value::Number(b)]) => Ok(Value::boolean(a < b)),
        (Builtin::Lt, [Value::Str(a), Value::Str(b)]) => Ok(Value::boolean(a < b)),
        (Builtin::Le, [Value::Number(a), Value::Number(b)]) => Ok(Value::boolean(a <= b)),
        (Builtin::Le, [Value::Str(a), Value::Str(b)]) => Ok(Value::boolean(a <= b)),

        (_, [a, b]) => {
            let culprit = [a, b]
                .into_iter()
                .find(|v| v.is_function())
                .or_else(|| [a, b].into_iter().find(|v| v.as_number().is_none()))
                .unwrap_or(b);
            Err(mismatch(builtin, culprit))
        }
        (_, args) => Err(RuntimeError::TypeMismatch {
            builtin: builtin.name(),
            found: format!("{} arguments", args.len()),
        }),
    }
}

/// Division rounding towards negative infinity.
fn floor_div(a: i64, b: i64) -> Result<i64, RuntimeError> {
    let builtin = Builtin::Div.name();
    if b == 0 {
        return Err(RuntimeError::DivisionByZero { builtin });
    }
    let quotient = a.checked_div(b).ok_or(RuntimeError::Overflow { builtin })?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

fn concat(a: &Value, b: &Value) -> EcoString {
    eco_format!("{}{}", a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: i64) -> Value {
        Value::Number(n)
    }

    fn text(s: &str) -> Value {
        Value::Str(s.into())
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(apply_strict(Builtin::Add, &[num(2), num(3)]), Ok(num(5)));
        assert_eq!(apply_strict(Builtin::Sub, &[num(2), num(3)]), Ok(num(-1)));
        assert_eq!(apply_strict(Builtin::Mul, &[num(-4), num(3)]), Ok(num(-12)));
    }

    #[test]
    fn test_division_floors() {
        assert_eq!(apply_strict(Builtin::Div, &[num(7), num(2)]), Ok(num(3)));
        assert_eq!(apply_strict(Builtin::Div, &[num(-7), num(2)]), Ok(num(-4)));
        assert_eq!(apply_strict(Builtin::Div, &[num(7), num(-2)]), Ok(num(-4)));
        assert_eq!(apply_strict(Builtin::Div, &[num(-8), num(2)]), Ok(num(-4)));
    }

    #[test]
    fn test_modulo_keeps_sign_of_dividend() {
        assert_eq!(apply_strict(Builtin::Mod, &[num(7), num(3)]), Ok(num(1)));
        assert_eq!(apply_strict(Builtin::Mod, &[num(-7), num(3)]), Ok(num(-1)));
        assert_eq!(apply_strict(Builtin::Mod, &[num(i64::MIN), num(-1)]), Ok(num(0)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            apply_strict(Builtin::Div, &[num(1), num(0)]),
            Err(RuntimeError::DivisionByZero { builtin: "div" })
        );
        assert_eq!(
            apply_strict(Builtin::Mod, &[num(1), num(0)]),
            Err(RuntimeError::DivisionByZero { builtin: "mod" })
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            apply_strict(Builtin::Add, &[num(i64::MAX), num(1)]),
            Err(RuntimeError::Overflow { builtin: "add" })
        );
        assert_eq!(
            apply_strict(Builtin::Div, &[num(i64::MIN), num(-1)]),
            Err(RuntimeError::Overflow { builtin: "div" })
        );
    }

    #[test]
    fn test_add_concatenates_strings() {
        assert_eq!(apply_strict(Builtin::Add, &[text("ab"), text("cd")]), Ok(text("abcd")));
        assert_eq!(apply_strict(Builtin::Add, &[text("n="), num(4)]), Ok(text("n=4")));
        assert_eq!(apply_strict(Builtin::Add, &[num(4), text("!")]), Ok(text("4!")));
    }

    #[test]
    fn test_length_counts_characters() {
        assert_eq!(apply_strict(Builtin::Length, &[text("héllo")]), Ok(num(5)));
        assert_eq!(
            apply_strict(Builtin::Length, &[num(12)]),
            Err(RuntimeError::TypeMismatch {
                builtin: "length",
                found: "number 12".into()
            })
        );
    }

    #[test]
    fn test_comparisons() {
        let show = |b: Builtin, args: &[Value]| apply_strict(b, args).map(|v| v.to_string());
        assert_eq!(show(Builtin::Eq, &[num(1), num(1)]), Ok("<builtin @true>".into()));
        assert_eq!(show(Builtin::Eq, &[num(1), text("1")]), Ok("<builtin @false>".into()));
        assert_eq!(show(Builtin::Lt, &[num(1), num(2)]), Ok("<builtin @true>".into()));
        assert_eq!(show(Builtin::Le, &[text("b"), text("a")]), Ok("<builtin @false>".into()));
        assert!(show(Builtin::Lt, &[num(1), text("a")]).is_err());
    }

    #[test]
    fn test_mismatch_names_the_offending_value() {
        assert_eq!(
            apply_strict(Builtin::Sub, &[num(1), text("x")]),
            Err(RuntimeError::TypeMismatch {
                builtin: "sub",
                found: "string \"x\"".into()
            })
        );
    }
}
