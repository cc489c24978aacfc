// Lexical classes, operator priorities and string escapes shared by the
// parser and the AST printer.

/// Characters that may form an operator.
pub const OPERATOR_CHARS: &str = "~!$%^&*-+=|:<>/?,";

pub fn is_op_char(c: u8) -> bool {
    OPERATOR_CHARS.as_bytes().contains(&c)
}

pub fn is_id_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// True when `name` is spelled with operator characters and must be written
/// as `(op)` to be used as an identifier.
pub fn is_operator_name(name: &str) -> bool {
    name.bytes().next().is_some_and(is_op_char)
}

/// Binding power of an operator, in half steps, decided by its first
/// character. Implicit application is the empty operator and binds tightest.
///
/// | first char        | priority |
/// |-------------------|----------|
/// | `* / %`           | 8        |
/// | `+ -`             | 7        |
/// | `! = < >`         | 6        |
/// | `&`               | 5        |
/// | `\|`              | 4        |
/// | `^`               | 3        |
/// | `: ,`             | 2.5      |
/// | `~`               | 2        |
/// | `$`               | 0.5      |
/// | anything else     | 10       |
pub fn binding_power(op: &str) -> u8 {
    match op.bytes().next() {
        Some(b'*' | b'/' | b'%') => 16,
        Some(b'+' | b'-') => 14,
        Some(b'!' | b'=' | b'<' | b'>') => 12,
        Some(b'&') => 10,
        Some(b'|') => 8,
        Some(b'^') => 6,
        Some(b':' | b',') => 5,
        Some(b'~') => 4,
        Some(b'$') => 1,
        _ => 20,
    }
}

/// Whether the operator already waiting on the stack must be reduced before
/// `incoming` is shifted.
///
/// The waiting operator's priority is rounded down to a whole step, so the
/// half-step operators (`:`, `,`, `$`) associate to the right while every
/// other operator associates to the left.
pub fn reduces_before(waiting: &str, incoming: &str) -> bool {
    binding_power(incoming) <= binding_power(waiting) & !1
}

/// Mirror an operator for the `\x OP rhs ; body` form: the characters are
/// reversed and `<`/`>` swap, so `<-` becomes `->` and `<=` becomes `=>`.
pub fn reverse_op(op: &str) -> String {
    op.chars()
        .rev()
        .map(|c| match c {
            '<' => '>',
            '>' => '<',
            c => c,
        })
        .collect()
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape`]. Any other escaped character stands for itself.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_op() {
        assert_eq!(reverse_op(":="), "=:");
        assert_eq!(reverse_op("<-"), "->");
        assert_eq!(reverse_op("<="), "=>");
        assert_eq!(reverse_op("|>"), "<|");
    }

    #[test]
    fn test_associativity() {
        // Left associative: equal priority reduces.
        assert!(reduces_before("+", "-"));
        assert!(reduces_before("", ""));
        // Right associative half steps.
        assert!(!reduces_before(":", ":"));
        assert!(!reduces_before(",", ":"));
        assert!(!reduces_before("$", "$"));
        // Priority order.
        assert!(!reduces_before("+", "*"));
        assert!(reduces_before("*", "+"));
        assert!(reduces_before(":", "~"));
        assert!(!reduces_before("~", ":"));
    }

    #[test]
    fn test_escape_unescape() {
        let raw = "a\"b\\c\n\t\0'";
        assert_eq!(escape(raw), "a\\\"b\\\\c\\n\\t\\0\\'");
        assert_eq!(unescape(&escape(raw)), raw);
        assert_eq!(unescape("\\q"), "q");
    }
}
