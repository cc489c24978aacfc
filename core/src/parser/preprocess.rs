//! Text preparation before parsing: wrap the prelude around the program and
//! blank out comments and layout characters.

use crate::prelude::Definition;

/// Program text ready for the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    pub text: String,
    /// Length of the prelude prefix in front of the user's text. Subtracting
    /// it from a parser position yields an offset into the user's text.
    pub offset: usize,
}

/// Wraps `src` in the definitions, outermost first, as
/// `(\name.( ... ))(body)`, so that every definition sees the ones before it
/// and the program sees all of them.
///
/// Line comments (`#` up to the end of the line, outside string literals) and
/// the characters `\n \r \t \v` are replaced with spaces byte for byte, so
/// offsets into the result still point at the same characters.
pub fn preprocess(src: &str, predefined: &[Definition]) -> Preprocessed {
    let mut prefix = String::new();
    let mut suffix = String::new();
    for def in predefined {
        prefix.push_str("(\\");
        prefix.push_str(&def.name);
        prefix.push_str(".(");
        suffix = format!("))({}){}", def.body, suffix);
    }
    tracing::trace!(definitions = predefined.len(), prefix_len = prefix.len(), "Wrapped prelude");

    let offset = prefix.len();
    let mut text = String::with_capacity(offset + src.len() + suffix.len());
    blank_layout(&prefix, &mut text);
    blank_layout(src, &mut text);
    blank_layout(&suffix, &mut text);

    Preprocessed { text, offset }
}

/// A paren or string literal left open or closed too often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unbalanced {
    /// A `)` at this offset with no `(` open.
    Close(usize),
    /// A `(` still open at the end.
    Open,
    /// A string literal still open at the end.
    String,
}

/// Finds the first unbalanced paren or string in `text`, which has already
/// been through [`preprocess`]. Parens inside string literals do not count.
pub fn unbalanced(text: &str) -> Option<Unbalanced> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'(' => depth += 1,
            b')' if depth == 0 => return Some(Unbalanced::Close(i)),
            b')' => depth -= 1,
            _ => {}
        }
    }

    if in_string {
        Some(Unbalanced::String)
    } else if depth > 0 {
        Some(Unbalanced::Open)
    } else {
        None
    }
}

fn blank_layout(input: &str, out: &mut String) {
    let mut in_comment = false;
    let mut in_string = false;
    let mut escaped = false;

    for c in input.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                out.push(' ');
            } else {
                out.extend(std::iter::repeat_n(' ', c.len_utf8()));
            }
            continue;
        }

        match c {
            '\n' | '\r' | '\t' | '\u{b}' => out.push(' '),
            '#' if !in_string => {
                in_comment = true;
                out.push(' ');
            }
            _ => out.push(c),
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        }
    }
}
