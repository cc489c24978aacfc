//! Definitions wrapped around a program before it is parsed.

use std::borrow::Cow;

/// One prelude entry: `name` is bound to `body` for everything after it.
///
/// `name` is written as it would appear after a `\`, so operators are given
/// in parentheses: `(+)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub body: String,
}

impl Definition {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

/// Which definitions a run sees before its own code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Prelude {
    #[default]
    None,
    /// The standard combinator library, see [`STANDARD`].
    Standard,
    Custom(Vec<Definition>),
}

impl Prelude {
    pub fn definitions(&self) -> Cow<'_, [Definition]> {
        match self {
            Prelude::None => Cow::Borrowed(&[]),
            Prelude::Standard => Cow::Owned(standard()),
            Prelude::Custom(defs) => Cow::Borrowed(defs),
        }
    }
}

/// The standard prelude, outermost first.
///
/// Infix operators receive their left operand first: `a + b` is
/// `((+) a) b`. The `(=:)` operator is the one produced by
/// `\x := value ; body`.
pub const STANDARD: &[(&str, &str)] = &[
    ("(=:)", "\\x.\\f.f x"),
    ("(|>)", "\\x.\\f.f x"),
    ("($)", "\\f.\\x.f x"),
    ("(+)", "\\l.\\r. @add l r"),
    ("(-)", "\\l.\\r. @sub l r"),
    ("(*)", "\\l.\\r. @mul l r"),
    ("(/)", "\\l.\\r. @div l r"),
    ("(%)", "\\l.\\r. @mod l r"),
    ("(**)", "\\f.\\g.\\x.f (g x)"),
    ("(!)", "@not"),
    ("(&)", "\\l.\\r. @and l r"),
    ("(|)", "\\l.\\r. @or l r"),
    ("if", "@if"),
    ("(==)", "@eq"),
    ("(!=)", "\\l.\\r. @not (@eq l r)"),
    ("(<=)", "\\l.\\r. @le l r"),
    ("(<)", "\\l.\\r. @lt l r"),
    ("(>=)", "\\l.\\r. @le r l"),
    ("(>)", "\\l.\\r. @lt r l"),
    ("print", "@print"),
    ("(,)", "\\l.\\r. @pair l r"),
    ("first", "@first"),
    ("second", "@second"),
    ("nil", "@nil"),
    ("(:)", "\\l.\\r. @append l r"),
    ("head", "@head"),
    ("tail", "@tail"),
    ("isEmpty", "@isEmpty"),
    ("I", "\\x.x"),
    ("K", "\\x.\\y.x"),
    ("S", "\\x.\\y.\\z.x z (y z)"),
    ("U", "\\f.f f"),
    ("Y", "\\f.U \\y.\\a.f (y y) a"),
    ("Z", "\\f.U \\z.f \\v.z z v"),
];

pub fn standard() -> Vec<Definition> {
    STANDARD
        .iter()
        .map(|(name, body)| Definition::new(*name, *body))
        .collect()
}
