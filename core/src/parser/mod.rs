mod cursor;
pub mod error;
mod parsed_expr;
pub mod parser;
mod preprocess;
pub mod syntax;

pub use error::{Found, ParseError, ParseErrorKind};
pub use parsed_expr::{Expr, ExprKind};
pub use parser::{DEFAULT_MAX_DEPTH, parse, parse_with_max_depth};
pub use preprocess::{Preprocessed, preprocess};

#[cfg(test)]
mod parse_test;
