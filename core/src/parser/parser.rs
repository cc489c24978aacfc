//! Backtracking recursive-descent parser with operator-precedence climbing.
//!
//! ```text
//! line := term? (op? term)*
//! term := '(' op ')' | '(' line ')' | '@' ident | lambda
//!       | number | string | ident
//! lambda := '\' param? '.' line
//!         | '\' param? op line ';' line
//! ```
//!
//! Terms are tried in order and the first one that matches wins. An
//! alternative that does not match restores the cursor; an alternative that
//! matched its leading character and then misses a required piece fails the
//! whole parse.

use std::rc::Rc;

use ecow::EcoString;

use crate::diagnostics::{Pos, Source};
use crate::parser::cursor::Cursor;
use crate::parser::error::{Found, ParseError, ParseErrorKind};
use crate::parser::parsed_expr::{Expr, ExprKind};
use crate::parser::preprocess::{Unbalanced, preprocess, unbalanced};
use crate::parser::syntax::{is_id_char, is_op_char, reduces_before, reverse_op, unescape};
use crate::prelude::Definition;

pub const DEFAULT_MAX_DEPTH: usize = 1000;

type PResult<T> = Result<T, ParseError>;

type Alternative<'s> = fn(&mut Parser<'s>) -> PResult<Option<Expr>>;

/// Parse a program, wrapped in `predefined`, with the default nesting limit.
pub fn parse(source: &Rc<Source>, predefined: &[Definition]) -> Result<Expr, ParseError> {
    parse_with_max_depth(source, predefined, DEFAULT_MAX_DEPTH)
}

/// Parse a program, wrapped in `predefined`, failing once expressions nest
/// deeper than `max_depth`.
///
/// Positions in the returned tree are offsets into `source`'s own text; the
/// prelude's nodes get offsets outside it.
pub fn parse_with_max_depth(
    source: &Rc<Source>,
    predefined: &[Definition],
    max_depth: usize,
) -> Result<Expr, ParseError> {
    let preprocessed = preprocess(source.text(), predefined);
    let user_end = preprocessed.offset + source.text().len();
    let mut parser = Parser {
        cursor: Cursor::new(&preprocessed.text),
        source: Rc::clone(source),
        offset: preprocessed.offset,
        user_end,
        depth: 0,
        max_depth,
    };

    // Inside a prelude, an unmatched paren in the program would pair up
    // with the prelude's own and move the error out of the user's text.
    if !predefined.is_empty() {
        if let Some(user) = preprocessed.text.get(preprocessed.offset..user_end) {
            parser.check_balance(user)?;
        }
    }

    let program = parser.parse_line()?;
    parser.cursor.skip_spaces();
    if !parser.cursor.at_end() {
        return Err(parser.error(ParseErrorKind::Trailing {
            found: parser.found(),
        }));
    }
    program.ok_or_else(|| parser.unexpected("expect expression"))
}

/// An operator waiting on the precedence stack.
enum Infix {
    /// Two adjacent terms.
    Apply,
    /// A named operator; the expression is its identifier.
    Operator(Expr),
}

impl Infix {
    fn name(&self) -> &str {
        match self {
            Infix::Apply => "",
            Infix::Operator(op) => match &op.kind {
                ExprKind::Ident(name) => name,
                _ => "",
            },
        }
    }
}

struct Parser<'s> {
    cursor: Cursor<'s>,
    source: Rc<Source>,
    offset: usize,
    /// Where the program's own text ends and the prelude suffix begins.
    user_end: usize,
    depth: usize,
    max_depth: usize,
}

impl<'s> Parser<'s> {
    const TERMS: [Alternative<'s>; 7] = [
        Self::try_op_ident,
        Self::try_paren,
        Self::try_builtin,
        Self::try_lambda,
        Self::try_number,
        Self::try_string,
        Self::try_ident,
    ];

    fn pos_at(&self, at: usize) -> Pos {
        Pos::new(
            Rc::clone(&self.source),
            at as isize - self.offset as isize,
        )
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.pos_at(self.cursor.pos()))
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        self.error(ParseErrorKind::Unexpected {
            found: self.found(),
            expected,
        })
    }

    /// The character under the cursor as the program's author sees it: the
    /// end of their text is EOF even when a prelude suffix follows.
    fn found(&self) -> Found {
        if self.cursor.pos() == self.user_end {
            Found::Eof
        } else {
            self.cursor.found()
        }
    }

    /// Reports the first paren in `user` that has no partner, as the bare
    /// parser would report it.
    fn check_balance(&self, user: &str) -> PResult<()> {
        let Some(fault) = unbalanced(user) else {
            return Ok(());
        };
        let kind = match fault {
            Unbalanced::Close(at) => {
                return Err(ParseError::new(
                    ParseErrorKind::Trailing {
                        found: Found::Char(')'),
                    },
                    self.pos_at(self.offset + at),
                ));
            }
            Unbalanced::Open => ParseErrorKind::Unexpected {
                found: Found::Eof,
                expected: "expect ')'",
            },
            Unbalanced::String => ParseErrorKind::UnterminatedString,
        };
        Err(ParseError::new(kind, self.pos_at(self.user_end)))
    }

    /// Runs one alternative. The cursor is put back when it does not match.
    fn attempt<T>(&mut self, alt: impl FnOnce(&mut Self) -> PResult<Option<T>>) -> PResult<Option<T>> {
        self.cursor.save();
        let result = alt(self);
        match result {
            Ok(None) => self.cursor.restore(),
            Ok(Some(_)) | Err(_) => self.cursor.discard(),
        }
        result
    }

    fn parse_line(&mut self) -> PResult<Option<Expr>> {
        if self.depth >= self.max_depth {
            return Err(self.error(ParseErrorKind::MaxDepthExceeded {
                max_depth: self.max_depth,
            }));
        }
        self.depth += 1;
        let result = self.parse_line_inner();
        self.depth -= 1;
        result
    }

    fn parse_line_inner(&mut self) -> PResult<Option<Expr>> {
        // A missing first operand lets a leading operator apply to its right
        // operand alone: `! x` is `(!) x`.
        let mut operands: Vec<Option<Expr>> = vec![self.parse_term()?];
        let mut operators: Vec<Infix> = Vec::new();

        loop {
            self.cursor.skip_spaces();
            let op = self.attempt(Self::try_operator)?;
            let Some(rhs) = self.parse_term()? else {
                if op.is_some() {
                    return Err(self.unexpected("expect RHS of operator"));
                }
                break;
            };

            let incoming = op.map_or(Infix::Apply, Infix::Operator);
            while let Some(waiting) = operators.last() {
                if !reduces_before(waiting.name(), incoming.name()) {
                    break;
                }
                reduce(&mut operands, &mut operators);
            }
            operators.push(incoming);
            operands.push(Some(rhs));
        }

        while !operators.is_empty() {
            reduce(&mut operands, &mut operators);
        }
        Ok(operands.pop().flatten())
    }

    fn parse_term(&mut self) -> PResult<Option<Expr>> {
        self.cursor.skip_spaces();
        for alt in Self::TERMS {
            if let Some(term) = self.attempt(alt)? {
                return Ok(Some(term));
            }
        }
        Ok(None)
    }

    fn try_operator(&mut self) -> PResult<Option<Expr>> {
        let start = self.cursor.pos();
        let op = self.cursor.take_while(is_op_char);
        if op.is_empty() {
            return Ok(None);
        }
        Ok(Some(Expr::ident(op, self.pos_at(start))))
    }

    /// `(op)`: an operator used as an identifier.
    fn try_op_ident(&mut self) -> PResult<Option<Expr>> {
        let start = self.cursor.pos();
        if !self.cursor.eat(b'(') {
            return Ok(None);
        }
        self.cursor.skip_spaces();
        let op = self.cursor.take_while(is_op_char);
        if op.is_empty() {
            return Ok(None);
        }
        self.cursor.skip_spaces();
        if !self.cursor.eat(b')') {
            return Ok(None);
        }
        Ok(Some(Expr::ident(op, self.pos_at(start))))
    }

    fn try_paren(&mut self) -> PResult<Option<Expr>> {
        if !self.cursor.eat(b'(') {
            return Ok(None);
        }
        let Some(inner) = self.parse_line()? else {
            return Err(self.unexpected("incorrect paren body"));
        };
        self.cursor.skip_spaces();
        if !self.cursor.eat(b')') {
            return Err(self.unexpected("expect ')'"));
        }
        Ok(Some(inner))
    }

    fn try_builtin(&mut self) -> PResult<Option<Expr>> {
        let start = self.cursor.pos();
        if !self.cursor.eat(b'@') {
            return Ok(None);
        }
        let name = self.cursor.take_while(is_id_char);
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::MissingBuiltinName));
        }
        Ok(Some(Expr::new(
            ExprKind::Builtin(name.into()),
            self.pos_at(start),
        )))
    }

    fn try_lambda(&mut self) -> PResult<Option<Expr>> {
        let start = self.cursor.pos();
        if !self.cursor.eat(b'\\') {
            return Ok(None);
        }
        self.cursor.skip_spaces();
        let param = self.lambda_param()?;
        self.cursor.skip_spaces();

        if self.cursor.eat(b'.') {
            let Some(body) = self.parse_line()? else {
                return Err(self.unexpected("expect body of lambda"));
            };
            return Ok(Some(Expr::lambda(param, body, self.pos_at(start))));
        }

        // `\x OP rhs ; body` binds `x` through the mirrored operator:
        // `((REV) rhs) (\x. body)`.
        let Some(op) = self.attempt(Self::try_operator)? else {
            return Err(self.unexpected("expect '.' or operator"));
        };
        let mirrored = match &op.kind {
            ExprKind::Ident(name) => reverse_op(name),
            _ => return Err(self.unexpected("expect '.' or operator")),
        };
        let Some(rhs) = self.parse_line()? else {
            return Err(self.unexpected("expect correct RHS"));
        };
        self.cursor.skip_spaces();
        if !self.cursor.eat(b';') {
            return Err(self.unexpected("expect ';'"));
        }
        let Some(body) = self.parse_line()? else {
            return Err(self.unexpected("expect correct body"));
        };

        let pos = self.pos_at(start);
        let binder = Expr::lambda(param, body, pos.clone());
        let op = Expr::ident(mirrored, pos.clone());
        let partial = Expr::apply(op, rhs, pos.clone());
        Ok(Some(Expr::apply(partial, binder, pos)))
    }

    /// The name after `\`: an identifier, an `(op)`, or nothing (`_`).
    fn lambda_param(&mut self) -> PResult<EcoString> {
        let param = match self.attempt(Self::try_op_ident)? {
            Some(op) => Some(op),
            None => self.attempt(Self::try_ident)?,
        };
        Ok(match param.as_ref().map(|p| &p.kind) {
            Some(ExprKind::Ident(name)) => name.clone(),
            _ => EcoString::from("_"),
        })
    }

    fn try_number(&mut self) -> PResult<Option<Expr>> {
        let start = self.cursor.pos();
        if self.cursor.is(b'+') || self.cursor.is(b'-') {
            self.cursor.advance(1);
        }
        if self.cursor.take_while(|c| c.is_ascii_digit()).is_empty() {
            return Ok(None);
        }
        let text = self.cursor.slice(start, self.cursor.pos());
        let value = text.parse::<i64>().map_err(|_| {
            ParseError::new(
                ParseErrorKind::NumberOutOfRange {
                    text: text.to_string(),
                },
                self.pos_at(start),
            )
        })?;
        Ok(Some(Expr::new(ExprKind::Number(value), self.pos_at(start))))
    }

    fn try_string(&mut self) -> PResult<Option<Expr>> {
        let start = self.cursor.pos();
        if !self.cursor.eat(b'"') {
            return Ok(None);
        }
        let content_start = self.cursor.pos();
        while !self.cursor.at_end() && !self.cursor.is(b'"') {
            if self.cursor.is(b'\\') {
                self.cursor.advance(1);
            }
            self.cursor.advance(1);
        }
        let content_end = self.cursor.pos();
        if !self.cursor.eat(b'"') {
            return Err(self.error(ParseErrorKind::UnterminatedString));
        }
        let text = unescape(self.cursor.slice(content_start, content_end));
        Ok(Some(Expr::new(
            ExprKind::Str(text.into()),
            self.pos_at(start),
        )))
    }

    fn try_ident(&mut self) -> PResult<Option<Expr>> {
        let start = self.cursor.pos();
        let name = self.cursor.take_while(is_id_char);
        if name.is_empty() {
            return Ok(None);
        }
        Ok(Some(Expr::ident(name, self.pos_at(start))))
    }
}

/// Pops the top operator and its operands and pushes their combination:
/// `((op) lhs) rhs` for a named operator, `lhs rhs` for application, and
/// `(op) rhs` when the operator had no left operand.
fn reduce(operands: &mut Vec<Option<Expr>>, operators: &mut Vec<Infix>) {
    let (Some(op), Some(Some(rhs)), Some(lhs)) = (operators.pop(), operands.pop(), operands.pop())
    else {
        return;
    };

    let combined = match (op, lhs) {
        (Infix::Apply, Some(lhs)) => {
            let pos = lhs.pos.clone();
            Expr::apply(lhs, rhs, pos)
        }
        (Infix::Apply, None) => rhs,
        (Infix::Operator(op), Some(lhs)) => {
            let pos = lhs.pos.clone();
            let partial = Expr::apply(op, lhs, pos.clone());
            Expr::apply(partial, rhs, pos)
        }
        (Infix::Operator(op), None) => {
            let pos = op.pos.clone();
            Expr::apply(op, rhs, pos)
        }
    };
    operands.push(Some(combined));
}
