use crate::parser::error::Found;

/// Read position over preprocessed text, with a stack of saved positions for
/// backtracking.
///
/// `restore` returns to the most recently saved position; `discard` forgets
/// it and keeps the current one. Line and column are not tracked here: they
/// are derived from the byte offset when a diagnostic is rendered.
#[derive(Debug)]
pub struct Cursor<'s> {
    text: &'s str,
    pos: usize,
    saved: Vec<usize>,
}

impl<'s> Cursor<'s> {
    pub fn new(text: &'s str) -> Self {
        Self {
            text,
            pos: 0,
            saved: Vec::new(),
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    pub fn is(&self, c: u8) -> bool {
        self.peek() == Some(c)
    }

    pub fn check(&self, pred: impl Fn(u8) -> bool) -> bool {
        self.peek().is_some_and(pred)
    }

    /// Moves forward `n` bytes, stopping at the end of the text.
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.text.len());
    }

    /// Consumes `c` if it is next.
    pub fn eat(&mut self, c: u8) -> bool {
        if self.is(c) {
            self.advance(1);
            true
        } else {
            false
        }
    }

    pub fn skip_spaces(&mut self) {
        while self.is(b' ') {
            self.pos += 1;
        }
    }

    /// Consumes the longest run of bytes satisfying `pred`.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'s str {
        let start = self.pos;
        while self.check(&pred) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    pub fn slice(&self, start: usize, end: usize) -> &'s str {
        &self.text[start..end]
    }

    pub fn save(&mut self) {
        self.saved.push(self.pos);
    }

    pub fn restore(&mut self) {
        if let Some(pos) = self.saved.pop() {
            self.pos = pos;
        }
    }

    pub fn discard(&mut self) {
        self.saved.pop();
    }

    /// Describes the character under the cursor for error messages.
    pub fn found(&self) -> Found {
        match self.text.get(self.pos..).and_then(|rest| rest.chars().next()) {
            Some(c) => Found::Char(c),
            None if self.at_end() => Found::Eof,
            None => Found::Char(char::from(self.text.as_bytes()[self.pos])),
        }
    }
}
