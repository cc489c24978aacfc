//! Source text and positions shared by every compilation stage.

mod source;

pub use source::{Location, Source};

use std::rc::Rc;
use std::fmt;

/// Where a syntax node or diagnostic begins: a byte offset relative to the
/// user's text of `source`. Offsets of prelude code fall outside the text.
#[derive(Clone)]
pub struct Pos {
    pub source: Rc<Source>,
    pub offset: isize,
}

impl Pos {
    pub fn new(source: Rc<Source>, offset: isize) -> Self {
        Self { source, offset }
    }

    pub fn location(&self) -> Location<'_> {
        self.source.locate(self.offset)
    }

    /// Byte offset into the user's text, if the position is inside it.
    pub fn user_offset(&self) -> Option<usize> {
        self.source.position(self.offset)?;
        usize::try_from(self.offset).ok()
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.source.name(), self.offset)
    }
}

/// Formats `<location>: <message>`.
pub fn positioned(pos: &Pos, message: &str) -> String {
    format!("{}: {}", pos.location(), message)
}
