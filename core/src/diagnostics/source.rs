use std::fmt;

/// A named piece of program text.
///
/// Offsets handed to [`Source::position`] are byte offsets into `text`. Code
/// that does not come from the user (the prelude wrapped around a program)
/// produces offsets outside `0..=len`, which have no position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    name: String,
    text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 1-based `(line, column)` of a byte offset, or `None` when the offset
    /// lies outside the text.
    pub fn position(&self, offset: isize) -> Option<(usize, usize)> {
        let offset = usize::try_from(offset).ok()?;
        if offset > self.text.len() {
            return None;
        }

        let mut line = 1;
        let mut column = 1;
        for (i, ch) in self.text.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Some((line, column))
    }

    /// The header used in front of a positioned message.
    pub fn locate(&self, offset: isize) -> Location<'_> {
        Location {
            source: self,
            position: self.position(offset),
        }
    }
}

/// Renders as `name:line:column`, or `<PREDEF>` for synthetic code.
pub struct Location<'a> {
    source: &'a Source,
    position: Option<(usize, usize)>,
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((line, column)) => write!(f, "{}:{}:{}", self.source.name, line, column),
            None => write!(f, "<PREDEF>"),
        }
    }
}
