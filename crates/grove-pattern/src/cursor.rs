use std::str::Chars;

use text_size::TextSize;

pub(crate) const EOF_CHAR: char = '\0';

/// Character cursor over pattern text.
pub(crate) struct Cursor<'a> {
    text: &'a str,
    chars: Chars<'a>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, chars: text.chars() }
    }

    pub(crate) fn offset(&self) -> TextSize {
        TextSize::new((self.text.len() - self.chars.as_str().len()) as u32)
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub(crate) fn peek(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn second(&self) -> char {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    pub(crate) fn advance(&mut self) -> char {
        self.chars.next().unwrap_or(EOF_CHAR)
    }

    /// Consumes characters while `f` holds and returns them.
    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let rest = self.chars.as_str();
        while !self.is_eof() && f(self.peek()) {
            self.advance();
        }
        &rest[..rest.len() - self.chars.as_str().len()]
    }
}
