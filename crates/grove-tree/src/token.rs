use std::fmt;

use text_size::TextRange;

/// Token type number as emitted by generated lexers and parsers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenKind(i32);

impl TokenKind {
    pub const EOF: Self = Self(-1);
    pub const INVALID: Self = Self(0);
    /// End-of-rule marker used by follow-set computation.
    pub const EOR: Self = Self(1);
    pub const DOWN: Self = Self(2);
    pub const UP: Self = Self(3);
    /// First token type available to grammars.
    pub const MIN_USER: Self = Self(4);

    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Index into a token-name table, if this kind has one.
    pub fn table_index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl From<i32> for TokenKind {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a token came from in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub range: TextRange,
    /// 1-based line.
    pub line: u32,
    /// 0-based column within `line`.
    pub column: u32,
}

/// A matched or synthesized token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Option<Box<str>>,
    /// `None` for imaginary tokens that do not stand for source text.
    pub position: Option<Position>,
    /// Index of the token in its token stream.
    pub index: Option<usize>,
}

impl Token {
    /// A token of `kind` without text or position.
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, text: None, position: None, index: None }
    }

    /// An imaginary token: text but no source position.
    pub fn synthetic(kind: TokenKind, text: impl Into<Box<str>>) -> Self {
        Self { kind, text: Some(text.into()), position: None, index: None }
    }

    pub fn positioned(
        kind: TokenKind,
        text: impl Into<Box<str>>,
        position: Position,
        index: usize,
    ) -> Self {
        Self { kind, text: Some(text.into()), position: Some(position), index: Some(index) }
    }

    pub fn with_text(mut self, text: impl Into<Box<str>>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.position.map(|position| position.line)
    }
}
