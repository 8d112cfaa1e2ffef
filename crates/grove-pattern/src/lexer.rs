use text_size::TextSize;

use crate::PatternError;
use crate::cursor::Cursor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PatternToken<'a> {
    Open,
    Close,
    Percent,
    Colon,
    Dot,
    Name(&'a str),
    /// Bracketed node text with `\]` unescaped.
    Text(Box<str>),
    Eof,
}

pub(crate) struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { cursor: Cursor::new(text) }
    }

    /// Next token and the offset it starts at.
    pub(crate) fn next_token(&mut self) -> Result<(PatternToken<'a>, TextSize), PatternError> {
        self.cursor.advance_while(char::is_whitespace);
        let offset = self.cursor.offset();
        if self.cursor.is_eof() {
            return Ok((PatternToken::Eof, offset));
        }

        let token = match self.cursor.peek() {
            '(' => self.single(PatternToken::Open),
            ')' => self.single(PatternToken::Close),
            '%' => self.single(PatternToken::Percent),
            ':' => self.single(PatternToken::Colon),
            '.' => self.single(PatternToken::Dot),
            '[' => self.text(offset)?,
            ch if is_name_start(ch) => {
                PatternToken::Name(self.cursor.advance_while(is_name_continue))
            }
            ch => return Err(PatternError::UnexpectedChar { ch, offset }),
        };
        Ok((token, offset))
    }

    fn single(&mut self, token: PatternToken<'a>) -> PatternToken<'a> {
        self.cursor.advance();
        token
    }

    fn text(&mut self, offset: TextSize) -> Result<PatternToken<'a>, PatternError> {
        self.cursor.advance();
        let mut text = String::new();
        loop {
            if self.cursor.is_eof() {
                return Err(PatternError::UnterminatedText { offset });
            }
            match self.cursor.advance() {
                ']' => break,
                '\\' if self.cursor.peek() == ']' => text.push(self.cursor.advance()),
                ch => text.push(ch),
            }
        }
        Ok(PatternToken::Text(text.into()))
    }
}

fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_name_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
