use grove_tree::{TokenKind, Vocabulary};
use text_size::TextSize;

use crate::PatternError;
use crate::lexer::{Lexer, PatternToken};

/// A compiled tree pattern.
///
/// ```text
/// pattern := tree | node
/// tree    := '(' node (tree | node)* ')'
/// node    := ['%' NAME ':'] ('.' | 'nil' | NAME ['[' text ']'])
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePattern {
    pub label: Option<Box<str>>,
    pub node: PatternNode,
    pub children: Vec<TreePattern>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternNode {
    /// `.` matches any single node, children still have to match.
    Wildcard,
    Nil,
    /// A token name, with the text to match when one was bracketed.
    Token { kind: TokenKind, text: Option<Box<str>> },
}

impl TreePattern {
    pub fn parse(vocabulary: &Vocabulary, text: &str) -> Result<Self, PatternError> {
        let mut parser = Parser::new(vocabulary, text)?;
        let pattern = match parser.current {
            PatternToken::Open => parser.tree()?,
            _ => parser.node()?,
        };
        match parser.current {
            PatternToken::Eof => Ok(pattern),
            _ => Err(PatternError::TrailingInput { offset: parser.offset }),
        }
    }

    /// Kind the matched root must have; `None` for a wildcard.
    pub fn root_kind(&self) -> Option<TokenKind> {
        match self.node {
            PatternNode::Wildcard => None,
            PatternNode::Nil => Some(TokenKind::INVALID),
            PatternNode::Token { kind, .. } => Some(kind),
        }
    }
}

struct Parser<'a, 'v> {
    lexer: Lexer<'a>,
    vocabulary: &'v Vocabulary,
    current: PatternToken<'a>,
    offset: TextSize,
}

impl<'a, 'v> Parser<'a, 'v> {
    fn new(vocabulary: &'v Vocabulary, text: &'a str) -> Result<Self, PatternError> {
        let mut lexer = Lexer::new(text);
        let (current, offset) = lexer.next_token()?;
        Ok(Self { lexer, vocabulary, current, offset })
    }

    fn bump(&mut self) -> Result<(), PatternError> {
        (self.current, self.offset) = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(
        &mut self,
        token: &PatternToken<'a>,
        expected: &'static str,
    ) -> Result<(), PatternError> {
        if self.current != *token {
            return Err(PatternError::Expected { expected, offset: self.offset });
        }
        self.bump()
    }

    fn name(&mut self) -> Result<&'a str, PatternError> {
        match self.current {
            PatternToken::Name(name) => {
                self.bump()?;
                Ok(name)
            }
            _ => Err(PatternError::Expected { expected: "a token name", offset: self.offset }),
        }
    }

    fn tree(&mut self) -> Result<TreePattern, PatternError> {
        self.expect(&PatternToken::Open, "`(`")?;
        let mut root = self.node()?;
        loop {
            let child = match self.current {
                PatternToken::Open => self.tree()?,
                PatternToken::Name(_) | PatternToken::Percent | PatternToken::Dot => self.node()?,
                _ => break,
            };
            root.children.push(child);
        }
        self.expect(&PatternToken::Close, "`)`")?;
        Ok(root)
    }

    fn node(&mut self) -> Result<TreePattern, PatternError> {
        let mut label = None;
        if self.current == PatternToken::Percent {
            self.bump()?;
            label = Some(self.name()?.into());
            self.expect(&PatternToken::Colon, "`:` after the label")?;
        }

        if self.current == PatternToken::Dot {
            self.bump()?;
            return Ok(TreePattern { label, node: PatternNode::Wildcard, children: Vec::new() });
        }

        let name = self.name()?;
        if name == "nil" {
            return Ok(TreePattern { label, node: PatternNode::Nil, children: Vec::new() });
        }
        let text = match &self.current {
            PatternToken::Text(text) => {
                let text = text.clone();
                self.bump()?;
                Some(text)
            }
            _ => None,
        };
        let kind = self
            .vocabulary
            .kind(name)
            .ok_or_else(|| PatternError::UnknownToken { name: name.into() })?;
        Ok(TreePattern { label, node: PatternNode::Token { kind, text }, children: Vec::new() })
    }
}
