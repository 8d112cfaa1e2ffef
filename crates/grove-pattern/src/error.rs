use text_size::TextSize;

/// Malformed tree patterns and context queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("unexpected character {ch:?} at {offset:?}")]
    UnexpectedChar { ch: char, offset: TextSize },

    #[error("unterminated node text starting at {offset:?}")]
    UnterminatedText { offset: TextSize },

    #[error("expected {expected} at {offset:?}")]
    Expected { expected: &'static str, offset: TextSize },

    #[error("unknown token name `{name}`")]
    UnknownToken { name: Box<str> },

    #[error("input left over at {offset:?}")]
    TrailingInput { offset: TextSize },

    #[error("a wildcard cannot be created as a node")]
    WildcardInCreate,

    #[error("invalid syntax: `{dots}` is not an ellipsis")]
    MalformedEllipsis { dots: Box<str> },

    #[error("invalid syntax: ... ...")]
    DoubledEllipsis,

    #[error("invalid syntax: more than one ... between names")]
    TooManyEllipses,
}
