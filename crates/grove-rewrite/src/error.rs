use grove_tree::TreeError;

/// Failures that abort the evaluation of a rewrite.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// A mandatory reference found its stream without elements.
    #[error("rewrite stream `{element}` has no elements")]
    EmptyStream { element: Box<str> },

    /// A `+` block found none of its streams holding an element.
    #[error("rewrite loop over `{element}` must run at least once")]
    EarlyExit { element: Box<str> },

    /// A stream was asked for more elements than it collected.
    #[error("rewrite stream `{element}` drawn more often than it was matched")]
    Cardinality { element: Box<str> },

    #[error(transparent)]
    Tree(#[from] TreeError),
}
