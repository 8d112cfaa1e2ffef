//! Textual tree patterns: build trees from them, match trees against them
//! and ask about the ancestors of a node.
//!
//! ```text
//! (ASSIGN %lhs:ID[x] .)
//! ```
//!
//! matches an `ASSIGN` node whose first child is the `ID` node with text `x`
//! (bound to `lhs`) and whose second child is anything without children.

mod context;
mod cursor;
mod error;
mod lexer;
mod parser;
mod wizard;

#[cfg(test)]
mod tests;

pub use context::in_context;
pub use error::PatternError;
pub use parser::{PatternNode, TreePattern};
pub use wizard::{Labels, TreeWizard, matches};
