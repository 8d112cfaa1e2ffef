//! Tree navigation for generated tree walkers.
//!
//! [`TreeNodeStream`] flattens a tree into node, `DOWN` and `UP` symbols so
//! that a walker can match it with the same lookahead machinery a parser uses
//! on tokens, including calls into other parts of the tree through
//! [`TreeNodeStream::push`] and [`TreeNodeStream::pop`].

mod error;
mod stream;
mod symbol;

pub use error::NavError;
pub use stream::{Marker, TreeIterator, TreeNodeStream};
pub use symbol::NavSymbol;
