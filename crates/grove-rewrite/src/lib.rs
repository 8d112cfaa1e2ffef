//! Rewrite engine for generated rules.
//!
//! While matching, a rule pushes every labeled token or subtree into a
//! per-label [`ElementStream`]. Its rewrite clause is a [`Rewrite`] built from
//! [`Template`]s; [`rewrite`] draws from the streams and assembles the result
//! tree through a [`grove_tree::TreeAdaptor`].

mod error;
mod eval;
mod stream;
mod template;

#[cfg(test)]
mod tests;

pub use error::RewriteError;
pub use eval::rewrite;
pub use stream::{ElementStream, RewriteStreams, StreamFlavor};
pub use template::{Atom, Embedded, Guard, Imaginary, Quantifier, Rewrite, Template};
