//! Mutable syntax trees for generated parsers and tree walkers.
//!
//! Nodes live in an arena-backed [`Forest`] and are addressed by [`NodeId`].
//! Generated code never allocates nodes itself; it goes through a
//! [`TreeAdaptor`], which decides how tokens are copied and synthesized.

mod adaptor;
mod error;
mod forest;
mod token;
mod vocabulary;
mod walk;


/// Node creation and restructuring capability.
pub use adaptor::{CommonTreeAdaptor, TreeAdaptor};
pub use error::TreeError;
/// Arena storage and node handles.
pub use forest::{Ancestors, Forest, NodeData, NodeId, NodeShape};
/// Token payloads carried by nodes.
pub use token::{Position, Token, TokenKind};
pub use vocabulary::Vocabulary;
/// Depth-first traversal helpers.
pub use walk::{Preorder, TreeVisitor, WalkEvent};
