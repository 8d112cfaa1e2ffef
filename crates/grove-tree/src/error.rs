use crate::NodeId;

/// Structural failures of tree mutation and verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("indexes invalid; no children in list")]
    NoChildren,

    #[error("child range {start}..={stop} out of bounds for {len} children")]
    ChildIndexOutOfRange { start: usize, stop: usize, len: usize },

    #[error("more than one node as root (had {count})")]
    MultipleRoots { count: usize },

    #[error("parents don't match for {node:?}; expected {expected:?} found {found:?}")]
    ParentMismatch { node: NodeId, expected: Option<NodeId>, found: Option<NodeId> },

    #[error("child indexes don't match for {node:?}; expected {expected:?} found {found:?}")]
    ChildIndexMismatch { node: NodeId, expected: Option<usize>, found: Option<usize> },
}
