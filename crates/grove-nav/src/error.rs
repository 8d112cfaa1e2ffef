use crate::Marker;

/// Misuse of a [`crate::TreeNodeStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    #[error("cannot seek to {index}; stream ends at {len}")]
    SeekPastEnd { index: usize, len: usize },

    #[error("pop without a matching push")]
    EmptyCallStack,

    #[error("{0:?} was released or never handed out")]
    UnknownMarker(Marker),
}
