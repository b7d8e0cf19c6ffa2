//! Error type shared by the tree and view-reference layers.

use crate::tree::Path;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("No attribute '{name}' in this AttrTree, and none can be added because fixed=True")]
    Fixed { name: String },

    #[error("invalid path segment '{segment}'")]
    InvalidSegment { segment: String },

    #[error("path must contain at least one segment")]
    EmptyPath,

    #[error("no entry at path '{path}'")]
    NotFound { path: Path },

    #[error("'{path}' holds a value, not an AttrTree")]
    NotATree { path: Path },

    #[error("'{path}' is an AttrTree, not a value")]
    NotALeaf { path: Path },

    #[error("invalid view reference '{input}': {reason}")]
    InvalidReference { input: String, reason: String },

    #[error("view reference has no paths to resolve")]
    EmptyReference,
}
