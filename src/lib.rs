//! Ordered attribute trees and deferred view references.
//!
//! - `tree`: AttrTree, its nodes and dotted paths
//! - `view_ref`: ViewRef expressions resolved against a tree into overlays
//! - `render`: text output used by the CLI

pub mod error;
pub mod render;
pub mod tree;
pub mod view_ref;

pub use error::Error;
pub use tree::{AttrTree, Key, Node, Path};
pub use view_ref::{Overlay, Resolved, ViewRef, overlay};

pub type Result<T, E = Error> = std::result::Result<T, E>;
