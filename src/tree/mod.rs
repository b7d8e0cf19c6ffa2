//! Tree layer: the ordered attribute tree and the paths that address it.
//!
//! This module is intentionally separate from view references and rendering.
//! It owns:
//! - Path type (dotted segment list)
//! - AttrTree (ordered nested tree with a `fixed` shape lock)

pub mod attr_tree;
pub mod node;
pub mod path;

pub use attr_tree::{AttrTree, Key};
pub use node::Node;
pub use path::Path;
