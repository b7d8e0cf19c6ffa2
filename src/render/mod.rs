//! Plain-text rendering of trees for the command line.

pub mod text;

pub use text::{render_outline, render_paths};
