//! Deferred references into an AttrTree.
//!
//! A ViewRef records one or more paths without touching any tree. It is built
//! from an expression ("A.B * C.D") or with the `attr` builder, and resolved
//! later against a concrete tree:
//! - one path  => the value stored there
//! - several   => an Overlay of the values, in reference order

pub mod overlay;
pub mod parse;

pub use overlay::Overlay;
pub use parse::parse_specification;

use crate::Result;
use crate::error::Error;
use crate::tree::{AttrTree, Path};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewRef {
    specification: Vec<Path>,
}

/// Outcome of resolving a ViewRef.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Resolved<'t, V> {
    Single(&'t V),
    Overlay(Overlay<&'t V>),
}

impl<'t, V> Resolved<'t, V> {
    /// Number of resolved values.
    pub fn len(&self) -> usize {
        match self {
            Resolved::Single(_) => 1,
            Resolved::Overlay(o) => o.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All resolved values in reference order.
    pub fn values(&self) -> Vec<&'t V> {
        match self {
            Resolved::Single(v) => vec![*v],
            Resolved::Overlay(o) => o.iter().copied().collect(),
        }
    }
}

impl ViewRef {
    /// Empty reference; extend it with `attr`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self {
            specification: parse_specification(input)?,
        })
    }

    pub fn from_paths(specification: Vec<Path>) -> Self {
        Self { specification }
    }

    pub fn specification(&self) -> &[Path] {
        &self.specification
    }

    pub fn len(&self) -> usize {
        self.specification.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specification.is_empty()
    }

    /// New reference with `name` appended to the path being built. On an
    /// empty reference this starts the first path.
    pub fn attr(&self, name: &str) -> Result<Self> {
        let mut specification = self.specification.clone();
        match specification.pop() {
            Some(last) => specification.push(last.child(name)?),
            None => specification.push(Path::single(name)?),
        }
        Ok(Self { specification })
    }

    /// New reference holding this reference's paths followed by `other`'s.
    pub fn overlay(&self, other: &ViewRef) -> ViewRef {
        overlay(self, other)
    }

    /// Look up every referenced path in `tree`. Nothing is created: a missing
    /// path is `NotFound` and a path ending on a sub-tree is `NotALeaf`.
    pub fn resolve<'t, V>(&self, tree: &'t AttrTree<V>) -> Result<Resolved<'t, V>> {
        let mut values = Vec::with_capacity(self.specification.len());
        for path in &self.specification {
            trace!(%path, "resolving reference");
            values.push(tree.leaf(path)?);
        }

        match values.len() {
            0 => Err(Error::EmptyReference),
            1 => Ok(Resolved::Single(values[0])),
            _ => Ok(Resolved::Overlay(values.into_iter().collect())),
        }
    }
}

/// Combine two references: `a`'s paths followed by `b`'s.
pub fn overlay(a: &ViewRef, b: &ViewRef) -> ViewRef {
    let mut specification = Vec::with_capacity(a.len() + b.len());
    specification.extend(a.specification.iter().cloned());
    specification.extend(b.specification.iter().cloned());
    ViewRef { specification }
}

impl fmt::Display for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.specification.iter().enumerate() {
            if i > 0 {
                f.write_str(" * ")?;
            }
            write!(f, "{}", path)?;
        }
        Ok(())
    }
}

impl FromStr for ViewRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
