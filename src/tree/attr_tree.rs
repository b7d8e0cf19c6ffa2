//! Ordered attribute tree.
//!
//! Every child slot is addressed by a segment name and holds either a nested
//! AttrTree or a value. Children keep insertion order for display, and every
//! stored value carries an insertion stamp so the flattened `data()` view
//! lists paths in the order they were first assigned across the whole tree.
//! Overwriting a value keeps its stamp, and so its position.
//!
//! JSON shape (with `V = serde_json::Value`):
//! {
//!   "fixed": true,                     // omitted when false
//!   "children": {
//!     "Example": { "tree": { "children": { "Path1": { "value": 42, "seq": 7 } } } }
//!   }
//! }
//!
//! `seq` is optional on input; values without one are stamped in document order.

use crate::Result;
use crate::error::Error;
use crate::tree::node::Node;
use crate::tree::path::{Path, validate_segment};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Source of insertion stamps. Stamps only need to grow; 0 marks a sub-tree.
static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

fn next_seq() -> u64 {
    NEXT_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// Keep stamps handed out later above every stamp read back from disk.
fn loaded_seq<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let seq = u64::deserialize(d)?;
    NEXT_SEQ.fetch_max(seq.saturating_add(1), Ordering::Relaxed);
    Ok(seq)
}

fn is_subtree_seq(seq: &u64) -> bool {
    *seq == 0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
struct Slot<V> {
    #[serde(flatten)]
    node: Node<V>,

    #[serde(
        default = "next_seq",
        deserialize_with = "loaded_seq",
        skip_serializing_if = "is_subtree_seq"
    )]
    seq: u64,
}

impl<V> Slot<V> {
    fn tree(tree: AttrTree<V>) -> Self {
        Self {
            node: Node::Tree(tree),
            seq: 0,
        }
    }
}

impl<V: PartialEq> PartialEq for Slot<V> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "RawTree<V>",
    bound(deserialize = "V: Deserialize<'de>")
)]
pub struct AttrTree<V> {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    fixed: bool,
    children: IndexMap<String, Slot<V>>,
}

/// Raw tree shape as it appears on the wire, before child names are checked.
#[derive(Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
struct RawTree<V> {
    #[serde(default)]
    fixed: bool,

    #[serde(default)]
    children: IndexMap<String, Slot<V>>,
}

impl<V> TryFrom<RawTree<V>> for AttrTree<V> {
    type Error = Error;

    fn try_from(mut raw: RawTree<V>) -> Result<Self> {
        for (name, slot) in raw.children.iter_mut() {
            validate_segment(name)?;
            if slot.node.is_tree() {
                slot.seq = 0;
            }
        }
        Ok(Self {
            fixed: raw.fixed,
            children: raw.children,
        })
    }
}

impl<V> Default for AttrTree<V> {
    fn default() -> Self {
        Self {
            fixed: false,
            children: IndexMap::new(),
        }
    }
}

/// Same flags, same nodes under the same names, and the same `data()` order.
impl<V: PartialEq> PartialEq for AttrTree<V> {
    fn eq(&self, other: &Self) -> bool {
        self.fixed == other.fixed
            && self.children == other.children
            && self.data().keys().eq(other.data().keys())
    }
}

/// Membership key: an immediate child name or a full leaf path.
#[derive(Debug, Clone, Copy)]
pub enum Key<'a> {
    Name(&'a str),
    Path(&'a Path),
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(name)
    }
}

impl<'a> From<&'a Path> for Key<'a> {
    fn from(path: &'a Path) -> Self {
        Key::Path(path)
    }
}

impl<V> AttrTree<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fixed(&self) -> bool {
        self.fixed
    }

    /// Lock (or unlock) the shape of this node. Nested trees keep their own flag.
    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    /// Set the flag on this node and every nested tree.
    pub fn set_fixed_all(&mut self, fixed: bool) {
        self.fixed = fixed;
        for slot in self.children.values_mut() {
            if let Node::Tree(t) = &mut slot.node {
                t.set_fixed_all(fixed);
            }
        }
    }

    /// A new name may only be added while the tree is not fixed.
    fn admit(&self, name: &str, force: bool) -> Result<()> {
        validate_segment(name)?;
        if self.fixed && !force && !self.children.contains_key(name) {
            return Err(Error::Fixed {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn child_or_create(&mut self, name: &str, force: bool) -> Result<&mut AttrTree<V>> {
        self.admit(name, force)?;
        let slot = self.children.entry(name.to_string()).or_insert_with(|| {
            debug!(name, "auto-creating sub-tree");
            Slot::tree(AttrTree::new())
        });
        match &mut slot.node {
            Node::Tree(t) => Ok(t),
            Node::Value(_) => Err(Error::NotATree {
                path: Path::from_validated(&[name.to_string()]),
            }),
        }
    }

    /// Return the sub-tree at `name`, creating an empty one when it is missing
    /// and the tree is not fixed.
    pub fn get_or_create(&mut self, name: &str) -> Result<&mut AttrTree<V>> {
        self.child_or_create(name, false)
    }

    /// Store `value` at the single segment `name`. An existing node at that
    /// name is replaced in place and returned.
    pub fn set(&mut self, name: &str, value: V) -> Result<Option<Node<V>>> {
        self.admit(name, false)?;
        Ok(self.insert_leaf(name, value))
    }

    fn insert_leaf(&mut self, name: &str, value: V) -> Option<Node<V>> {
        let seq = match self.children.get(name) {
            Some(Slot {
                node: Node::Value(_),
                seq,
            }) => *seq,
            _ => next_seq(),
        };
        trace!(name, seq, "storing value");
        let slot = Slot {
            node: Node::Value(value),
            seq,
        };
        self.children
            .insert(name.to_string(), slot)
            .map(|old| old.node)
    }

    /// Walk (creating as needed) every segment but the last, then set the
    /// leaf at the last segment.
    pub fn set_path(&mut self, path: &Path, value: V) -> Result<Option<Node<V>>> {
        self.insert_path(path, value, false)
    }

    fn insert_path(&mut self, path: &Path, value: V, force: bool) -> Result<Option<Node<V>>> {
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::EmptyPath);
        };

        let mut tree = self;
        for (i, seg) in parents.iter().enumerate() {
            tree = match tree.child_or_create(seg, force) {
                Ok(t) => t,
                Err(Error::NotATree { .. }) => {
                    return Err(Error::NotATree {
                        path: Path::from_validated(&segments[..=i]),
                    });
                }
                Err(e) => return Err(e),
            };
        }
        tree.admit(last, force)?;
        Ok(tree.insert_leaf(last, value))
    }

    /// Merge every leaf of `other` into self, in `other`'s order. Conflicting
    /// paths are overwritten in place; new paths are appended. The fixed flags
    /// of self do not block the merge.
    pub fn update(&mut self, other: &AttrTree<V>) -> Result<()>
    where
        V: Clone,
    {
        let data = other.data();
        debug!(entries = data.len(), "merging tree");
        for (path, value) in data {
            self.insert_path(&path, value.clone(), true)?;
        }
        Ok(())
    }

    pub fn child(&self, name: &str) -> Option<&Node<V>> {
        self.children.get(name).map(|slot| &slot.node)
    }

    pub fn subtree(&self, name: &str) -> Option<&AttrTree<V>> {
        self.child(name).and_then(Node::as_tree)
    }

    /// Value stored directly at `name`, if any.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.child(name).and_then(Node::as_value)
    }

    /// Look up the node at `path` without creating anything.
    pub fn get_path(&self, path: &Path) -> Result<&Node<V>> {
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::EmptyPath);
        };

        let mut tree = self;
        for (i, seg) in parents.iter().enumerate() {
            tree = match tree.child(seg) {
                Some(Node::Tree(t)) => t,
                Some(Node::Value(_)) => {
                    return Err(Error::NotATree {
                        path: Path::from_validated(&segments[..=i]),
                    });
                }
                None => return Err(Error::NotFound { path: path.clone() }),
            };
        }
        tree.child(last)
            .ok_or_else(|| Error::NotFound { path: path.clone() })
    }

    /// Value stored at `path`. A path ending on a sub-tree is an error.
    pub fn leaf(&self, path: &Path) -> Result<&V> {
        match self.get_path(path)? {
            Node::Value(v) => Ok(v),
            Node::Tree(_) => Err(Error::NotALeaf { path: path.clone() }),
        }
    }

    pub fn contains<'a>(&self, key: impl Into<Key<'a>>) -> bool {
        match key.into() {
            Key::Name(name) => self.children.contains_key(name),
            Key::Path(path) => matches!(self.get_path(path), Ok(Node::Value(_))),
        }
    }

    /// Remove the child at `name`, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Node<V>> {
        self.children.shift_remove(name).map(|slot| slot.node)
    }

    /// Immediate child names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node<V>)> {
        self.children
            .iter()
            .map(|(name, slot)| (name.as_str(), &slot.node))
    }

    /// Flattened view: full leaf path -> value, in assignment order.
    pub fn data(&self) -> IndexMap<Path, &V> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut leaves);
        leaves.sort_by_key(|(seq, _, _)| *seq);
        leaves
            .into_iter()
            .map(|(_, path, value)| (path, value))
            .collect()
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Vec<String>, out: &mut Vec<(u64, Path, &'a V)>) {
        for (name, slot) in &self.children {
            prefix.push(name.clone());
            match &slot.node {
                Node::Value(v) => out.push((slot.seq, Path::from_validated(prefix), v)),
                Node::Tree(t) => t.collect_leaves(prefix, out),
            }
            prefix.pop();
        }
    }

    pub fn paths(&self) -> Vec<Path> {
        self.data().into_keys().collect()
    }

    pub fn values(&self) -> Vec<&V> {
        self.data().into_values().collect()
    }

    /// Number of stored values (sub-trees are not counted).
    pub fn len(&self) -> usize {
        self.children
            .values()
            .map(|slot| match &slot.node {
                Node::Value(_) => 1,
                Node::Tree(t) => t.len(),
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of this tree holding only the entries under any of `prefixes`.
    /// Kept values keep their relative `data()` order.
    pub fn filter(&self, prefixes: &[Path]) -> AttrTree<V>
    where
        V: Clone,
    {
        self.filter_under(&mut Vec::new(), prefixes)
    }

    fn filter_under(&self, at: &mut Vec<String>, prefixes: &[Path]) -> AttrTree<V>
    where
        V: Clone,
    {
        let mut out = AttrTree {
            fixed: self.fixed,
            children: IndexMap::new(),
        };
        for (name, slot) in &self.children {
            at.push(name.clone());
            if prefixes.iter().any(|p| at.starts_with(p.segments())) {
                out.children.insert(name.clone(), slot.clone());
            } else if let Node::Tree(t) = &slot.node {
                if prefixes.iter().any(|p| p.segments().starts_with(at.as_slice())) {
                    let kept = t.filter_under(at, prefixes);
                    if !kept.is_empty() {
                        out.children.insert(name.clone(), Slot::tree(kept));
                    }
                }
            }
            at.pop();
        }
        out
    }
}
