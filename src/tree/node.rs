use crate::tree::AttrTree;
use serde::{Deserialize, Serialize};

/// A child slot of an AttrTree: either a nested tree or a stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node<V> {
    Tree(AttrTree<V>),
    Value(V),
}

impl<V> Node<V> {
    pub fn as_tree(&self) -> Option<&AttrTree<V>> {
        match self {
            Node::Tree(t) => Some(t),
            Node::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&V> {
        match self {
            Node::Tree(_) => None,
            Node::Value(v) => Some(v),
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Node::Tree(_))
    }
}

impl<V> From<AttrTree<V>> for Node<V> {
    fn from(tree: AttrTree<V>) -> Self {
        Node::Tree(tree)
    }
}
