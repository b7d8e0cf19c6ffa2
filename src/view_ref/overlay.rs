use serde::{Deserialize, Serialize};

/// Ordered stack of layers produced by resolving a multi-path reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overlay<V> {
    layers: Vec<V>,
}

impl<V> Default for Overlay<V> {
    fn default() -> Self {
        Self { layers: Vec::new() }
    }
}

impl<V> Overlay<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer on top.
    pub fn push(&mut self, layer: V) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.layers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.layers.iter()
    }

    pub fn into_layers(self) -> Vec<V> {
        self.layers
    }
}

impl<V> FromIterator<V> for Overlay<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
        }
    }
}

impl<V> IntoIterator for Overlay<V> {
    type Item = V;
    type IntoIter = std::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Overlay<V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}
