//! Vertex identifiers and id-indexed side tables.
//!
//! Ids are stable indices into the vertex arena: they are handed out in creation order and are
//! never renumbered, so layout tables keyed by id stay valid across insertions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(usize);

impl VertexId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for VertexId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense table with one slot per vertex id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexVec<T>(Vec<T>);

impl<T> VertexVec<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, v: VertexId) -> Option<&T> {
        self.0.get(v.index())
    }

    pub fn get_mut(&mut self, v: VertexId) -> Option<&mut T> {
        self.0.get_mut(v.index())
    }

    pub fn push(&mut self, value: T) -> VertexId {
        self.0.push(value);
        VertexId(self.0.len() - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &T)> {
        self.0.iter().enumerate().map(|(i, t)| (VertexId(i), t))
    }

    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn values_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.0.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: Clone> VertexVec<T> {
    /// Grows the table so that `v` has a slot, filling new slots with `fill`.
    pub fn ensure(&mut self, v: VertexId, fill: T) {
        if v.index() >= self.0.len() {
            self.0.resize(v.index() + 1, fill);
        }
    }
}

impl<T> From<Vec<T>> for VertexVec<T> {
    fn from(values: Vec<T>) -> Self {
        Self(values)
    }
}

impl<T> FromIterator<T> for VertexVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> Index<VertexId> for VertexVec<T> {
    type Output = T;

    fn index(&self, v: VertexId) -> &T {
        &self.0[v.index()]
    }
}

impl<T> IndexMut<VertexId> for VertexVec<T> {
    fn index_mut(&mut self, v: VertexId) -> &mut T {
        &mut self.0[v.index()]
    }
}
