//! Per-rank left-to-right vertex sequences.
//!
//! `Order` keeps two views in sync: `ranks[r]` lists the vertices of rank `r` from left to right,
//! and `position_of(v)` is the index of `v` inside its rank. Serialization only writes the 2-D
//! array; the inverse is rebuilt on load.

use pedigree_graph::{VertexId, VertexVec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<VertexId>>", into = "Vec<Vec<VertexId>>")]
pub struct Order {
    ranks: Vec<Vec<VertexId>>,
    positions: VertexVec<usize>,
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ranks(ranks: Vec<Vec<VertexId>>) -> Self {
        let mut order = Self {
            ranks,
            positions: VertexVec::new(),
        };
        order.reindex();
        order
    }

    fn reindex(&mut self) {
        for r in 0..self.ranks.len() {
            self.reindex_rank_from(r, 0);
        }
    }

    fn reindex_rank_from(&mut self, rank: usize, start: usize) {
        let Some(row) = self.ranks.get(rank) else {
            return;
        };
        for (i, &v) in row.iter().enumerate().skip(start) {
            self.positions.ensure(v, 0);
            self.positions[v] = i;
        }
    }

    pub fn num_ranks(&self) -> usize {
        self.ranks.len()
    }

    pub fn ranks(&self) -> &[Vec<VertexId>] {
        &self.ranks
    }

    /// Vertices of `rank` from left to right; empty for ranks that do not exist.
    pub fn rank(&self, rank: usize) -> &[VertexId] {
        self.ranks.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rank_len(&self, rank: usize) -> usize {
        self.rank(rank).len()
    }

    pub fn vertex_at(&self, rank: usize, index: usize) -> Option<VertexId> {
        self.rank(rank).get(index).copied()
    }

    /// Index of `v` within its rank. Unplaced vertices report 0.
    pub fn position_of(&self, v: VertexId) -> usize {
        self.positions.get(v).copied().unwrap_or(0)
    }

    pub fn left_neighbour(&self, v: VertexId, rank: usize) -> Option<VertexId> {
        let index = self.position_of(v);
        index.checked_sub(1).and_then(|i| self.vertex_at(rank, i))
    }

    pub fn right_neighbour(&self, v: VertexId, rank: usize) -> Option<VertexId> {
        self.vertex_at(rank, self.position_of(v) + 1)
    }

    /// Inserts an empty rank before `at` (or appends when `at` is past the end).
    pub fn insert_rank(&mut self, at: usize) {
        let at = at.min(self.ranks.len());
        self.ranks.insert(at, Vec::new());
    }

    /// Places `v` at `index` of `rank`, growing the rank list if needed.
    pub fn insert(&mut self, rank: usize, index: usize, v: VertexId) {
        while self.ranks.len() <= rank {
            self.ranks.push(Vec::new());
        }
        let index = index.min(self.ranks[rank].len());
        self.ranks[rank].insert(index, v);
        self.reindex_rank_from(rank, index);
    }

    /// Swaps the vertices at two indices of the same rank.
    pub fn exchange(&mut self, rank: usize, index1: usize, index2: usize) {
        let Some(row) = self.ranks.get_mut(rank) else {
            return;
        };
        if index1 >= row.len() || index2 >= row.len() {
            return;
        }
        row.swap(index1, index2);
        let (v1, v2) = (row[index1], row[index2]);
        self.positions[v1] = index1;
        self.positions[v2] = index2;
    }

    /// Moves the vertex at `index` by `amount` slots, shifting everything in between.
    /// Returns `false` (and leaves the order untouched) when the target slot is out of range.
    pub fn move_vertex(&mut self, rank: usize, index: usize, amount: isize) -> bool {
        if amount == 0 {
            return true;
        }
        let Some(row) = self.ranks.get_mut(rank) else {
            return false;
        };
        let Some(new_index) = index.checked_add_signed(amount) else {
            return false;
        };
        if index >= row.len() || new_index >= row.len() {
            return false;
        }
        let v = row.remove(index);
        row.insert(new_index, v);
        let start = index.min(new_index);
        self.reindex_rank_from(rank, start);
        true
    }

    /// Sorts `vertices` by their index within their rank.
    pub fn sort_by_order(&self, vertices: &[VertexId]) -> Vec<VertexId> {
        let mut out = vertices.to_vec();
        out.sort_by_key(|&v| self.position_of(v));
        out
    }

    pub(crate) fn positions(&self) -> &VertexVec<usize> {
        &self.positions
    }
}

impl From<Vec<Vec<VertexId>>> for Order {
    fn from(ranks: Vec<Vec<VertexId>>) -> Self {
        Self::from_ranks(ranks)
    }
}

impl From<Order> for Vec<Vec<VertexId>> {
    fn from(order: Order) -> Self {
        order.ranks
    }
}
