//! Mutable layout metadata shared by every pass.
//!
//! Which pass may touch which field:
//! - insertion and the swap heuristics mutate `ranks`, `order` and `positions`;
//! - the cleanup pass mutates `positions` only;
//! - [`LayoutState::recompute_auxiliary`] rebuilds `vertical`, `rank_y` and `ancestors`, which are
//!   pure functions of the other fields.

use crate::ancestors::AncestorIndex;
use crate::error::{Invariant, Result};
use crate::options::LayoutOptions;
use crate::order::Order;
use crate::vertical::{self, VerticalLevels};
use pedigree_graph::{PedigreeGraph, VertexId, VertexVec};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutState {
    pub ranks: VertexVec<usize>,
    pub order: Order,
    /// X of the center of every vertex.
    pub positions: VertexVec<f64>,
    pub vertical: VerticalLevels,
    pub rank_y: Vec<f64>,
    pub ancestors: AncestorIndex,
}

impl LayoutState {
    pub fn num_ranks(&self) -> usize {
        self.order.num_ranks()
    }

    pub fn rank_of(&self, v: VertexId) -> usize {
        self.ranks.get(v).copied().unwrap_or(0)
    }

    pub fn x(&self, v: VertexId) -> f64 {
        self.positions.get(v).copied().unwrap_or(0.0)
    }

    /// Inserts an empty rank before `at`; every vertex on rank `at` or below moves down by one.
    pub fn insert_rank(&mut self, at: usize) {
        for r in self.ranks.values_mut() {
            if *r >= at {
                *r += 1;
            }
        }
        self.order.insert_rank(at);
    }

    /// Places a freshly created vertex at `(rank, index)`. Its x is left for the caller to pick.
    pub fn register_vertex(&mut self, v: VertexId, rank: usize, index: usize) {
        self.ranks.ensure(v, 0);
        self.ranks[v] = rank;
        self.positions.ensure(v, 0.0);
        self.order.insert(rank, index, v);
    }

    /// Rebuilds lanes, rank y-coordinates and ancestor sets.
    ///
    /// `anchor` is the rank of vertex 0 and the rank y-coordinates before the edit; when given,
    /// vertex 0 keeps its previous y.
    pub fn recompute_auxiliary(
        &mut self,
        g: &PedigreeGraph,
        options: &LayoutOptions,
        anchor: Option<(usize, &[f64])>,
    ) {
        self.vertical = VerticalLevels::compute(g, &self.order, &self.positions);
        self.rank_y =
            vertical::compute_rank_y(g, &self.order, &self.vertical, options, &self.ranks, anchor);
        self.ancestors = AncestorIndex::compute(g, &self.order);
    }

    /// Checks that `ranks`, `order` and `positions` describe every vertex of `g` exactly once and
    /// that the generational layering holds.
    pub fn check_consistency(&self, g: &PedigreeGraph) -> Result<()> {
        let n = g.num_vertices();
        if self.ranks.len() != n || self.positions.len() != n {
            return Err(Invariant::OrderInconsistent(format!(
                "{n} vertices but {} ranks and {} positions",
                self.ranks.len(),
                self.positions.len()
            ))
            .into());
        }

        let mut seen = vec![false; n];
        for (r, row) in self.order.ranks().iter().enumerate() {
            for (i, &v) in row.iter().enumerate() {
                if v.index() >= n {
                    return Err(Invariant::OrderInconsistent(format!(
                        "rank {r} lists unknown vertex {v}"
                    ))
                    .into());
                }
                if std::mem::replace(&mut seen[v.index()], true) {
                    return Err(Invariant::OrderInconsistent(format!(
                        "vertex {v} is placed twice"
                    ))
                    .into());
                }
                if self.ranks[v] != r || self.order.position_of(v) != i {
                    return Err(Invariant::OrderInconsistent(format!(
                        "vertex {v} is listed at ({r}, {i}) but recorded at ({}, {})",
                        self.ranks[v],
                        self.order.position_of(v)
                    ))
                    .into());
                }
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(Invariant::OrderInconsistent(format!(
                "vertex {missing} is not placed on any rank"
            ))
            .into());
        }
        if self.order.positions().len() < n {
            return Err(Invariant::OrderInconsistent("inverse order is too short".into()).into());
        }

        for v in g.vertex_ids() {
            let rank = self.ranks[v];
            if g.is_relationship(v) {
                if g.in_edges(v).iter().any(|&p| self.ranks[p] != rank) {
                    return Err(layering(v, "partners must share the relationship's rank"));
                }
                if let Some(hub) = g.relationship_childhub(v) {
                    if self.ranks[hub] != rank + 1 {
                        return Err(layering(v, "childhub must sit one rank below"));
                    }
                }
            } else if g.is_childhub(v) {
                if g.out_edges(v).iter().any(|&c| self.ranks[c] <= rank) {
                    return Err(layering(v, "children must sit below their childhub"));
                }
            }
        }
        Ok(())
    }
}

fn layering(vertex: VertexId, reason: &'static str) -> crate::error::Error {
    Invariant::Layering { vertex, reason }.into()
}
