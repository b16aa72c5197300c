//! What changed in the drawing after one edit.

use crate::state::LayoutState;
use crate::vertical::VerticalLevels;
use crate::xcoord::COORD_TOLERANCE;
use pedigree_graph::{PedigreeGraph, VertexId, VertexVec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Vertex ids a renderer needs to touch after an edit. Every list is sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new: Vec<VertexId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moved: Vec<VertexId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlight: Vec<VertexId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animate: Vec<VertexId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<VertexId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty()
            && self.moved.is_empty()
            && self.highlight.is_empty()
            && self.animate.is_empty()
            && self.removed.is_empty()
    }

    pub(crate) fn normalized(mut self) -> Self {
        for list in [
            &mut self.new,
            &mut self.moved,
            &mut self.highlight,
            &mut self.animate,
            &mut self.removed,
        ] {
            list.sort_unstable();
            list.dedup();
        }
        self
    }
}

/// The parts of a [`LayoutState`] needed to tell which vertices moved.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub positions: VertexVec<f64>,
    pub ranks: VertexVec<usize>,
    pub vertical: VerticalLevels,
    pub rank_y: Vec<f64>,
}

impl Checkpoint {
    pub fn capture(state: &LayoutState) -> Self {
        Self {
            positions: state.positions.clone(),
            ranks: state.ranks.clone(),
            vertical: state.vertical.clone(),
            rank_y: state.rank_y.clone(),
        }
    }

    /// Number of vertices that existed when the checkpoint was taken.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn rank_of(&self, v: VertexId) -> Option<usize> {
        self.ranks.get(v).copied()
    }
}

/// Persons and relationships that existed at `before` and need to be redrawn now.
///
/// A vertex moved when the y of its rank or its x changed, or when one of its in-edges spans
/// extra ranks. A relationship also counts as moved when its child line changed lane. For a
/// moved person, the relationship it descends from and its own relationships are redrawn too.
pub fn find_moved_nodes(g: &PedigreeGraph, before: &Checkpoint, state: &LayoutState) -> Vec<VertexId> {
    let old_count = before.num_vertices().min(g.num_vertices());
    let is_old = |v: VertexId| v.index() < old_count;
    let mut moved: BTreeSet<VertexId> = BTreeSet::new();

    for v in (0..old_count).map(VertexId::new) {
        if !g.is_person(v) && !g.is_relationship(v) {
            continue;
        }

        let y_now = state.rank_y.get(state.rank_of(v)).copied();
        let y_before = before
            .rank_of(v)
            .and_then(|r| before.rank_y.get(r))
            .copied();
        let x_before = before.positions.get(v).copied();
        if differs(y_now, y_before) || differs(Some(state.x(v)), x_before) {
            moved.insert(v);
            if g.is_person(v) {
                if let Some(rel) = g.producing_relationship(v).filter(|&r| is_old(r)) {
                    moved.insert(rel);
                }
                moved.extend(g.out_edges(v).iter().copied().filter(|&r| is_old(r)));
            }
            continue;
        }

        let rank = state.rank_of(v);
        let long_edge = if g.is_relationship(v) {
            g.in_edges(v).iter().any(|&p| state.rank_of(p) != rank)
        } else {
            g.in_edges(v).iter().any(|&hub| state.rank_of(hub) + 1 != rank)
        };
        if long_edge {
            moved.insert(v);
            continue;
        }

        if g.is_relationship(v) {
            if let Some(hub) = g.relationship_childhub(v) {
                let level_before = before.vertical.child_edge_level.get(&hub).copied();
                let level_now = state.vertical.child_edge_level.get(&hub).copied();
                if level_before != level_now {
                    moved.insert(v);
                }
            }
        }
    }

    moved.into_iter().collect()
}

// Rank y-coordinates are re-anchored after every edit, which is not exact in floating point.
fn differs(now: Option<f64>, before: Option<f64>) -> bool {
    match (now, before) {
        (Some(a), Some(b)) => (a - b).abs() > COORD_TOLERANCE,
        (a, b) => a.is_some() != b.is_some(),
    }
}

/// Every person and relationship, the conservative answer for operations that touch everything.
pub fn all_nodes(g: &PedigreeGraph) -> Vec<VertexId> {
    g.vertex_ids()
        .filter(|&v| g.is_person(v) || g.is_relationship(v))
        .collect()
}
