//! Serialized layout: the graph plus ranks, order and positions.
//!
//! ```json
//! { "GG": [ ...vertices... ], "ranks": [0, 0, 0, 1, 2], "order": [[0, 2, 1], [3], [4]],
//!   "positions": [5, 41, 23, 23, 23] }
//! ```
//!
//! Nothing else is stored: lanes, rank y-coordinates and ancestors are recomputed on load.

use crate::error::{Precondition, Result};
use crate::options::LayoutOptions;
use crate::order::Order;
use crate::state::LayoutState;
use pedigree_graph::{GraphOptions, PedigreeGraph, SerializedVertex, VertexVec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "GG")]
    pub graph: Vec<SerializedVertex>,
    pub ranks: Vec<usize>,
    pub order: Order,
    pub positions: Vec<f64>,
}

impl Snapshot {
    pub fn capture(g: &PedigreeGraph, state: &LayoutState) -> Self {
        Self {
            graph: g.serialize(),
            ranks: state.ranks.as_slice().to_vec(),
            order: state.order.clone(),
            positions: state.positions.as_slice().to_vec(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Rebuilds the graph and the layout state, restoring ranks, order and positions verbatim.
    pub fn restore(
        self,
        graph_options: GraphOptions,
        options: &LayoutOptions,
    ) -> Result<(PedigreeGraph, LayoutState)> {
        let g = PedigreeGraph::from_serialized(&self.graph, graph_options)
            .map_err(|err| Precondition::MalformedSnapshot(err.to_string()))?;

        let n = g.num_vertices();
        if self.ranks.len() != n || self.positions.len() != n {
            return Err(Precondition::MalformedSnapshot(format!(
                "{n} vertices but {} ranks and {} positions",
                self.ranks.len(),
                self.positions.len()
            ))
            .into());
        }
        if let Some(v) = self.order.ranks().iter().flatten().find(|v| v.index() >= n) {
            return Err(
                Precondition::MalformedSnapshot(format!("order lists unknown vertex {v}")).into(),
            );
        }

        let mut state = LayoutState {
            ranks: VertexVec::from(self.ranks),
            order: self.order,
            positions: VertexVec::from(self.positions),
            ..Default::default()
        };
        state
            .check_consistency(&g)
            .map_err(|err| Precondition::MalformedSnapshot(err.to_string()))?;
        state.recompute_auxiliary(&g, options, None);
        Ok((g, state))
    }
}
