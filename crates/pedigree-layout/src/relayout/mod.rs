//! Non-incremental layout of a whole pedigree.
//!
//! Used when an edit is too disruptive for the incremental heuristics and when a graph is laid out
//! for the first time: rank, order, then x-coordinates.

mod ordering;
mod position;
mod rank;

pub use ordering::{cross_count, order};
pub use position::position;
pub use rank::{assign_ranks, compact_ranks};

use crate::error::Result;
use crate::options::LayoutOptions;
use crate::state::LayoutState;
use pedigree_graph::PedigreeGraph;

/// Computes ranks, order and positions from scratch. Auxiliary structures are left empty.
pub fn relayout(g: &PedigreeGraph, options: &LayoutOptions) -> Result<LayoutState> {
    let (mut ranks, outcome) = assign_ranks(g);
    outcome.into_result("ranking")?;
    compact_ranks(g, &mut ranks).into_result("rank compaction")?;

    let order = order(g, &ranks, options);
    let positions = position(g, &ranks, &order, options);

    Ok(LayoutState {
        ranks,
        order,
        positions,
        ..Default::default()
    })
}
