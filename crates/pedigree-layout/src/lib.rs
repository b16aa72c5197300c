#![forbid(unsafe_code)]

//! Incremental layered layout for pedigree diagrams.
//!
//! A pedigree is drawn on horizontal ranks: persons and the relationships between them share a
//! rank, each relationship's childhub sits one rank below it, and the children hang one rank below
//! the childhub. [`PositionedGraph`] owns a [`PedigreeGraph`](graph::PedigreeGraph) plus its
//! [`LayoutState`] and applies discrete edits (add a child, add parents, add a partner, ...) while
//! moving as little of the existing drawing as possible. Every edit returns a [`ChangeSet`] that
//! tells a renderer which vertices are new and which ones moved.

pub use pedigree_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod ancestors;
pub mod change_set;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod options;
pub mod order;
pub mod relayout;
pub mod snapshot;
pub mod state;
pub mod util;
pub mod vertical;
pub mod xcoord;

pub use ancestors::AncestorIndex;
pub use change_set::ChangeSet;
pub use engine::{Point, PositionedGraph};
pub use error::{Error, Invariant, Precondition, Result};
pub use options::LayoutOptions;
pub use order::Order;
pub use snapshot::Snapshot;
pub use state::LayoutState;
pub use util::Outcome;
pub use vertical::{OutEdgeLevel, VerticalLevels};
pub use xcoord::XCoord;
