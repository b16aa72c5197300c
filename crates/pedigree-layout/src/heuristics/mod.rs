//! Local layout heuristics used by incremental edits.
//!
//! None of these passes own state: they read and mutate the [`LayoutState`](crate::LayoutState)
//! they are handed.

mod domino;
mod improve;
mod insert_position;
mod swap;

pub use domino::update_positions_after_node_insert;
pub use improve::improve_positioning;
pub use insert_position::{
    edge_crossings_by_future_edge, find_best_insert_position, find_best_relationship_position,
};
pub use swap::{
    ChildrenInfo, analyze_children, has_partner_between_orders, move_sibling_plus_partner_to_order,
    swap_before_parents_to_bring_to_side_if_possible, swap_partner_to_bring_to_side_if_possible,
    swap_partners,
};
