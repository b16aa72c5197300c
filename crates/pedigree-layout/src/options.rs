//! Layout configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PERSON_SEPARATION: f64 = 10.0;
pub const DEFAULT_REL_SEPARATION: f64 = 6.0;
pub const DEFAULT_REL_REL_SEPARATION: f64 = 8.0;
pub const DEFAULT_Y_NODE_TO_CHILDHUB: f64 = 21.6;
pub const DEFAULT_Y_CHILDHUB_TO_NODE: f64 = 14.0;
pub const DEFAULT_Y_EXTRA_PER_LINE: f64 = 4.0;
pub const DEFAULT_MAX_ORDERING_ITERATIONS: usize = 24;
pub const DEFAULT_MAX_XCOORD_ITERATIONS: usize = 4;
pub const DEFAULT_MAX_IMPROVE_ITERATIONS: usize = 100;
pub const DEFAULT_MAX_PROPAGATION_STEPS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Gap between the borders of two neighbouring persons.
    pub horizontal_person_separation_dist: f64,
    /// Gap between a person and a relationship or childhub.
    pub horizontal_rel_separation_dist: f64,
    /// Gap between two structural vertices.
    pub horizontal_rel_rel_separation_dist: f64,
    pub y_distance_node_to_childhub: f64,
    pub y_distance_childhub_to_node: f64,
    /// Extra vertical room per additional horizontal line routed between two ranks.
    pub y_extra_per_horizontal_line: f64,
    /// Barycenter sweeps during a full relayout.
    pub max_ordering_iterations: usize,
    /// Centering sweeps during a full relayout.
    pub max_xcoord_iterations: usize,
    pub max_improve_iterations: usize,
    pub max_propagation_steps: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            horizontal_person_separation_dist: DEFAULT_PERSON_SEPARATION,
            horizontal_rel_separation_dist: DEFAULT_REL_SEPARATION,
            horizontal_rel_rel_separation_dist: DEFAULT_REL_REL_SEPARATION,
            y_distance_node_to_childhub: DEFAULT_Y_NODE_TO_CHILDHUB,
            y_distance_childhub_to_node: DEFAULT_Y_CHILDHUB_TO_NODE,
            y_extra_per_horizontal_line: DEFAULT_Y_EXTRA_PER_LINE,
            max_ordering_iterations: DEFAULT_MAX_ORDERING_ITERATIONS,
            max_xcoord_iterations: DEFAULT_MAX_XCOORD_ITERATIONS,
            max_improve_iterations: DEFAULT_MAX_IMPROVE_ITERATIONS,
            max_propagation_steps: DEFAULT_MAX_PROPAGATION_STEPS,
        }
    }
}
