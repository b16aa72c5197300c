//! Shift propagation after a vertex was inserted into an existing layout.
//!
//! The new vertex gets the x closest to its anchor that fits between its neighbours. Whatever it
//! overlaps is pushed right, and every pushed vertex drags along the vertices attached to it, each
//! by the exact amount its source moved. Vertices earlier in the order never move left.

use crate::options::LayoutOptions;
use crate::state::LayoutState;
use crate::util::Outcome;
use crate::xcoord::XCoord;
use pedigree_graph::{PedigreeGraph, VertexId};
use rustc_hash::FxHashSet as HashSet;
use std::collections::{BTreeMap, VecDeque};

/// Places `new_node` (already registered in `state`) next to `connected` and pushes the rest of
/// the drawing out of its way.
///
/// Rules, applied to every vertex popped from the work queue:
/// - an overlapped right neighbour is shifted by the overlap and queued;
/// - a relationship pulls its childhub right below itself when the childhub is further left;
/// - in-edges follow the shift, except for the new person itself and for relationships, which only
///   drag a partner on their left that has no parents and no other relationship;
/// - a childhub follows only once all its children moved, by the smallest of their shifts;
/// - a childhub drags its children only when they are all to its left;
/// - same-rank out-edges never propagate.
pub fn update_positions_after_node_insert(
    g: &PedigreeGraph,
    state: &mut LayoutState,
    options: &LayoutOptions,
    new_node: VertexId,
    connected: VertexId,
) -> Outcome {
    let new_rank = state.rank_of(new_node);
    let new_is_right = state.order.position_of(new_node) > state.order.position_of(connected);
    let connected_rank = state.rank_of(connected);

    let mut xc = XCoord::new(
        g,
        &state.ranks,
        &state.order,
        &mut state.positions,
        options,
    );

    let left_boundary = xc.left_most_no_disturb_position(new_node);
    let right_boundary = xc.right_most_no_disturb_position(new_node);

    let desired = if connected_rank != new_rank {
        xc.x(connected)
    } else if new_is_right {
        xc.right_edge(connected) + xc.separation(new_node, connected) + xc.half_width(new_node)
    } else {
        xc.left_edge(connected) - xc.separation(new_node, connected) - xc.half_width(new_node)
    };
    // Between two tightly packed vertices the left boundary exceeds the right one.
    let insert_x = if desired < left_boundary {
        left_boundary
    } else if desired > right_boundary {
        left_boundary.max(right_boundary)
    } else {
        desired
    };
    xc.set_x(new_node, insert_x);
    tracing::trace!(vertex = %new_node, x = insert_x, desired, "placed new vertex");

    let mut processed: HashSet<VertexId> = HashSet::default();
    processed.insert(new_node);

    let mut queue: VecDeque<(VertexId, f64)> = VecDeque::new();
    queue.push_back((new_node, 0.0));

    let mut steps = 0;
    loop {
        // childhub -> (children that moved, smallest shift among them)
        let mut children_moved: BTreeMap<VertexId, (usize, f64)> = BTreeMap::new();

        while let Some((v, amount)) = queue.pop_front() {
            steps += 1;
            if steps > options.max_propagation_steps {
                return Outcome::IterationLimitExceeded {
                    limit: options.max_propagation_steps,
                };
            }

            let x = xc.x(v);
            let right_most_ok = xc.right_most_no_disturb_position(v);
            if x > right_most_ok {
                if let Some(right) = xc.right_neighbour(v) {
                    let push = x - right_most_ok;
                    xc.shift(right, push);
                    processed.insert(right);
                    queue.push_back((right, push));
                    tracing::trace!(from = %v, vertex = %right, shift = push, "pushed right neighbour");
                }
            }

            let in_edges = g.in_edges(v);
            let out_edges = g.out_edges(v);

            if g.is_relationship(v) {
                if let Some(hub) = g.relationship_childhub(v) {
                    let behind = x - xc.x(hub);
                    if behind > 0.0 {
                        xc.shift(hub, behind);
                        processed.insert(hub);
                        queue.push_back((hub, behind));
                    }
                }
            }

            let follow_in_edges: Vec<VertexId> = if g.is_person(v) && v == new_node {
                Vec::new()
            } else if g.is_relationship(v) {
                let order_of = |p: VertexId| xc.order_of(p);
                in_edges
                    .iter()
                    .copied()
                    .filter(|&p| {
                        in_edges.iter().any(|&other| other != p && order_of(p) < order_of(other))
                            && g.out_edges(p).len() == 1
                            && g.in_edges(p).is_empty()
                    })
                    .collect()
            } else {
                in_edges.to_vec()
            };

            for u in follow_in_edges {
                if processed.contains(&u) {
                    continue;
                }
                if g.is_person(v) && g.is_childhub(u) {
                    let entry = children_moved.entry(u).or_insert((0, amount));
                    entry.0 += 1;
                    entry.1 = entry.1.min(amount);
                    continue;
                }
                if amount > 0.0 {
                    processed.insert(u);
                    xc.shift(u, amount);
                    queue.push_back((u, amount));
                }
            }

            if amount <= 0.0 {
                continue;
            }
            if g.is_childhub(v) {
                let right_most_child = out_edges
                    .iter()
                    .map(|&c| xc.x(c))
                    .fold(f64::NEG_INFINITY, f64::max);
                if right_most_child >= xc.x(v) {
                    continue;
                }
            }
            let v_rank = xc.rank_of(v);
            for &u in out_edges {
                if xc.rank_of(u) == v_rank || processed.contains(&u) {
                    continue;
                }
                if g.is_relationship(v) && xc.x(u) >= xc.x(v) {
                    continue;
                }
                processed.insert(u);
                xc.shift(u, amount);
                queue.push_back((u, amount));
            }
        }

        for (hub, (count, min_shift)) in children_moved {
            if count >= g.out_edges(hub).len() && min_shift > 0.0 && processed.insert(hub) {
                xc.shift(hub, min_shift);
                queue.push_back((hub, min_shift));
                tracing::trace!(vertex = %hub, shift = min_shift, "childhub follows its children");
            }
        }

        if queue.is_empty() {
            break;
        }
    }

    Outcome::Converged { iterations: steps }
}
