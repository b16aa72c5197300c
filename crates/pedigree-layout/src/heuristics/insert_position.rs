//! Choosing the slot for a new vertex on its rank.

use super::swap::analyze_children;
use crate::state::LayoutState;
use pedigree_graph::{PedigreeGraph, VertexId};

/// Best slot on `rank` for a new vertex connected to `edge_to`.
///
/// Every slot is scored by the crossings the future edge would add; ties go to the slot closest to
/// the desired one: right after the existing children when inserting below a childhub, the end of
/// the rank otherwise.
pub fn find_best_insert_position(
    g: &PedigreeGraph,
    state: &LayoutState,
    rank: usize,
    edge_to: VertexId,
    prefer_left: bool,
) -> usize {
    let len = state.order.rank_len(rank);
    if len == 0 {
        return 0;
    }

    let edge_to_rank = state.rank_of(edge_to);
    let edge_to_order = state.order.position_of(edge_to);
    if edge_to_rank == rank {
        if g.is_person(edge_to) {
            return find_best_relationship_position(g, state, rank, edge_to, prefer_left);
        }
        return edge_to_order + 1;
    }

    let childhub_penalty = g.is_childhub(edge_to);
    let desired = if childhub_penalty && rank > edge_to_rank && !g.out_edges(edge_to).is_empty() {
        analyze_children(g, state, edge_to)
            .map(|info| info.right_most_child_order + 1)
            .unwrap_or(len)
    } else {
        len
    };

    let mut best_order = 0;
    let mut best_crossings = f64::INFINITY;
    let mut best_distance = usize::MAX;
    for o in 0..=len {
        let crossings = edge_crossings_by_future_edge(
            g,
            state,
            rank,
            o as f64 - 0.5,
            edge_to_rank,
            edge_to_order as f64,
            childhub_penalty,
        );
        let distance = o.abs_diff(desired);
        if crossings < best_crossings || (crossings == best_crossings && distance <= best_distance) {
            best_order = o;
            best_crossings = crossings;
            best_distance = distance;
        }
    }

    tracing::trace!(rank, edge_to = %edge_to, best_order, best_crossings, "insert position");
    best_order
}

/// Projected cost of a new edge between `(from_rank, from_order)` and `(to_rank, to_order)`.
///
/// A half-integer order stands for the gap where a new vertex would go. Every crossed edge counts
/// 1, an edge into a childhub counts infinity when `childhub_penalty` is set, a same-rank edge on
/// the lower rank that the new edge splits counts 2, and each same-rank edge straddling the
/// insertion slot adds 0.1.
pub fn edge_crossings_by_future_edge(
    g: &PedigreeGraph,
    state: &LayoutState,
    from_rank: usize,
    from_order: f64,
    to_rank: usize,
    to_order: f64,
    childhub_penalty: bool,
) -> f64 {
    if from_rank == to_rank {
        return 0.0;
    }
    let (rank_upper, order_upper, rank_lower, order_lower) = if from_rank < to_rank {
        (from_rank, from_order, to_rank, to_order)
    } else {
        (to_rank, to_order, from_rank, from_order)
    };

    let mut crossings = 0.0;
    for (ord, &vertex) in state.order.rank(rank_lower).iter().enumerate() {
        let ord = ord as f64;
        if ord == order_lower {
            continue;
        }
        for &target in g.in_edges(vertex) {
            let target_rank = state.rank_of(target);
            let target_order = state.order.position_of(target) as f64;
            if target_rank == rank_lower {
                if (ord < order_lower && target_order > order_lower)
                    || (ord > order_lower && target_order < order_lower)
                {
                    crossings += 2.0;
                }
            } else if target_rank == rank_upper
                && ((ord < order_lower && target_order > order_upper)
                    || (ord > order_lower && target_order < order_upper))
            {
                crossings += if childhub_penalty && g.is_childhub(target) {
                    f64::INFINITY
                } else {
                    1.0
                };
            }
        }
    }

    // Discourage splitting a person from a same-rank relationship.
    for (ord, &vertex) in state.order.rank(from_rank).iter().enumerate() {
        let ord = ord as f64;
        if ord == from_order {
            continue;
        }
        for &target in g.out_edges(vertex) {
            if state.rank_of(target) != from_rank {
                continue;
            }
            let target_order = state.order.position_of(target) as f64;
            if (from_order < ord && from_order > target_order)
                || (from_order > ord && from_order < target_order)
            {
                crossings += 0.1;
            }
        }
    }

    crossings
}

/// Side of person `v` (on `rank`) for a new relationship: next to the side with fewer existing
/// relationships, right on ties unless `prefer_left`.
pub fn find_best_relationship_position(
    g: &PedigreeGraph,
    state: &LayoutState,
    rank: usize,
    v: VertexId,
    prefer_left: bool,
) -> usize {
    let v_order = state.order.position_of(v);
    if prefer_left && v_order == 0 {
        return 0;
    }

    let (mut left_of, mut right_of) = (0, 0);
    for &u in g.out_edges(v) {
        if state.rank_of(u) != rank {
            continue;
        }
        if state.order.position_of(u) > v_order {
            right_of += 1;
        } else {
            left_of += 1;
        }
    }

    if right_of > left_of || (prefer_left && right_of == left_of) {
        v_order
    } else {
        v_order + 1
    }
}
