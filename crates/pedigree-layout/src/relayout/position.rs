//! X-coordinates for a full relayout: left packing refined by centering sweeps.

use crate::options::LayoutOptions;
use crate::order::Order;
use crate::xcoord::XCoord;
use pedigree_graph::{PedigreeGraph, VertexId, VertexVec};

pub fn position(
    g: &PedigreeGraph,
    ranks: &VertexVec<usize>,
    order: &Order,
    options: &LayoutOptions,
) -> VertexVec<f64> {
    let mut xs = XCoord::packed(g, order, options);
    {
        let mut xc = XCoord::new(g, ranks, order, &mut xs, options);
        for _ in 0..options.max_xcoord_iterations {
            center_down(g, order, &mut xc);
            center_up(g, order, &mut xc);
        }
        xc.normalize();
    }
    xs
}

/// Top-down: childhubs go under their relationship, sibling groups get centered under their
/// childhub.
fn center_down(g: &PedigreeGraph, order: &Order, xc: &mut XCoord<'_>) {
    for r in 1..order.num_ranks() {
        for &v in order.rank(r) {
            if g.is_childhub(v) {
                if let Some(&rel) = g.in_edges(v).first() {
                    let target = xc.x(rel);
                    move_towards(xc, v, target);
                }
            }
        }
        for &v in order.rank(r) {
            if !g.is_childhub(v) {
                continue;
            }
            let children: Vec<VertexId> = order
                .sort_by_order(g.out_edges(v))
                .into_iter()
                .filter(|&c| xc.rank_of(c) == r + 1)
                .collect();
            if children.is_empty() {
                continue;
            }
            let mean = children.iter().map(|&c| xc.x(c)).sum::<f64>() / children.len() as f64;
            let delta = xc.x(v) - mean;
            shift_group(xc, &children, delta);
        }
    }
}

/// Bottom-up: childhubs move towards the middle of their children, relationships towards their
/// childhub.
fn center_up(g: &PedigreeGraph, order: &Order, xc: &mut XCoord<'_>) {
    for r in (0..order.num_ranks()).rev() {
        for &v in order.rank(r) {
            let target = if g.is_childhub(v) {
                let children = g.out_edges(v);
                if children.is_empty() {
                    continue;
                }
                let (min, max) = children
                    .iter()
                    .map(|&c| xc.x(c))
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                        (lo.min(x), hi.max(x))
                    });
                (min + max) / 2.0
            } else if g.is_relationship(v) {
                match g.relationship_childhub(v) {
                    Some(hub) => xc.x(hub),
                    None => continue,
                }
            } else {
                continue;
            };
            move_towards(xc, v, target);
        }
    }
}

fn move_towards(xc: &mut XCoord<'_>, v: VertexId, target: f64) {
    let x = xc.x(v);
    if target > x {
        xc.shift_right_and_shift_other_if_necessary(v, target - x);
    } else if target < x {
        xc.move_node_as_close_to_x_as_possible(v, target);
    }
}

/// Shifts a left-to-right sorted group by `delta`: rightwards pushing whatever is in the way,
/// leftwards only as far as the left neighbours allow.
fn shift_group(xc: &mut XCoord<'_>, group: &[VertexId], delta: f64) {
    if delta > 0.0 {
        for &v in group.iter().rev() {
            xc.shift_right_and_shift_other_if_necessary(v, delta);
        }
    } else if delta < 0.0 {
        for &v in group {
            xc.shift_left_one_vertex(v, -delta);
        }
    }
}
