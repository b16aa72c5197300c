//! Horizontal line routing between ranks and the resulting rank y-coordinates.
//!
//! Several horizontal lines may share the gap between two ranks: each childhub draws a child line
//! spanning its children, and each person draws one line per same-rank relationship. Lines that
//! would overlap get different vertical lanes, and ranks with many lanes are spread further apart.

use crate::options::LayoutOptions;
use crate::order::Order;
use pedigree_graph::{PedigreeGraph, VertexId, VertexVec};
use rustc_hash::FxHashMap as HashMap;

/// Lane assignment of one person -> relationship line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutEdgeLevel {
    /// Attachment slot on the person's side, counted from the person outwards.
    pub attach_level: usize,
    /// Lane above the rank used by the line; 0 means a straight line at node height.
    pub vertical_level: usize,
    /// Number of lines leaving the person on the same side.
    pub num_attach_levels: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerticalLevels {
    /// Number of lanes between rank `r` and rank `r + 1`. Every rank starts with one lane.
    pub rank_vertical_levels: Vec<usize>,
    /// Lane used by all child edges of a childhub.
    pub child_edge_level: HashMap<VertexId, usize>,
    /// Per person, the lane of each line towards a same-rank relationship.
    pub out_edge_vertical_level: HashMap<VertexId, HashMap<VertexId, OutEdgeLevel>>,
}

impl VerticalLevels {
    pub fn compute(g: &PedigreeGraph, order: &Order, positions: &VertexVec<f64>) -> Self {
        let mut levels = VerticalLevels {
            rank_vertical_levels: vec![1; order.num_ranks()],
            ..Default::default()
        };

        for r in 0..order.num_ranks() {
            let row = order.rank(r);
            for (i, &v) in row.iter().enumerate() {
                if !g.is_childhub(v) {
                    continue;
                }
                let level = levels.pick_child_edge_level(g, order, positions, &row[..i], v);
                levels.child_edge_level.insert(v, level);
                if level > levels.rank_vertical_levels[r] {
                    levels.rank_vertical_levels[r] = level;
                }
            }
        }

        for r in 0..order.num_ranks() {
            for &v in order.rank(r) {
                if g.is_person(v) {
                    levels.assign_out_edge_levels(g, order, r, v);
                }
            }
        }

        levels
    }

    pub fn child_edge_level(&self, childhub: VertexId) -> usize {
        self.child_edge_level.get(&childhub).copied().unwrap_or(0)
    }

    pub fn out_edge_level(&self, person: VertexId, rel: VertexId) -> Option<OutEdgeLevel> {
        self.out_edge_vertical_level
            .get(&person)
            .and_then(|m| m.get(&rel))
            .copied()
    }

    pub fn rank_levels(&self, rank: usize) -> usize {
        self.rank_vertical_levels.get(rank).copied().unwrap_or(1)
    }

    fn pick_child_edge_level(
        &self,
        g: &PedigreeGraph,
        order: &Order,
        positions: &VertexVec<f64>,
        earlier: &[VertexId],
        v: VertexId,
    ) -> usize {
        let children = g.out_edges(v);
        let Some((min_x, max_x)) = child_line_span(g, positions, v) else {
            return 0;
        };
        if min_x == max_x {
            return 0;
        }

        let mut forbidden: Vec<usize> = Vec::new();
        for &u in earlier {
            let u_level = self.child_edge_level(u);
            if u_level == 0 {
                continue;
            }
            let Some((u_min, u_max)) = child_line_span(g, positions, u) else {
                continue;
            };

            let crosses = g.out_edges(u).iter().any(|&uc| {
                children
                    .iter()
                    .any(|&c| order.position_of(uc) > order.position_of(c))
            });
            if crosses {
                forbidden.push(u_level);
            }

            let overlaps = (u_min >= min_x && u_min <= max_x) || (u_max >= min_x && u_max <= max_x);
            if overlaps {
                forbidden.extend(1..=u_level);
            }
        }

        let mut level = 1;
        while forbidden.contains(&level) {
            level += 1;
        }
        level
    }

    fn assign_out_edge_levels(&mut self, g: &PedigreeGraph, order: &Order, rank: usize, v: VertexId) {
        let v_order = order.position_of(v);
        let mut left: Vec<VertexId> = Vec::new();
        let mut right: Vec<VertexId> = Vec::new();
        for &rel in g.out_edges(v) {
            if order.rank(rank).get(order.position_of(rel)) != Some(&rel) {
                // long edge: the relationship sits on another rank
                continue;
            }
            if order.position_of(rel) < v_order {
                left.push(rel);
            } else {
                right.push(rel);
            }
        }
        if left.is_empty() && right.is_empty() {
            return;
        }
        left.sort_by_key(|&rel| v_order.abs_diff(order.position_of(rel)));
        right.sort_by_key(|&rel| v_order.abs_diff(order.position_of(rel)));

        let mut assigned: HashMap<VertexId, OutEdgeLevel> = HashMap::default();
        let mut max_level = 0;
        for side in [&left, &right] {
            let Some(&closest) = side.first() else {
                continue;
            };
            let (lo, hi) = span_between(v_order, order.position_of(closest));
            let mut vertical = 0;
            for &w in &order.rank(rank)[lo..hi] {
                if g.is_person(w) {
                    vertical = 2;
                    break;
                }
                vertical = 1;
            }
            for (attach, &rel) in side.iter().enumerate() {
                assigned.insert(
                    rel,
                    OutEdgeLevel {
                        attach_level: attach,
                        vertical_level: vertical,
                        num_attach_levels: side.len(),
                    },
                );
                vertical += 1;
            }
            max_level = max_level.max(vertical);
        }

        if rank > 0 && max_level > 1 {
            self.rank_vertical_levels[rank - 1] += max_level - 1;
        }
        self.out_edge_vertical_level.insert(v, assigned);
    }
}

/// Horizontal extent of the child line of `childhub`: its relationship, itself and its children.
fn child_line_span(
    g: &PedigreeGraph,
    positions: &VertexVec<f64>,
    childhub: VertexId,
) -> Option<(f64, f64)> {
    let children = g.out_edges(childhub);
    if children.is_empty() {
        return None;
    }
    let x = |v: VertexId| positions.get(v).copied().unwrap_or(0.0);
    let mut min_x = x(childhub);
    let mut max_x = min_x;
    let parent = g.in_edges(childhub).first().copied();
    for w in children.iter().copied().chain(parent) {
        min_x = min_x.min(x(w));
        max_x = max_x.max(x(w));
    }
    Some((min_x, max_x))
}

/// Exclusive index range strictly between two slots of one rank.
fn span_between(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a + 1, b) } else { (b + 1, a) }
}

/// Y-coordinate of every rank.
///
/// When `anchor` carries `(old_rank, old_rank_y)` of vertex 0, the result is shifted so that vertex
/// 0 keeps its previous y, which keeps most of the drawing in place after an edit.
pub fn compute_rank_y(
    g: &PedigreeGraph,
    order: &Order,
    levels: &VerticalLevels,
    options: &LayoutOptions,
    ranks: &VertexVec<usize>,
    anchor: Option<(usize, &[f64])>,
) -> Vec<f64> {
    let n = order.num_ranks();
    let mut rank_y = vec![0.0; n];
    for r in 1..n {
        let is_childhub_rank = order.rank(r).iter().any(|&v| g.is_childhub(v));
        let gap = if is_childhub_rank {
            options.y_distance_node_to_childhub
        } else {
            options.y_distance_childhub_to_node
        };
        let extra_lines = levels.rank_levels(r - 1).max(1) - 1;
        rank_y[r] = rank_y[r - 1] + gap + options.y_extra_per_horizontal_line * extra_lines as f64;
    }

    let first = VertexId::new(0);
    if let (Some((old_rank, old_rank_y)), Some(&new_rank)) = (anchor, ranks.get(first)) {
        if let (Some(&old_y), Some(&new_y)) = (old_rank_y.get(old_rank), rank_y.get(new_rank)) {
            let shift = new_y - old_y;
            for y in &mut rank_y {
                *y -= shift;
            }
        }
    }
    rank_y
}

/// Y of a vertex drawn on `rank` using lane `level` (childhubs use their child edge level).
pub fn node_y(rank_y: &[f64], rank: usize, level: usize, options: &LayoutOptions) -> f64 {
    let base = rank_y.get(rank).copied().unwrap_or(0.0);
    base + level.saturating_sub(1) as f64 * options.y_extra_per_horizontal_line
}

/// Y of a person -> relationship line routed on lane `level` above `rank`.
pub fn rel_line_y(rank_y: &[f64], rank: usize, level: usize, options: &LayoutOptions) -> f64 {
    let base = rank_y.get(rank).copied().unwrap_or(0.0);
    let shift = if level == 0 {
        0.0
    } else {
        options.y_distance_childhub_to_node / 2.0
    };
    base - level as f64 * options.y_extra_per_horizontal_line - shift
}
