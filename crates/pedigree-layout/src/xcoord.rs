//! X-coordinate arithmetic on top of a fixed rank/order structure.
//!
//! All coordinates are vertex centers. A vertex occupies `[x - half_width, x + half_width]`, and
//! two neighbours on one rank must keep at least [`XCoord::separation`] between their borders.

use crate::error::{Invariant, Result};
use crate::options::LayoutOptions;
use crate::order::Order;
use pedigree_graph::{PedigreeGraph, VertexId, VertexVec};

/// Slack allowed when comparing coordinates. Centering averages positions, so separations can
/// come out a few ulps short of the exact minimum.
pub const COORD_TOLERANCE: f64 = 1e-6;

pub struct XCoord<'a> {
    g: &'a PedigreeGraph,
    ranks: &'a VertexVec<usize>,
    order: &'a Order,
    xcoord: &'a mut VertexVec<f64>,
    options: &'a LayoutOptions,
}

impl<'a> XCoord<'a> {
    pub fn new(
        g: &'a PedigreeGraph,
        ranks: &'a VertexVec<usize>,
        order: &'a Order,
        xcoord: &'a mut VertexVec<f64>,
        options: &'a LayoutOptions,
    ) -> Self {
        Self {
            g,
            ranks,
            order,
            xcoord,
            options,
        }
    }

    /// Left-packed coordinates: the first vertex of every rank touches 0 and each following
    /// vertex sits at exactly the minimum separation from its left neighbour.
    pub fn packed(g: &PedigreeGraph, order: &Order, options: &LayoutOptions) -> VertexVec<f64> {
        let mut xs: VertexVec<f64> = vec![0.0; g.num_vertices()].into();
        for row in order.ranks() {
            let mut prev: Option<VertexId> = None;
            for &v in row {
                xs.ensure(v, 0.0);
                xs[v] = match prev {
                    None => g.half_width(v),
                    Some(p) => xs[p] + min_separation(g, options, p, v),
                };
                prev = Some(v);
            }
        }
        xs
    }

    pub fn x(&self, v: VertexId) -> f64 {
        self.xcoord.get(v).copied().unwrap_or(0.0)
    }

    pub fn set_x(&mut self, v: VertexId, x: f64) {
        self.xcoord.ensure(v, 0.0);
        self.xcoord[v] = x;
    }

    pub fn shift(&mut self, v: VertexId, amount: f64) {
        let x = self.x(v);
        self.set_x(v, x + amount);
    }

    pub fn half_width(&self, v: VertexId) -> f64 {
        self.g.half_width(v)
    }

    pub fn rank_of(&self, v: VertexId) -> usize {
        self.ranks.get(v).copied().unwrap_or(0)
    }

    pub fn order_of(&self, v: VertexId) -> usize {
        self.order.position_of(v)
    }

    /// Minimum gap between the borders of `a` and `b`.
    pub fn separation(&self, a: VertexId, b: VertexId) -> f64 {
        separation(self.g, self.options, a, b)
    }

    /// Minimum distance between the centers of `a` and `b`.
    pub fn min_separation(&self, a: VertexId, b: VertexId) -> f64 {
        min_separation(self.g, self.options, a, b)
    }

    pub fn left_edge(&self, v: VertexId) -> f64 {
        self.x(v) - self.half_width(v)
    }

    pub fn right_edge(&self, v: VertexId) -> f64 {
        self.x(v) + self.half_width(v)
    }

    pub fn left_neighbour(&self, v: VertexId) -> Option<VertexId> {
        self.order.left_neighbour(v, self.rank_of(v))
    }

    pub fn right_neighbour(&self, v: VertexId) -> Option<VertexId> {
        self.order.right_neighbour(v, self.rank_of(v))
    }

    /// Smallest x `v` can take without pushing its left neighbour; `-inf` at the start of a rank.
    pub fn left_most_no_disturb_position(&self, v: VertexId) -> f64 {
        match self.left_neighbour(v) {
            Some(left) => self.right_edge(left) + self.separation(v, left) + self.half_width(v),
            None => f64::NEG_INFINITY,
        }
    }

    /// Largest x `v` can take without pushing its right neighbour; `+inf` at the end of a rank.
    pub fn right_most_no_disturb_position(&self, v: VertexId) -> f64 {
        match self.right_neighbour(v) {
            Some(right) => self.left_edge(right) - self.separation(v, right) - self.half_width(v),
            None => f64::INFINITY,
        }
    }

    pub fn slack_on_the_left(&self, v: VertexId) -> f64 {
        self.x(v) - self.left_most_no_disturb_position(v)
    }

    pub fn slack_on_the_right(&self, v: VertexId) -> f64 {
        self.right_most_no_disturb_position(v) - self.x(v)
    }

    /// Moves `v` left by up to `amount`, stopping at its left neighbour. Returns the actual shift.
    pub fn shift_left_one_vertex(&mut self, v: VertexId, amount: f64) -> f64 {
        let actual = amount.min(self.slack_on_the_left(v)).max(0.0);
        self.shift(v, -actual);
        actual
    }

    /// Moves `v` right by up to `amount`, stopping at its right neighbour. Returns the actual shift.
    pub fn shift_right_one_vertex(&mut self, v: VertexId, amount: f64) -> f64 {
        let actual = amount.min(self.slack_on_the_right(v)).max(0.0);
        self.shift(v, actual);
        actual
    }

    /// Moves `v` right by `amount` and pushes each right neighbour just far enough to keep the
    /// minimum separation.
    pub fn shift_right_and_shift_other_if_necessary(&mut self, v: VertexId, amount: f64) {
        self.shift(v, amount);
        let rank = self.rank_of(v);
        let mut prev = v;
        for i in self.order.position_of(v) + 1..self.order.rank_len(rank) {
            let Some(next) = self.order.vertex_at(rank, i) else {
                break;
            };
            let needed = self.right_edge(prev) + self.separation(prev, next);
            if self.left_edge(next) >= needed {
                break;
            }
            let x = needed + self.half_width(next);
            self.set_x(next, x);
            prev = next;
        }
    }

    /// Moves `v` towards `target` as far as its neighbours allow. Returns whether `v` moved.
    pub fn move_node_as_close_to_x_as_possible(&mut self, v: VertexId, target: f64) -> bool {
        let x = self.x(v);
        let new_x = if x > target {
            target.max(self.left_most_no_disturb_position(v))
        } else {
            target.min(self.right_most_no_disturb_position(v))
        };
        if new_x == x {
            return false;
        }
        self.set_x(v, new_x);
        true
    }

    /// Shifts everything so that the leftmost left edge is at 0.
    pub fn normalize(&mut self) {
        let min_left = self
            .g
            .vertex_ids()
            .map(|v| self.left_edge(v))
            .fold(f64::INFINITY, f64::min);
        if !min_left.is_finite() {
            return;
        }
        for x in self.xcoord.values_mut() {
            *x -= min_left;
        }
    }

    /// Checks the minimum separation between every pair of neighbours, up to
    /// [`COORD_TOLERANCE`].
    pub fn validate(&self) -> Result<()> {
        for row in self.order.ranks() {
            for pair in row.windows(2) {
                let (left, right) = (pair[0], pair[1]);
                let gap = self.x(right) - self.x(left);
                if gap + COORD_TOLERANCE < self.min_separation(left, right) {
                    return Err(Invariant::Overlap { left, right }.into());
                }
            }
        }
        Ok(())
    }
}

pub fn separation(g: &PedigreeGraph, options: &LayoutOptions, a: VertexId, b: VertexId) -> f64 {
    let structural = |v: VertexId| g.kind(v).is_some_and(|k| k.is_structural());
    match (structural(a), structural(b)) {
        (true, true) => options.horizontal_rel_rel_separation_dist,
        (true, false) | (false, true) => options.horizontal_rel_separation_dist,
        (false, false) => options.horizontal_person_separation_dist,
    }
}

pub fn min_separation(g: &PedigreeGraph, options: &LayoutOptions, a: VertexId, b: VertexId) -> f64 {
    g.half_width(a) + separation(g, options, a, b) + g.half_width(b)
}
