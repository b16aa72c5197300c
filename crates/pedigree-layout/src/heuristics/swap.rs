//! Local reordering of partners and sibling groups before an insertion.
//!
//! These passes never change ranks. They swap or slide a few vertices on one rank (updating
//! `order` and `positions` together) so that the following insertion lands on a free side.

use crate::state::LayoutState;
use pedigree_graph::{PedigreeGraph, VertexId};
use rustc_hash::FxHashSet as HashSet;

/// Where the children of one childhub sit on their rank.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildrenInfo {
    pub left_most_child_id: VertexId,
    pub left_most_child_order: usize,
    /// The leftmost child has a relationship further left on its rank.
    pub left_most_has_left_partner: bool,
    pub right_most_child_id: VertexId,
    pub right_most_child_order: usize,
    /// The rightmost child has a relationship further right on its rank.
    pub right_most_has_right_partner: bool,
    pub with_partner: HashSet<VertexId>,
    pub num_with_partners: usize,
    /// Children sorted by order.
    pub ordered_children: Vec<VertexId>,
}

/// Accepts a childhub or a relationship. `None` when there are no children.
pub fn analyze_children(
    g: &PedigreeGraph,
    state: &LayoutState,
    childhub: VertexId,
) -> Option<ChildrenInfo> {
    let childhub = if g.is_relationship(childhub) {
        g.relationship_childhub(childhub)?
    } else {
        childhub
    };
    if !g.is_childhub(childhub) {
        return None;
    }

    let ordered_children = state.order.sort_by_order(g.out_edges(childhub));
    let (&left, &right) = (ordered_children.first()?, ordered_children.last()?);
    let left_order = state.order.position_of(left);
    let right_order = state.order.position_of(right);

    let with_partner: HashSet<VertexId> = ordered_children
        .iter()
        .copied()
        .filter(|&c| !g.out_edges(c).is_empty())
        .collect();

    Some(ChildrenInfo {
        left_most_child_id: left,
        left_most_child_order: left_order,
        left_most_has_left_partner: left_order > 0
            && has_partner_between_orders(g, state, left, 0, left_order - 1),
        right_most_child_id: right,
        right_most_child_order: right_order,
        right_most_has_right_partner: has_partner_between_orders(
            g,
            state,
            right,
            right_order + 1,
            usize::MAX,
        ),
        num_with_partners: with_partner.len(),
        with_partner,
        ordered_children,
    })
}

/// Whether `person` has a same-rank relationship with order in `[min_order, max_order]`.
pub fn has_partner_between_orders(
    g: &PedigreeGraph,
    state: &LayoutState,
    person: VertexId,
    min_order: usize,
    max_order: usize,
) -> bool {
    let rank = state.rank_of(person);
    g.out_edges(person).iter().any(|&rel| {
        state.rank_of(rel) == rank && (min_order..=max_order).contains(&state.order.position_of(rel))
    })
}

/// Swaps two partners drawn as `[p1]-[rel]-[p2]`. The partners trade x-coordinates, and the
/// right one and the relationship are corrected by the width difference of the two partners.
/// Returns `false` when the three are not adjacent on one rank.
pub fn swap_partners(
    g: &PedigreeGraph,
    state: &mut LayoutState,
    partner1: VertexId,
    partner2: VertexId,
    relationship: VertexId,
) -> bool {
    let rank = state.rank_of(partner1);
    if state.rank_of(partner2) != rank || state.rank_of(relationship) != rank {
        return false;
    }

    let (mut p1, mut p2) = (partner1, partner2);
    if state.order.position_of(p1) > state.order.position_of(p2) {
        std::mem::swap(&mut p1, &mut p2);
    }
    let order1 = state.order.position_of(p1);
    let order2 = state.order.position_of(p2);
    let rel_order = state.order.position_of(relationship);
    if order1 + 1 != rel_order || rel_order + 1 != order2 {
        return false;
    }

    state.order.exchange(rank, order1, order2);

    let width_decrease = g.width(p1) - g.width(p2);
    let x1 = state.x(p1);
    let x2 = state.x(p2);
    state.positions[p2] = x1;
    state.positions[p1] = x2 - width_decrease;
    state.positions[relationship] -= width_decrease;
    tracing::trace!(p1 = %p1, p2 = %p2, rel = %relationship, "swapped partners");
    true
}

/// Before adding a relationship to `person`: if `person` and its only partner are adjacent and the
/// children's own partners sit on the side `person` faces, swap the couple so the free side faces
/// out.
pub fn swap_partner_to_bring_to_side_if_possible(
    g: &PedigreeGraph,
    state: &mut LayoutState,
    person: VertexId,
) {
    let rank = state.rank_of(person);
    let order = state.order.position_of(person);
    let rank_len = state.order.rank_len(rank);
    if order == 0 || order + 1 == rank_len {
        return;
    }

    let [relationship] = g.out_edges(person) else {
        return;
    };
    let relationship = *relationship;
    let Some(&partner) = g.in_edges(relationship).iter().find(|&&p| p != person) else {
        return;
    };
    if g.out_edges(partner).len() != 1 || state.rank_of(partner) != rank {
        return;
    }

    let partner_order = state.order.position_of(partner);
    if partner_order + 2 != order && order + 2 != partner_order {
        return;
    }
    if !g.in_edges(person).is_empty() && !g.in_edges(partner).is_empty() {
        return;
    }

    let Some(children) = analyze_children(g, state, relationship) else {
        return;
    };
    let to_the_left = order < partner_order;

    let swap = (to_the_left
        && children.left_most_has_left_partner
        && !children.right_most_has_right_partner)
        || (!to_the_left
            && children.right_most_has_right_partner
            && !children.left_most_has_left_partner)
        || (order == 2 && children.right_most_has_right_partner)
        || (order + 3 == rank_len && children.left_most_has_left_partner);
    if swap {
        swap_partners(g, state, person, partner, relationship);
    }
}

/// Slides the trio `person-rel-partner` to `new_order` past the partner's siblings:
///
/// ```text
/// [sibling @ new_order] .. [sibling] [person]-[rel]-[partner]
/// becomes
/// [person @ new_order]-[rel]-[partner] [sibling] .. [sibling]
/// ```
///
/// When moving left `partner` must be the rightmost of the three, when moving right the leftmost.
pub fn move_sibling_plus_partner_to_order(
    state: &mut LayoutState,
    person: VertexId,
    partner: VertexId,
    partnership: VertexId,
    new_order: usize,
) {
    let rank = state.rank_of(partner);
    let partner_order = state.order.position_of(partner);
    let person_order = state.order.position_of(person);
    let rel_order = state.order.position_of(partnership);
    if new_order == person_order {
        return;
    }

    let move_right = new_order > person_order;
    let first_sibling = if move_right {
        state.order.vertex_at(rank, person_order + 1)
    } else {
        person_order
            .checked_sub(1)
            .and_then(|o| state.order.vertex_at(rank, o))
    };
    let (Some(target), Some(first_sibling)) = (state.order.vertex_at(rank, new_order), first_sibling)
    else {
        return;
    };

    let move_distance = state.x(target) - state.x(person);
    let move_other_dist = state.x(first_sibling) - state.x(partner);
    let amount = new_order as isize - person_order as isize;

    state.order.move_vertex(rank, person_order, amount);
    state.order.move_vertex(rank, rel_order, amount);
    state.order.move_vertex(rank, partner_order, amount);

    for v in [person, partner, partnership] {
        state.positions[v] += move_distance;
    }

    let (min_moved, max_moved) = if move_right {
        (partner_order, new_order.saturating_sub(3))
    } else {
        (new_order + 3, partner_order)
    };
    for o in min_moved..=max_moved {
        if let Some(v) = state.order.vertex_at(rank, o) {
            state.positions[v] -= move_other_dist;
        }
    }
}

/// Before adding parents to `person`: bring `person` and its only partner to the outer edge of
/// the partner's sibling group so the new parents can go straight above.
///
/// Does nothing when both parents of the partner have other relationships, or when any child of
/// the couple already has a partner.
pub fn swap_before_parents_to_bring_to_side_if_possible(
    g: &PedigreeGraph,
    state: &mut LayoutState,
    person: VertexId,
) {
    let [relationship] = g.out_edges(person) else {
        return;
    };
    let relationship = *relationship;
    let Some(&partner) = g.in_edges(relationship).iter().find(|&&p| p != person) else {
        return;
    };
    let Some(&partner_childhub) = g.in_edges(partner).first() else {
        return;
    };
    if state.rank_of(person) != state.rank_of(partner) || g.out_edges(partner).len() > 1 {
        return;
    }

    let order = state.order.position_of(person);
    let partner_order = state.order.position_of(partner);
    if partner_order + 2 != order && order + 2 != partner_order {
        return;
    }
    let to_the_left = order < partner_order;

    let Some(siblings) = analyze_children(g, state, partner_childhub) else {
        return;
    };
    if siblings.ordered_children.len() > 1 {
        if siblings.left_most_child_id == partner {
            if !to_the_left {
                swap_partners(g, state, person, partner, relationship);
            }
            return;
        }
        if siblings.right_most_child_id == partner {
            if to_the_left {
                swap_partners(g, state, person, partner, relationship);
            }
            return;
        }
    }

    // The partner is surrounded by siblings (or is an only child).
    let Some(&grand_rel) = g.in_edges(partner_childhub).first() else {
        return;
    };
    let [a, b] = g.in_edges(grand_rel) else {
        return;
    };
    let (left_parent, right_parent) = if state.order.position_of(*a) > state.order.position_of(*b)
    {
        (*b, *a)
    } else {
        (*a, *b)
    };
    let num_left_partners = g.out_edges(left_parent).len();
    let num_right_partners = g.out_edges(right_parent).len();
    if num_left_partners > 1 && num_right_partners > 1 {
        return;
    }

    if siblings.ordered_children.len() == 1 {
        if num_left_partners == 1 && num_right_partners == 1 {
            return;
        }
        if num_left_partners == 1 && !to_the_left {
            swap_partners(g, state, person, partner, relationship);
        }
        if num_right_partners == 1 && to_the_left {
            swap_partners(g, state, person, partner, relationship);
        }
        return;
    }

    if analyze_children(g, state, relationship).is_some_and(|c| c.num_with_partners > 0) {
        return;
    }

    if num_right_partners == 1 && !siblings.right_most_has_right_partner {
        for &sibling in siblings.ordered_children.iter().rev() {
            if sibling == partner {
                if to_the_left {
                    swap_partners(g, state, person, partner, relationship);
                }
                move_sibling_plus_partner_to_order(
                    state,
                    person,
                    partner,
                    relationship,
                    siblings.right_most_child_order,
                );
                return;
            }
            if siblings.with_partner.contains(&sibling) {
                break;
            }
        }
    }
    if num_left_partners == 1 && !siblings.left_most_has_left_partner {
        for &sibling in &siblings.ordered_children {
            if sibling == partner {
                if !to_the_left {
                    swap_partners(g, state, person, partner, relationship);
                }
                move_sibling_plus_partner_to_order(
                    state,
                    person,
                    partner,
                    relationship,
                    siblings.left_most_child_order,
                );
                return;
            }
            if siblings.with_partner.contains(&sibling) {
                break;
            }
        }
    }
}
