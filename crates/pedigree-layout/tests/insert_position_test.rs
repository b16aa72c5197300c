use pedigree_layout::graph::{
    GraphOptions, PedigreeGraph, Properties, VertexId, VertexKind, VertexVec,
};
use pedigree_layout::heuristics::{
    edge_crossings_by_future_edge, find_best_insert_position, find_best_relationship_position,
};
use pedigree_layout::{LayoutOptions, LayoutState, Order, XCoord};

fn add(g: &mut PedigreeGraph, kind: VertexKind, in_edges: &[VertexId]) -> VertexId {
    g.insert_vertex("", kind, Properties::new(), None, in_edges, &[])
        .unwrap()
}

struct Families {
    g: PedigreeGraph,
    state: LayoutState,
    a1: VertexId,
    b1: VertexId,
    r1: VertexId,
    h1: VertexId,
    h2: VertexId,
}

/// Two families side by side, one child each:
///
/// ```text
/// rank 0: a1 r1 b1 a2 r2 b2
/// rank 1:    h1       h2
/// rank 2:    k1       k2
/// ```
fn two_families() -> Families {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a1 = add(&mut g, VertexKind::Person, &[]);
    let b1 = add(&mut g, VertexKind::Person, &[]);
    let a2 = add(&mut g, VertexKind::Person, &[]);
    let b2 = add(&mut g, VertexKind::Person, &[]);
    let r1 = add(&mut g, VertexKind::Relationship, &[a1, b1]);
    let r2 = add(&mut g, VertexKind::Relationship, &[a2, b2]);
    let h1 = add(&mut g, VertexKind::Childhub, &[r1]);
    let h2 = add(&mut g, VertexKind::Childhub, &[r2]);
    let k1 = add(&mut g, VertexKind::Person, &[h1]);
    let k2 = add(&mut g, VertexKind::Person, &[h2]);

    let ranks: VertexVec<usize> = vec![0, 0, 0, 0, 0, 0, 1, 1, 2, 2].into();
    let order = Order::from_ranks(vec![vec![a1, r1, b1, a2, r2, b2], vec![h1, h2], vec![k1, k2]]);
    let options = LayoutOptions::default();
    let positions = XCoord::packed(&g, &order, &options);
    let state = LayoutState {
        ranks,
        order,
        positions,
        ..Default::default()
    };
    Families {
        g,
        state,
        a1,
        b1,
        r1,
        h1,
        h2,
    }
}

#[test]
fn empty_rank_takes_slot_zero() {
    let f = two_families();
    assert_eq!(find_best_insert_position(&f.g, &f.state, 3, f.h1, false), 0);
}

#[test]
fn new_child_goes_right_after_its_siblings() {
    let f = two_families();
    assert_eq!(find_best_insert_position(&f.g, &f.state, 2, f.h1, false), 1);
    assert_eq!(find_best_insert_position(&f.g, &f.state, 2, f.h2, false), 2);
}

#[test]
fn crossing_a_foreign_child_edge_is_never_chosen() {
    let f = two_families();
    // slot 2 on rank 2 sits right of k2, so an edge up to h1 would cross h2 -> k2
    let crossings = edge_crossings_by_future_edge(&f.g, &f.state, 2, 1.5, 1, 0.0, true);
    assert_eq!(crossings, f64::INFINITY);
    let crossings = edge_crossings_by_future_edge(&f.g, &f.state, 2, 1.5, 1, 0.0, false);
    assert_eq!(crossings, 1.0);
    let crossings = edge_crossings_by_future_edge(&f.g, &f.state, 2, 0.5, 1, 0.0, true);
    assert_eq!(crossings, 0.0);
}

#[test]
fn splitting_a_couple_costs_a_little() {
    let f = two_families();
    // a rank-0 slot between a1 and r1 splits one person -> relationship line
    let crossings = edge_crossings_by_future_edge(&f.g, &f.state, 0, 0.5, 1, 0.0, false);
    assert!((crossings - 0.1).abs() < 1e-9);
}

#[test]
fn same_rank_edges_count_as_same_rank() {
    let f = two_families();
    assert_eq!(
        edge_crossings_by_future_edge(&f.g, &f.state, 0, 0.5, 0, 3.0, true),
        0.0
    );
}

#[test]
fn relationship_goes_to_the_free_side_of_a_person() {
    let f = two_families();
    // a1 already has r1 on its right
    assert_eq!(find_best_relationship_position(&f.g, &f.state, 0, f.a1, false), 0);
    // b1 has r1 on its left
    assert_eq!(find_best_relationship_position(&f.g, &f.state, 0, f.b1, false), 3);
    assert_eq!(find_best_relationship_position(&f.g, &f.state, 0, f.b1, true), 3);
    assert_eq!(find_best_insert_position(&f.g, &f.state, 0, f.b1, false), 3);
}

#[test]
fn relationship_position_breaks_ties_by_preference() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let p0 = add(&mut g, VertexKind::Person, &[]);
    let p1 = add(&mut g, VertexKind::Person, &[]);
    let state = LayoutState {
        ranks: vec![0, 0].into(),
        order: Order::from_ranks(vec![vec![p0, p1]]),
        positions: vec![5.0, 25.0].into(),
        ..Default::default()
    };
    assert_eq!(find_best_relationship_position(&g, &state, 0, p1, false), 2);
    assert_eq!(find_best_relationship_position(&g, &state, 0, p1, true), 1);
    assert_eq!(find_best_relationship_position(&g, &state, 0, p0, true), 0);
}

#[test]
fn structural_anchor_on_the_same_rank_inserts_right_after_it() {
    let f = two_families();
    assert_eq!(find_best_insert_position(&f.g, &f.state, 0, f.r1, false), 2);
}
