use pedigree_layout::graph::{
    GraphOptions, PedigreeGraph, Properties, VertexId, VertexKind, VertexVec,
};
use pedigree_layout::{Error, Invariant, LayoutOptions, Order, XCoord};

/// `[a]-[rel]-[b]` on rank 0.
fn couple() -> (PedigreeGraph, VertexVec<usize>, Order, [VertexId; 3]) {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = g
        .insert_vertex("", VertexKind::Person, Properties::new(), None, &[], &[])
        .unwrap();
    let b = g
        .insert_vertex("", VertexKind::Person, Properties::new(), None, &[], &[])
        .unwrap();
    let rel = g
        .insert_vertex("", VertexKind::Relationship, Properties::new(), None, &[a, b], &[])
        .unwrap();
    let ranks: VertexVec<usize> = vec![0, 0, 0].into();
    let order = Order::from_ranks(vec![vec![a, rel, b]]);
    (g, ranks, order, [a, rel, b])
}

#[test]
fn packed_places_neighbours_at_minimum_separation() {
    let (g, _, order, [a, rel, b]) = couple();
    let options = LayoutOptions::default();
    let xs = XCoord::packed(&g, &order, &options);
    assert_eq!(xs[a], 5.0);
    assert_eq!(xs[rel], 17.0);
    assert_eq!(xs[b], 29.0);
}

#[test]
fn separation_depends_on_vertex_kinds() {
    let (g, _, _, [a, rel, b]) = couple();
    let options = LayoutOptions::default();
    assert_eq!(pedigree_layout::xcoord::separation(&g, &options, a, b), 10.0);
    assert_eq!(pedigree_layout::xcoord::separation(&g, &options, a, rel), 6.0);
    assert_eq!(pedigree_layout::xcoord::min_separation(&g, &options, a, b), 20.0);
    assert_eq!(pedigree_layout::xcoord::min_separation(&g, &options, rel, b), 12.0);
}

#[test]
fn no_disturb_positions_are_bounded_by_neighbours() {
    let (g, ranks, order, [a, rel, b]) = couple();
    let options = LayoutOptions::default();
    let mut xs = XCoord::packed(&g, &order, &options);
    let xc = XCoord::new(&g, &ranks, &order, &mut xs, &options);

    assert_eq!(xc.left_most_no_disturb_position(a), f64::NEG_INFINITY);
    assert_eq!(xc.right_most_no_disturb_position(b), f64::INFINITY);
    assert_eq!(xc.left_most_no_disturb_position(rel), 17.0);
    assert_eq!(xc.right_most_no_disturb_position(rel), 17.0);
    assert_eq!(xc.slack_on_the_left(rel), 0.0);
    assert_eq!(xc.slack_on_the_right(rel), 0.0);
}

#[test]
fn shift_right_pushes_only_as_far_as_needed() {
    let (g, ranks, order, [a, rel, b]) = couple();
    let options = LayoutOptions::default();
    let mut xs = XCoord::packed(&g, &order, &options);
    xs[b] = 40.0;
    {
        let mut xc = XCoord::new(&g, &ranks, &order, &mut xs, &options);
        xc.shift_right_and_shift_other_if_necessary(a, 3.0);
        xc.validate().unwrap();
    }
    assert_eq!(xs[a], 8.0);
    assert_eq!(xs[rel], 20.0);
    // b had enough room already
    assert_eq!(xs[b], 40.0);
}

#[test]
fn shift_one_vertex_stops_at_neighbours() {
    let (g, ranks, order, [_, rel, b]) = couple();
    let options = LayoutOptions::default();
    let mut xs = XCoord::packed(&g, &order, &options);
    xs[b] = 35.0;
    let mut xc = XCoord::new(&g, &ranks, &order, &mut xs, &options);

    assert_eq!(xc.shift_right_one_vertex(rel, 100.0), 6.0);
    assert_eq!(xc.x(rel), 23.0);
    assert_eq!(xc.shift_left_one_vertex(rel, 2.0), 2.0);
    assert_eq!(xc.x(rel), 21.0);
    assert_eq!(xc.shift_left_one_vertex(b, 100.0), 2.0);
    assert_eq!(xc.x(b), 33.0);
}

#[test]
fn move_node_as_close_as_possible_reports_movement() {
    let (g, ranks, order, [a, rel, b]) = couple();
    let options = LayoutOptions::default();
    let mut xs = XCoord::packed(&g, &order, &options);
    let mut xc = XCoord::new(&g, &ranks, &order, &mut xs, &options);

    assert!(!xc.move_node_as_close_to_x_as_possible(rel, 0.0));
    assert!(xc.move_node_as_close_to_x_as_possible(b, 100.0));
    assert_eq!(xc.x(b), 100.0);
    assert!(xc.move_node_as_close_to_x_as_possible(a, -50.0));
    assert_eq!(xc.x(a), -50.0);
    assert!(xc.move_node_as_close_to_x_as_possible(a, 30.0));
    assert_eq!(xc.x(a), 5.0);
}

#[test]
fn normalize_moves_the_leftmost_edge_to_zero() {
    let (g, ranks, order, [a, rel, b]) = couple();
    let options = LayoutOptions::default();
    let mut xs: VertexVec<f64> = vec![-20.0, 4.0, -8.0].into();
    XCoord::new(&g, &ranks, &order, &mut xs, &options).normalize();
    assert_eq!(xs[a], 5.0);
    assert_eq!(xs[rel], 17.0);
    assert_eq!(xs[b], 29.0);
}

#[test]
fn validate_reports_the_overlapping_pair() {
    let (g, ranks, order, [a, rel, _]) = couple();
    let options = LayoutOptions::default();
    let mut xs = XCoord::packed(&g, &order, &options);
    xs[rel] = 12.0;
    let xc = XCoord::new(&g, &ranks, &order, &mut xs, &options);
    match xc.validate() {
        Err(Error::Invariant(Invariant::Overlap { left, right })) => {
            assert_eq!((left, right), (a, rel));
        }
        other => panic!("expected an overlap, got {other:?}"),
    }
}

#[test]
fn validate_tolerates_rounding_drift_but_not_real_overlap() {
    let (g, ranks, order, [_, rel, b]) = couple();
    let options = LayoutOptions::default();
    let mut xs = XCoord::packed(&g, &order, &options);

    // What averaging three positions and renormalizing can leave behind.
    xs[b] = 31.666666666666668;
    xs[rel] = 31.666666666666668 - 12.0 + 4e-15;
    assert!(xs[b] - xs[rel] < 12.0);
    XCoord::new(&g, &ranks, &order, &mut xs, &options)
        .validate()
        .unwrap();

    xs[rel] = 20.0;
    assert!(
        XCoord::new(&g, &ranks, &order, &mut xs, &options)
            .validate()
            .is_err()
    );
}
