use pedigree_layout::graph::{
    GraphOptions, PedigreeGraph, Properties, VertexId, VertexKind, VertexVec,
};
use pedigree_layout::vertical::{compute_rank_y, node_y, rel_line_y};
use pedigree_layout::{LayoutOptions, Order, OutEdgeLevel, VerticalLevels};

fn add(g: &mut PedigreeGraph, kind: VertexKind, in_edges: &[VertexId]) -> VertexId {
    g.insert_vertex("", kind, Properties::new(), None, in_edges, &[])
        .unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

struct Overlapping {
    g: PedigreeGraph,
    order: Order,
    ranks: VertexVec<usize>,
    positions: VertexVec<f64>,
    h1: VertexId,
    h2: VertexId,
}

/// Two child lines on rank 1 whose horizontal extents overlap:
/// `h1` spans `[10, 50]`, `h2` spans `[30, 70]`.
fn overlapping_child_lines() -> Overlapping {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a1 = add(&mut g, VertexKind::Person, &[]);
    let b1 = add(&mut g, VertexKind::Person, &[]);
    let r1 = add(&mut g, VertexKind::Relationship, &[a1, b1]);
    let h1 = add(&mut g, VertexKind::Childhub, &[r1]);
    let c1 = add(&mut g, VertexKind::Person, &[h1]);
    let c1b = add(&mut g, VertexKind::Person, &[h1]);
    let a2 = add(&mut g, VertexKind::Person, &[]);
    let b2 = add(&mut g, VertexKind::Person, &[]);
    let r2 = add(&mut g, VertexKind::Relationship, &[a2, b2]);
    let h2 = add(&mut g, VertexKind::Childhub, &[r2]);
    let c2 = add(&mut g, VertexKind::Person, &[h2]);

    let order = Order::from_ranks(vec![
        vec![a1, r1, b1, a2, r2, b2],
        vec![h1, h2],
        vec![c1, c1b, c2],
    ]);
    let ranks: VertexVec<usize> = vec![0, 0, 0, 1, 2, 2, 0, 0, 0, 1, 2].into();
    let positions: VertexVec<f64> =
        vec![-2.0, 22.0, 10.0, 10.0, 10.0, 50.0, 18.0, 42.0, 30.0, 30.0, 70.0].into();
    Overlapping {
        g,
        order,
        ranks,
        positions,
        h1,
        h2,
    }
}

#[test]
fn overlapping_child_lines_get_different_lanes() {
    let o = overlapping_child_lines();
    let levels = VerticalLevels::compute(&o.g, &o.order, &o.positions);
    assert_eq!(levels.child_edge_level(o.h1), 1);
    assert_eq!(levels.child_edge_level(o.h2), 2);
    assert_eq!(levels.rank_levels(0), 1);
    assert_eq!(levels.rank_levels(1), 2);
}

#[test]
fn straight_child_line_uses_lane_zero() {
    let mut o = overlapping_child_lines();
    // h2 directly above its only child and below its relationship
    o.positions[VertexId::new(10)] = 30.0;
    let levels = VerticalLevels::compute(&o.g, &o.order, &o.positions);
    assert_eq!(levels.child_edge_level(o.h2), 0);
    assert_eq!(levels.rank_levels(1), 1);
}

#[test]
fn extra_lanes_push_lower_ranks_down() {
    let o = overlapping_child_lines();
    let options = LayoutOptions::default();
    let levels = VerticalLevels::compute(&o.g, &o.order, &o.positions);
    let rank_y = compute_rank_y(&o.g, &o.order, &levels, &options, &o.ranks, None);

    assert_eq!(rank_y.len(), 3);
    assert_close(rank_y[0], 0.0);
    assert_close(rank_y[1], 21.6);
    assert_close(rank_y[2], 21.6 + 14.0 + 4.0);
}

#[test]
fn anchor_keeps_vertex_zero_at_its_old_height() {
    let o = overlapping_child_lines();
    let options = LayoutOptions::default();
    let levels = VerticalLevels::compute(&o.g, &o.order, &o.positions);
    let old_rank_y = vec![100.0];
    let rank_y = compute_rank_y(
        &o.g,
        &o.order,
        &levels,
        &options,
        &o.ranks,
        Some((0, old_rank_y.as_slice())),
    );
    assert_close(rank_y[0], 100.0);
    assert_close(rank_y[1], 121.6);
}

#[test]
fn childhub_y_follows_its_lane() {
    let options = LayoutOptions::default();
    let rank_y = [0.0, 21.6];
    assert_close(node_y(&rank_y, 1, 0, &options), 21.6);
    assert_close(node_y(&rank_y, 1, 1, &options), 21.6);
    assert_close(node_y(&rank_y, 1, 3, &options), 29.6);
    assert_close(rel_line_y(&rank_y, 0, 0, &options), 0.0);
    assert_close(rel_line_y(&rank_y, 0, 2, &options), -15.0);
}

#[test]
fn relationship_behind_a_person_is_routed_above_the_rank() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    let b = add(&mut g, VertexKind::Person, &[]);
    let rel = add(&mut g, VertexKind::Relationship, &[a, b]);
    let order = Order::from_ranks(vec![vec![a, b, rel]]);
    let positions: VertexVec<f64> = vec![5.0, 25.0, 37.0].into();

    let levels = VerticalLevels::compute(&g, &order, &positions);
    assert_eq!(
        levels.out_edge_level(a, rel),
        Some(OutEdgeLevel {
            attach_level: 0,
            vertical_level: 2,
            num_attach_levels: 1,
        })
    );
    assert_eq!(
        levels.out_edge_level(b, rel),
        Some(OutEdgeLevel {
            attach_level: 0,
            vertical_level: 0,
            num_attach_levels: 1,
        })
    );
}
