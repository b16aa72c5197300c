use pedigree_layout::graph::{
    GraphOptions, PedigreeGraph, Properties, VertexId, VertexKind, VertexVec,
};
use pedigree_layout::relayout::{assign_ranks, compact_ranks, cross_count, order, relayout};
use pedigree_layout::{LayoutOptions, Outcome, XCoord};

fn add(g: &mut PedigreeGraph, kind: VertexKind, in_edges: &[VertexId]) -> VertexId {
    g.insert_vertex("", kind, Properties::new(), None, in_edges, &[])
        .unwrap()
}

fn couple(g: &mut PedigreeGraph, a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    let rel = add(g, VertexKind::Relationship, &[a, b]);
    let hub = add(g, VertexKind::Childhub, &[rel]);
    (rel, hub)
}

#[test]
fn assign_ranks_places_generations_on_even_ranks() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    let b = add(&mut g, VertexKind::Person, &[]);
    let (rel, hub) = couple(&mut g, a, b);
    let child = add(&mut g, VertexKind::Person, &[hub]);
    let spouse = add(&mut g, VertexKind::Person, &[]);
    let (rel2, hub2) = couple(&mut g, child, spouse);
    let grandchild = add(&mut g, VertexKind::Person, &[hub2]);

    let (ranks, outcome) = assign_ranks(&g);
    assert!(outcome.is_converged());
    assert_eq!((ranks[a], ranks[b], ranks[rel]), (0, 0, 0));
    assert_eq!(ranks[hub], 1);
    assert_eq!((ranks[child], ranks[spouse], ranks[rel2]), (2, 2, 2));
    assert_eq!(ranks[hub2], 3);
    assert_eq!(ranks[grandchild], 4);
}

#[test]
fn free_couple_is_pulled_down_to_its_child() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let g1 = add(&mut g, VertexKind::Person, &[]);
    let g2 = add(&mut g, VertexKind::Person, &[]);
    let (_, gh) = couple(&mut g, g1, g2);
    let m1 = add(&mut g, VertexKind::Person, &[gh]);
    let n = add(&mut g, VertexKind::Person, &[]);
    let (_, h1) = couple(&mut g, m1, n);
    let m2 = add(&mut g, VertexKind::Person, &[h1]);
    let x = add(&mut g, VertexKind::Person, &[]);
    let y = add(&mut g, VertexKind::Person, &[]);
    let (rxy, hxy) = couple(&mut g, x, y);
    let f = add(&mut g, VertexKind::Person, &[hxy]);
    let (_, h2) = couple(&mut g, m2, f);
    let k = add(&mut g, VertexKind::Person, &[h2]);

    let (mut ranks, outcome) = assign_ranks(&g);
    assert!(outcome.is_converged());
    assert_eq!(ranks[f], 4);
    assert_eq!(ranks[x], 0);
    assert_eq!(ranks[k], 6);

    let outcome = compact_ranks(&g, &mut ranks);
    assert!(outcome.is_converged());
    assert_eq!((ranks[x], ranks[y], ranks[rxy]), (2, 2, 2));
    assert_eq!(ranks[hxy], 3);
    // couples with parents stay where they are
    assert_eq!(ranks[g1], 0);
    assert_eq!(ranks[n], 2);
}

#[test]
fn cross_count_counts_crossing_child_edges() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a1 = add(&mut g, VertexKind::Person, &[]);
    let b1 = add(&mut g, VertexKind::Person, &[]);
    let (r1, h1) = couple(&mut g, a1, b1);
    let a2 = add(&mut g, VertexKind::Person, &[]);
    let b2 = add(&mut g, VertexKind::Person, &[]);
    let (r2, h2) = couple(&mut g, a2, b2);
    let (ranks, _) = assign_ranks(&g);

    let top = vec![a1, r1, b1, a2, r2, b2];
    assert_eq!(cross_count(&g, &ranks, &[top.clone(), vec![h2, h1]]), 1);
    assert_eq!(cross_count(&g, &ranks, &[top.clone(), vec![h1, h2]]), 0);
    assert_eq!(cross_count(&g, &ranks, &[]), 0);

    let ordered = order(&g, &ranks, &LayoutOptions::default());
    assert_eq!(cross_count(&g, &ranks, ordered.ranks()), 0);
}

#[test]
fn ordering_keeps_couples_contiguous() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    let b = add(&mut g, VertexKind::Person, &[]);
    let (_, hub) = couple(&mut g, a, b);
    let c1 = add(&mut g, VertexKind::Person, &[hub]);
    let c2 = add(&mut g, VertexKind::Person, &[hub]);
    let s1 = add(&mut g, VertexKind::Person, &[]);
    let s2 = add(&mut g, VertexKind::Person, &[]);
    let (r1, _) = couple(&mut g, c1, s1);
    let (r2, _) = couple(&mut g, c2, s2);

    let (ranks, _) = assign_ranks(&g);
    let ordered = order(&g, &ranks, &LayoutOptions::default());
    let row = ordered.rank(2);
    assert_eq!(row.len(), 6);
    for (p, rel, q) in [(c1, r1, s1), (c2, r2, s2)] {
        let (op, orel, oq) = (
            ordered.position_of(p),
            ordered.position_of(rel),
            ordered.position_of(q),
        );
        assert_eq!(orel.abs_diff(op), 1, "{p} should touch {rel}");
        assert_eq!(orel.abs_diff(oq), 1, "{q} should touch {rel}");
    }
}

#[test]
fn relayout_centers_an_only_child() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    let b = add(&mut g, VertexKind::Person, &[]);
    let (rel, hub) = couple(&mut g, a, b);
    let child = add(&mut g, VertexKind::Person, &[hub]);

    let state = relayout(&g, &LayoutOptions::default()).unwrap();
    state.check_consistency(&g).unwrap();
    assert_eq!(state.order.rank(0), &[a, rel, b]);
    assert_eq!(state.x(a), 5.0);
    assert_eq!(state.x(rel), 17.0);
    assert_eq!(state.x(b), 29.0);
    assert_eq!(state.x(hub), 17.0);
    assert_eq!(state.x(child), 17.0);
}

#[test]
fn relayout_of_a_larger_pedigree_is_consistent_and_separated() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    let b = add(&mut g, VertexKind::Person, &[]);
    let (_, hub) = couple(&mut g, a, b);
    let kids: Vec<VertexId> = (0..3)
        .map(|_| add(&mut g, VertexKind::Person, &[hub]))
        .collect();
    for &kid in &kids {
        let spouse = add(&mut g, VertexKind::Person, &[]);
        let (_, h) = couple(&mut g, kid, spouse);
        add(&mut g, VertexKind::Person, &[h]);
        add(&mut g, VertexKind::Person, &[h]);
    }

    let options = LayoutOptions::default();
    let state = relayout(&g, &options).unwrap();
    state.check_consistency(&g).unwrap();

    let ranks: &VertexVec<usize> = &state.ranks;
    for v in g.vertex_ids() {
        let even = ranks[v] % 2 == 0;
        assert_eq!(even, !g.is_childhub(v), "vertex {v} on rank {}", ranks[v]);
    }

    let mut positions = state.positions.clone();
    XCoord::new(&g, &state.ranks, &state.order, &mut positions, &options)
        .validate()
        .unwrap();
    let min_left = g
        .vertex_ids()
        .map(|v| state.x(v) - g.half_width(v))
        .fold(f64::INFINITY, f64::min);
    assert!(min_left.abs() < 1e-9, "leftmost edge at {min_left}");
}

#[test]
fn spouse_drawn_as_child_of_the_other_marriage_cannot_be_ranked() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let p = add(&mut g, VertexKind::Person, &[]);
    let first_spouse = add(&mut g, VertexKind::Person, &[]);
    let (_, hub) = couple(&mut g, p, first_spouse);
    let second_spouse = add(&mut g, VertexKind::Person, &[hub]);
    couple(&mut g, p, second_spouse);

    let (_, outcome) = assign_ranks(&g);
    assert!(matches!(outcome, Outcome::IterationLimitExceeded { .. }));
    assert!(relayout(&g, &LayoutOptions::default()).is_err());
}

#[test]
fn ranking_ceiling_is_reported() {
    assert_eq!(
        Outcome::IterationLimitExceeded { limit: 3 }
            .into_result("ranking")
            .unwrap_err()
            .to_string(),
        "ranking did not converge within 3 iterations"
    );
}
