use pedigree_graph::{Error, GraphOptions, PedigreeGraph, Properties, VertexId, VertexKind};

fn add(g: &mut PedigreeGraph, kind: VertexKind, ins: &[VertexId]) -> VertexId {
    g.insert_vertex("", kind, Properties::new(), None, ins, &[])
        .unwrap()
}

#[test]
fn validate_accepts_an_empty_graph() {
    let g = PedigreeGraph::new(GraphOptions::default());
    assert_eq!(g.validate(), Ok(()));
}

#[test]
fn validate_accepts_a_couple_without_children() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    let b = add(&mut g, VertexKind::Person, &[]);
    let rel = add(&mut g, VertexKind::Relationship, &[a, b]);
    add(&mut g, VertexKind::Childhub, &[rel]);
    assert_eq!(g.validate(), Ok(()));
}

#[test]
fn validate_accepts_disconnected_persons() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    add(&mut g, VertexKind::Person, &[]);
    add(&mut g, VertexKind::Person, &[]);
    assert_eq!(g.validate(), Ok(()));
}

#[test]
fn validate_rejects_relationship_with_one_partner() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    let rel = add(&mut g, VertexKind::Relationship, &[a]);
    assert!(matches!(
        g.validate(),
        Err(Error::InEdgeCount { vertex, .. }) if vertex == rel
    ));
}

#[test]
fn validate_rejects_person_with_two_parents_sets() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    let b = add(&mut g, VertexKind::Person, &[]);
    let r1 = add(&mut g, VertexKind::Relationship, &[a, b]);
    let h1 = add(&mut g, VertexKind::Childhub, &[r1]);
    let c = add(&mut g, VertexKind::Person, &[]);
    let d = add(&mut g, VertexKind::Person, &[]);
    let r2 = add(&mut g, VertexKind::Relationship, &[c, d]);
    let h2 = add(&mut g, VertexKind::Childhub, &[r2]);
    let child = add(&mut g, VertexKind::Person, &[h1, h2]);
    assert!(matches!(
        g.validate(),
        Err(Error::InEdgeCount { vertex, .. }) if vertex == child
    ));
}

#[test]
fn validate_rejects_person_to_person_edges() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    add(&mut g, VertexKind::Person, &[a]);
    assert!(matches!(g.validate(), Err(Error::EdgeKinds { .. })));
}

#[test]
fn validate_rejects_childhub_without_relationship() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let hub = add(&mut g, VertexKind::Childhub, &[]);
    add(&mut g, VertexKind::Person, &[hub]);
    assert!(matches!(
        g.validate(),
        Err(Error::InEdgeCount { vertex, .. }) if vertex == hub
    ));
}

#[test]
fn validate_rejects_cycles() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let a = add(&mut g, VertexKind::Person, &[]);
    let b = add(&mut g, VertexKind::Person, &[]);
    let rel = add(&mut g, VertexKind::Relationship, &[a, b]);
    let hub = add(&mut g, VertexKind::Childhub, &[rel]);
    g.add_edge(hub, a).unwrap();
    assert!(matches!(g.validate(), Err(Error::Cycle(_))));
}
