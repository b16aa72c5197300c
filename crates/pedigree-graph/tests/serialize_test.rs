use pedigree_graph::{
    GraphOptions, PedigreeGraph, Properties, SerializedVertex, VertexId, VertexKind,
};

fn parse(json: &str) -> Vec<SerializedVertex> {
    serde_json::from_str(json).unwrap()
}

#[test]
fn serialize_round_trips_structure_and_properties() {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let mut prop = Properties::new();
    prop.insert("gender".to_string(), "F".into());
    prop.insert("fName".to_string(), "Ada".into());
    let a = g
        .insert_vertex("a", VertexKind::Person, prop, Some(12.0), &[], &[])
        .unwrap();
    let b = g
        .insert_vertex("b", VertexKind::Person, Properties::new(), None, &[], &[])
        .unwrap();
    let rel = g
        .insert_vertex("", VertexKind::Relationship, Properties::new(), None, &[a, b], &[])
        .unwrap();
    g.insert_vertex("", VertexKind::Childhub, Properties::new(), None, &[rel], &[])
        .unwrap();

    let data = g.serialize();
    let json = serde_json::to_string(&data).unwrap();
    let restored = PedigreeGraph::from_serialized(&parse(&json), GraphOptions::default()).unwrap();

    assert_eq!(restored.serialize(), data);
    assert_eq!(restored.width(a), 12.0);
    assert_eq!(restored.label(a), Some("a"));
    assert_eq!(
        restored.properties(a).and_then(|p| p.get("fName")),
        Some(&serde_json::Value::from("Ada"))
    );
}

#[test]
fn serialize_marks_relationships_as_rel_and_hub() {
    let json = r#"[
        {"id": 0, "outedges": [{"to": 2}]},
        {"id": 1, "outedges": [{"to": 2}]},
        {"id": 2, "rel": true, "hub": true, "outedges": [{"to": 3}]},
        {"id": 3, "chhub": true}
    ]"#;
    let g = PedigreeGraph::from_serialized(&parse(json), GraphOptions::default()).unwrap();
    let out = serde_json::to_value(g.serialize()).unwrap();
    assert_eq!(out[2]["rel"], true);
    assert_eq!(out[2]["hub"], true);
    assert_eq!(out[3]["chhub"], true);
    assert!(out[3].get("rel").is_none());
}

#[test]
fn from_serialized_rejects_shuffled_ids() {
    let json = r#"[{"id": 1}, {"id": 0}]"#;
    assert!(PedigreeGraph::from_serialized(&parse(json), GraphOptions::default()).is_err());
}

#[test]
fn from_user_graph_creates_missing_childhubs() {
    let json = r#"[
        {"name": "dad", "gender": "male", "outedges": [{"to": 2}]},
        {"name": "mom", "gender": "female", "outedges": [{"to": 2}]},
        {"name": "m", "relationship": true, "outedges": [{"to": 3}]},
        {"name": "kid"}
    ]"#;
    let g = PedigreeGraph::from_user_graph(&parse(json), GraphOptions::default()).unwrap();

    assert_eq!(g.num_vertices(), 5);
    let rel = VertexId::new(2);
    let hub = VertexId::new(3);
    let kid = VertexId::new(4);
    assert!(g.is_childhub(hub));
    assert_eq!(g.relationship_childhub(rel), Some(hub));
    assert_eq!(g.in_edges(kid), &[hub]);
    assert_eq!(g.label(hub), Some("chhub_m"));
    assert_eq!(g.gender(VertexId::new(0)), pedigree_graph::Gender::Male);
}
