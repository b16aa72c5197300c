//! Vertex kinds and internal storage entries for [`PedigreeGraph`](super::PedigreeGraph).

use super::VertexId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque per-vertex payload. Only `gender` is interpreted by the graph store.
pub type Properties = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    Person,
    Relationship,
    Childhub,
}

impl VertexKind {
    pub fn is_structural(self) -> bool {
        !matches!(self, VertexKind::Person)
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VertexKind::Person => "person",
            VertexKind::Relationship => "relationship",
            VertexKind::Childhub => "childhub",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Gender {
    pub fn opposite(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
            Gender::Unknown => Gender::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "U",
        }
    }

    /// Lenient parse: accepts `M`/`male`, `F`/`female`/`fem`, anything else is unknown.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Gender::Male,
            "f" | "fem" | "female" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct VertexEntry {
    pub(in crate::graph) label: String,
    pub(in crate::graph) kind: VertexKind,
    pub(in crate::graph) properties: Properties,
    pub(in crate::graph) width: f64,
    pub(in crate::graph) in_edges: Vec<VertexId>,
    pub(in crate::graph) out_edges: Vec<VertexId>,
}
