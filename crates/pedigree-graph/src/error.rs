use crate::{VertexId, VertexKind};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unknown vertex id: {0}")]
    UnknownVertex(VertexId),
    #[error("edge {from} -> {to} references a missing endpoint")]
    MissingEndpoint { from: VertexId, to: VertexId },
    #[error("duplicate edge {from} -> {to}")]
    DuplicateEdge { from: VertexId, to: VertexId },
    #[error("{kind} {vertex} has {count} in-edges, expected {expected}")]
    InEdgeCount {
        vertex: VertexId,
        kind: VertexKind,
        count: usize,
        expected: &'static str,
    },
    #[error("{kind} {vertex} has {count} out-edges, expected {expected}")]
    OutEdgeCount {
        vertex: VertexId,
        kind: VertexKind,
        count: usize,
        expected: &'static str,
    },
    #[error("edge {from} ({from_kind}) -> {to} ({to_kind}) connects incompatible vertex kinds")]
    EdgeKinds {
        from: VertexId,
        from_kind: VertexKind,
        to: VertexId,
        to_kind: VertexKind,
    },
    #[error("relationship {0} connects a person to itself")]
    SelfPartnership(VertexId),
    #[error("graph contains a cycle through vertex {0}")]
    Cycle(VertexId),
    #[error("serialized vertex at position {position} has id {id}")]
    SerializedIdMismatch { position: usize, id: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
