use pedigree_graph::{VertexId, VertexKind};

/// The caller asked for something the current pedigree does not allow. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Precondition {
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),
    #[error("vertex {vertex} is a {actual}, expected {expected}")]
    WrongKind {
        vertex: VertexId,
        actual: VertexKind,
        expected: &'static str,
    },
    #[error("person {0} already has parents")]
    AlreadyHasParents(VertexId),
    #[error("child {0} already has parents")]
    ChildHasParents(VertexId),
    #[error("making {child} a child of {parent} would create a cycle")]
    WouldCreateCycle { parent: VertexId, child: VertexId },
    #[error("making {child} a child of {parent} leaves no valid generation ranking")]
    NoValidRanking { parent: VertexId, child: VertexId },
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
    #[error("invalid gender filter {0:?}")]
    InvalidGender(String),
}

/// Internal consistency was lost after a mutation. This is a defect signal, not user error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Invariant {
    #[error("graph validation failed: {0}")]
    Graph(#[from] pedigree_graph::Error),
    #[error("rank layering violated at vertex {vertex}: {reason}")]
    Layering {
        vertex: VertexId,
        reason: &'static str,
    },
    #[error("order is inconsistent: {0}")]
    OrderInconsistent(String),
    #[error("vertices {left} and {right} are closer than the minimum separation")]
    Overlap { left: VertexId, right: VertexId },
    #[error("{pass} did not converge within {limit} iterations")]
    IterationLimitExceeded { pass: &'static str, limit: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Precondition(#[from] Precondition),
    #[error(transparent)]
    Invariant(#[from] Invariant),
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Errors raised before anything was mutated, including undecodable snapshots.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::Precondition(_) | Error::Json(_))
    }

    pub fn is_invariant(&self) -> bool {
        matches!(self, Error::Invariant(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<pedigree_graph::Error> for Error {
    fn from(err: pedigree_graph::Error) -> Self {
        Error::Invariant(Invariant::Graph(err))
    }
}
