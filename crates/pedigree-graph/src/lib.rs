#![forbid(unsafe_code)]

//! Pedigree graph store used by `pedigree-layout`.
//!
//! A pedigree is a directed graph over three vertex kinds: persons, relationships (a partnership
//! between exactly two persons) and childhubs (the connector hanging below a relationship that all
//! of its children attach to). Edges always point "down the generations":
//! `person -> relationship -> childhub -> person`.

pub mod error;
mod graph;

pub use error::{Error, Result};
pub use graph::{
    Gender, GraphOptions, PedigreeGraph, Properties, SerializedEdge, SerializedVertex, VertexId,
    VertexKind, VertexVec, alg,
};
