//! Graph container APIs used by `pedigree-layout`.
//!
//! Vertices live in an append-only arena indexed by [`VertexId`]. Edges are stored twice, as
//! per-vertex in- and out-lists, because every layout pass walks both directions.

use crate::error::{Error, Result};

mod entries;
mod options;
mod serialize;
mod vertex_id;

pub mod alg;

pub use entries::{Gender, Properties, VertexKind};
pub use options::GraphOptions;
pub use serialize::{SerializedEdge, SerializedVertex};
pub use vertex_id::{VertexId, VertexVec};

use entries::VertexEntry;

#[derive(Debug, Clone, Default)]
pub struct PedigreeGraph {
    options: GraphOptions,
    vertices: Vec<VertexEntry>,
}

impl PedigreeGraph {
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            vertices: Vec::new(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn max_real_vertex_id(&self) -> Option<VertexId> {
        self.vertices.len().checked_sub(1).map(VertexId::new)
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.vertices.len()
    }

    fn entry(&self, v: VertexId) -> Option<&VertexEntry> {
        self.vertices.get(v.index())
    }

    fn require(&self, v: VertexId) -> Result<()> {
        if self.contains(v) {
            Ok(())
        } else {
            Err(Error::UnknownVertex(v))
        }
    }

    /// Appends a vertex and connects it to existing vertices.
    ///
    /// `width` falls back to the configured default for the vertex kind. Persons without a
    /// `gender` property get `"U"`.
    pub fn insert_vertex(
        &mut self,
        label: impl Into<String>,
        kind: VertexKind,
        mut properties: Properties,
        width: Option<f64>,
        in_edges: &[VertexId],
        out_edges: &[VertexId],
    ) -> Result<VertexId> {
        for &u in in_edges.iter().chain(out_edges) {
            self.require(u)?;
        }

        if kind == VertexKind::Person && !properties.contains_key("gender") {
            properties.insert(
                "gender".to_string(),
                serde_json::Value::String(Gender::Unknown.as_str().to_string()),
            );
        }

        let width = width.unwrap_or(match kind {
            VertexKind::Person => self.options.default_person_width,
            _ => self.options.default_non_person_width,
        });

        let id = VertexId::new(self.vertices.len());
        self.vertices.push(VertexEntry {
            label: label.into(),
            kind,
            properties,
            width,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        });

        for &u in in_edges {
            self.add_edge(u, id)?;
        }
        for &w in out_edges {
            self.add_edge(id, w)?;
        }
        Ok(id)
    }

    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> Result<()> {
        if !self.contains(from) || !self.contains(to) {
            return Err(Error::MissingEndpoint { from, to });
        }
        if self.has_edge(from, to) {
            return Err(Error::DuplicateEdge { from, to });
        }
        self.vertices[from.index()].out_edges.push(to);
        self.vertices[to.index()].in_edges.push(from);
        Ok(())
    }

    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.out_edges(from).contains(&to)
    }

    pub fn in_edges(&self, v: VertexId) -> &[VertexId] {
        self.entry(v).map(|e| e.in_edges.as_slice()).unwrap_or(&[])
    }

    pub fn out_edges(&self, v: VertexId) -> &[VertexId] {
        self.entry(v).map(|e| e.out_edges.as_slice()).unwrap_or(&[])
    }

    pub fn kind(&self, v: VertexId) -> Option<VertexKind> {
        self.entry(v).map(|e| e.kind)
    }

    pub fn is_person(&self, v: VertexId) -> bool {
        self.kind(v) == Some(VertexKind::Person)
    }

    pub fn is_relationship(&self, v: VertexId) -> bool {
        self.kind(v) == Some(VertexKind::Relationship)
    }

    pub fn is_childhub(&self, v: VertexId) -> bool {
        self.kind(v) == Some(VertexKind::Childhub)
    }

    pub fn label(&self, v: VertexId) -> Option<&str> {
        self.entry(v).map(|e| e.label.as_str())
    }

    pub fn width(&self, v: VertexId) -> f64 {
        self.entry(v).map(|e| e.width).unwrap_or(0.0)
    }

    pub fn half_width(&self, v: VertexId) -> f64 {
        (self.width(v) / 2.0).floor()
    }

    pub fn properties(&self, v: VertexId) -> Option<&Properties> {
        self.entry(v).map(|e| &e.properties)
    }

    pub fn gender(&self, v: VertexId) -> Gender {
        self.properties(v)
            .and_then(|p| p.get("gender"))
            .and_then(|g| g.as_str())
            .map(Gender::parse)
            .unwrap_or_default()
    }

    /// The childhub hanging below relationship `v`.
    pub fn relationship_childhub(&self, v: VertexId) -> Option<VertexId> {
        if !self.is_relationship(v) {
            return None;
        }
        self.out_edges(v)
            .iter()
            .copied()
            .find(|&u| self.is_childhub(u))
    }

    /// The relationship that produced person `v`, if `v` has parents.
    pub fn producing_relationship(&self, v: VertexId) -> Option<VertexId> {
        if !self.is_person(v) {
            return None;
        }
        let childhub = *self.in_edges(v).first()?;
        self.in_edges(childhub).first().copied()
    }

    /// Parents of a person, or the partners of a relationship.
    pub fn parents(&self, v: VertexId) -> Vec<VertexId> {
        match self.kind(v) {
            Some(VertexKind::Person) => self
                .producing_relationship(v)
                .map(|rel| self.in_edges(rel).to_vec())
                .unwrap_or_default(),
            Some(VertexKind::Relationship) => self.in_edges(v).to_vec(),
            _ => Vec::new(),
        }
    }

    /// Relationships person `v` takes part in.
    pub fn relationships(&self, v: VertexId) -> &[VertexId] {
        if self.is_person(v) {
            self.out_edges(v)
        } else {
            &[]
        }
    }

    pub fn partners(&self, v: VertexId) -> Vec<VertexId> {
        let mut out = Vec::new();
        for &rel in self.relationships(v) {
            for &p in self.in_edges(rel) {
                if p != v && !out.contains(&p) {
                    out.push(p);
                }
            }
        }
        out
    }

    /// Children of a relationship (or of a childhub).
    pub fn children(&self, v: VertexId) -> &[VertexId] {
        match self.kind(v) {
            Some(VertexKind::Childhub) => self.out_edges(v),
            Some(VertexKind::Relationship) => self
                .relationship_childhub(v)
                .map(|hub| self.out_edges(hub))
                .unwrap_or(&[]),
            _ => &[],
        }
    }

    pub fn persons(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_ids().filter(|&v| self.is_person(v))
    }

    pub fn relationships_iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_ids().filter(|&v| self.is_relationship(v))
    }

    /// Checks the structural rules every pedigree satisfies.
    pub fn validate(&self) -> Result<()> {
        for v in self.vertex_ids() {
            let Some(entry) = self.entry(v) else {
                continue;
            };
            let in_edges = &entry.in_edges;
            let out_edges = &entry.out_edges;
            match entry.kind {
                VertexKind::Person => {
                    if in_edges.len() > 1 {
                        return Err(Error::InEdgeCount {
                            vertex: v,
                            kind: entry.kind,
                            count: in_edges.len(),
                            expected: "at most 1",
                        });
                    }
                    self.expect_edge_kinds(v, in_edges, VertexKind::Childhub, true)?;
                    self.expect_edge_kinds(v, out_edges, VertexKind::Relationship, false)?;
                }
                VertexKind::Relationship => {
                    if in_edges.len() != 2 {
                        return Err(Error::InEdgeCount {
                            vertex: v,
                            kind: entry.kind,
                            count: in_edges.len(),
                            expected: "exactly 2",
                        });
                    }
                    if in_edges[0] == in_edges[1] {
                        return Err(Error::SelfPartnership(v));
                    }
                    if out_edges.len() > 1 {
                        return Err(Error::OutEdgeCount {
                            vertex: v,
                            kind: entry.kind,
                            count: out_edges.len(),
                            expected: "at most 1",
                        });
                    }
                    self.expect_edge_kinds(v, in_edges, VertexKind::Person, true)?;
                    self.expect_edge_kinds(v, out_edges, VertexKind::Childhub, false)?;
                }
                VertexKind::Childhub => {
                    if in_edges.len() != 1 {
                        return Err(Error::InEdgeCount {
                            vertex: v,
                            kind: entry.kind,
                            count: in_edges.len(),
                            expected: "exactly 1",
                        });
                    }
                    self.expect_edge_kinds(v, in_edges, VertexKind::Relationship, true)?;
                    self.expect_edge_kinds(v, out_edges, VertexKind::Person, false)?;
                }
            }
        }

        if let Some(cycle) = alg::find_cycles(self).into_iter().next() {
            if let Some(&v) = cycle.first() {
                return Err(Error::Cycle(v));
            }
        }
        Ok(())
    }

    fn expect_edge_kinds(
        &self,
        v: VertexId,
        neighbours: &[VertexId],
        expected: VertexKind,
        incoming: bool,
    ) -> Result<()> {
        for &u in neighbours {
            let Some(kind) = self.kind(u) else {
                return Err(Error::UnknownVertex(u));
            };
            if kind != expected {
                let (from, to) = if incoming { (u, v) } else { (v, u) };
                return Err(Error::EdgeKinds {
                    from,
                    from_kind: self.kind(from).unwrap_or(kind),
                    to,
                    to_kind: self.kind(to).unwrap_or(kind),
                });
            }
        }
        Ok(())
    }
}
