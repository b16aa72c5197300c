//! JSON wire format for [`PedigreeGraph`].
//!
//! One object per vertex, in id order:
//! `{"id": 0, "width": 10, "prop": {...}, "outedges": [{"to": 2}]}` for persons,
//! `"rel": true, "hub": true` for relationships and `"chhub": true` for childhubs.

use super::{Gender, GraphOptions, PedigreeGraph, Properties, VertexId, VertexKind};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SerializedVertex {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, alias = "relationship", skip_serializing_if = "is_false")]
    pub rel: bool,
    #[serde(default, alias = "haschhub", skip_serializing_if = "is_false")]
    pub hub: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub chhub: bool,
    /// Shorthand accepted on input only; overrides `prop.gender`.
    #[serde(default, skip_serializing)]
    pub gender: Option<String>,
    #[serde(default, alias = "properties")]
    pub prop: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outedges: Vec<SerializedEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedEdge {
    pub to: usize,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl SerializedVertex {
    fn kind(&self) -> VertexKind {
        if self.rel {
            VertexKind::Relationship
        } else if self.chhub {
            VertexKind::Childhub
        } else {
            VertexKind::Person
        }
    }

    fn properties(&self) -> Properties {
        let mut prop = self.prop.clone();
        if let Some(raw) = &self.gender {
            prop.insert(
                "gender".to_string(),
                serde_json::Value::String(Gender::parse(raw).as_str().to_string()),
            );
        }
        prop
    }
}

impl PedigreeGraph {
    /// Serializes every vertex with explicit ids, widths and childhubs.
    pub fn serialize(&self) -> Vec<SerializedVertex> {
        self.vertex_ids()
            .filter_map(|v| {
                let entry = self.entry(v)?;
                Some(SerializedVertex {
                    id: Some(v.index()),
                    name: entry.label.clone(),
                    width: Some(entry.width),
                    rel: entry.kind == VertexKind::Relationship,
                    hub: entry.kind == VertexKind::Relationship,
                    chhub: entry.kind == VertexKind::Childhub,
                    gender: None,
                    prop: entry.properties.clone(),
                    outedges: entry
                        .out_edges
                        .iter()
                        .map(|w| SerializedEdge { to: w.index() })
                        .collect(),
                })
            })
            .collect()
    }

    /// Restores a graph written by [`PedigreeGraph::serialize`]. Ids must equal positions.
    pub fn from_serialized(input: &[SerializedVertex], options: GraphOptions) -> Result<Self> {
        let mut g = PedigreeGraph::new(options);
        for (position, data) in input.iter().enumerate() {
            if let Some(id) = data.id {
                if id != position {
                    return Err(Error::SerializedIdMismatch { position, id });
                }
            }
            g.insert_vertex(
                data.name.clone(),
                data.kind(),
                data.properties(),
                data.width,
                &[],
                &[],
            )?;
        }
        for (position, data) in input.iter().enumerate() {
            let from = VertexId::new(position);
            for e in &data.outedges {
                g.add_edge(from, VertexId::new(e.to))?;
            }
        }
        g.validate()?;
        Ok(g)
    }

    /// Builds a graph from hand-written input where relationships may omit their childhub.
    ///
    /// `outedges[].to` refers to positions in `input`. A relationship without `hub` gets a
    /// childhub created right after it, and its edges to persons are re-attached to that childhub.
    pub fn from_user_graph(input: &[SerializedVertex], options: GraphOptions) -> Result<Self> {
        let mut g = PedigreeGraph::new(options);
        let mut ids: Vec<VertexId> = Vec::with_capacity(input.len());
        let mut implicit_hub: Vec<Option<VertexId>> = Vec::with_capacity(input.len());

        for data in input {
            let kind = data.kind();
            let id = g.insert_vertex(
                data.name.clone(),
                kind,
                data.properties(),
                data.width,
                &[],
                &[],
            )?;
            ids.push(id);

            let explicit = data.hub
                || data
                    .outedges
                    .iter()
                    .any(|e| input.get(e.to).is_some_and(|t| t.chhub));
            if kind == VertexKind::Relationship && !explicit {
                let hub = g.insert_vertex(
                    format!("chhub_{}", data.name),
                    VertexKind::Childhub,
                    Properties::new(),
                    None,
                    &[id],
                    &[],
                )?;
                implicit_hub.push(Some(hub));
            } else {
                implicit_hub.push(None);
            }
        }

        for (position, data) in input.iter().enumerate() {
            let from = implicit_hub[position].unwrap_or(ids[position]);
            for e in &data.outedges {
                let Some(&to) = ids.get(e.to) else {
                    return Err(Error::MissingEndpoint {
                        from,
                        to: VertexId::new(e.to),
                    });
                };
                g.add_edge(from, to)?;
            }
        }

        g.validate()?;
        Ok(g)
    }
}
