//! Ancestor sets for persons and relationships.

use crate::order::Order;
use pedigree_graph::{PedigreeGraph, VertexId};
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

/// For every person and relationship, each ancestor person mapped to the shortest generational
/// distance (the vertex itself is its own ancestor at distance 0).
///
/// A relationship inherits the ancestors of both partners; when the two partners share an
/// ancestor the relationship is consanguineous.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AncestorIndex {
    ancestors: HashMap<VertexId, HashMap<VertexId, usize>>,
    consanguineous: HashSet<VertexId>,
}

impl AncestorIndex {
    /// Walks ranks top-down so that parents are always resolved before their children.
    pub fn compute(g: &PedigreeGraph, order: &Order) -> Self {
        let mut index = AncestorIndex::default();

        for row in order.ranks() {
            for &v in row {
                if !g.is_person(v) {
                    continue;
                }
                let (merged, _) = index.merge_from(v, &g.parents(v));
                index.ancestors.insert(v, merged);
            }
        }

        // Relationships need both partners resolved, which the first pass guarantees.
        for row in order.ranks() {
            for &v in row {
                if !g.is_relationship(v) {
                    continue;
                }
                let (merged, shared) = index.merge_from(v, g.in_edges(v));
                if shared {
                    index.consanguineous.insert(v);
                }
                index.ancestors.insert(v, merged);
            }
        }

        index
    }

    /// Returns the merged map for `v` and whether two branches had an ancestor in common.
    fn merge_from(&self, v: VertexId, parents: &[VertexId]) -> (HashMap<VertexId, usize>, bool) {
        let mut merged: HashMap<VertexId, usize> = HashMap::default();
        merged.insert(v, 0);
        let mut shared = false;
        for p in parents {
            let Some(branch) = self.ancestors.get(p) else {
                continue;
            };
            for (&u, &dist) in branch {
                merged
                    .entry(u)
                    .and_modify(|d| {
                        shared = true;
                        *d = (*d).min(dist + 1);
                    })
                    .or_insert(dist + 1);
            }
        }
        (merged, shared)
    }

    pub fn ancestors_of(&self, v: VertexId) -> Option<&HashMap<VertexId, usize>> {
        self.ancestors.get(&v)
    }

    /// True when `ancestor` is `v` itself or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: VertexId, v: VertexId) -> bool {
        self.ancestors
            .get(&v)
            .is_some_and(|m| m.contains_key(&ancestor))
    }

    pub fn distance(&self, ancestor: VertexId, v: VertexId) -> Option<usize> {
        self.ancestors.get(&v)?.get(&ancestor).copied()
    }

    pub fn is_consanguineous(&self, rel: VertexId) -> bool {
        self.consanguineous.contains(&rel)
    }
}
