//! Generational ranking for a full relayout.
//!
//! Persons and relationships land on even ranks, childhubs on odd ranks. Ranks only ever grow, so
//! both passes are monotone fixpoints over an acyclic graph.

use crate::util::Outcome;
use pedigree_graph::{PedigreeGraph, VertexId, VertexVec};

/// Longest-path style ranking: every vertex starts at 0 and is pushed down until partners share a
/// rank, each childhub sits one rank below its relationship and children sit below their childhub.
pub fn assign_ranks(g: &PedigreeGraph) -> (VertexVec<usize>, Outcome) {
    let mut ranks: VertexVec<usize> = vec![0; g.num_vertices()].into();
    let limit = pass_limit(g);

    for pass in 1..=limit {
        let mut changed = false;
        for rel in g.relationships_iter() {
            let rank = g
                .in_edges(rel)
                .iter()
                .map(|&p| ranks[p])
                .chain(std::iter::once(ranks[rel]))
                .max()
                .unwrap_or(0);
            for &p in g.in_edges(rel) {
                changed |= raise(&mut ranks, p, rank);
            }
            changed |= raise(&mut ranks, rel, rank);

            let Some(hub) = g.relationship_childhub(rel) else {
                continue;
            };
            changed |= raise(&mut ranks, hub, rank + 1);
            let hub_rank = ranks[hub];
            for &child in g.out_edges(hub) {
                changed |= raise(&mut ranks, child, hub_rank + 1);
            }
        }
        if !changed {
            return (ranks, Outcome::Converged { iterations: pass });
        }
    }
    (ranks, Outcome::IterationLimitExceeded { limit })
}

/// Pulls a parentless couple down towards its children when the couple has no other relationship,
/// so that the child edges do not span extra ranks.
pub fn compact_ranks(g: &PedigreeGraph, ranks: &mut VertexVec<usize>) -> Outcome {
    let limit = pass_limit(g);

    for pass in 1..=limit {
        let mut changed = false;
        for rel in g.relationships_iter() {
            let partners = g.in_edges(rel);
            let free = partners
                .iter()
                .all(|&p| g.in_edges(p).is_empty() && g.out_edges(p).len() == 1);
            if !free {
                continue;
            }
            let Some(hub) = g.relationship_childhub(rel) else {
                continue;
            };
            let Some(lowest_child) = g.out_edges(hub).iter().map(|&c| ranks[c]).min() else {
                continue;
            };
            let target = lowest_child.saturating_sub(2);
            if target <= ranks[rel] {
                continue;
            }
            for &p in partners {
                ranks[p] = target;
            }
            ranks[rel] = target;
            ranks[hub] = target + 1;
            changed = true;
        }
        if !changed {
            return Outcome::Converged { iterations: pass };
        }
    }
    Outcome::IterationLimitExceeded { limit }
}

fn raise(ranks: &mut VertexVec<usize>, v: VertexId, rank: usize) -> bool {
    if ranks[v] < rank {
        ranks[v] = rank;
        true
    } else {
        false
    }
}

// Every effective pass raises some vertex, and no rank exceeds twice the vertex count.
fn pass_limit(g: &PedigreeGraph) -> usize {
    2 * g.num_vertices() + 2
}
