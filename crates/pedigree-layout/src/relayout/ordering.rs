//! Rank ordering for a full relayout.
//!
//! Vertices are grouped into units that always stay contiguous: on person ranks a unit is a chain
//! `P-R-P-R-P` of partners and their relationships, on childhub ranks every childhub is a unit of
//! its own. Units are first laid out family by family, then reordered by barycenter sweeps; a sweep
//! result is kept only when it lowers the total crossing count.

use crate::options::LayoutOptions;
use crate::order::Order;
use pedigree_graph::{PedigreeGraph, VertexId, VertexVec};

type Unit = Vec<VertexId>;

/// Layers of units, top rank first.
type Layering = Vec<Vec<Unit>>;

pub fn order(g: &PedigreeGraph, ranks: &VertexVec<usize>, options: &LayoutOptions) -> Order {
    let num_ranks = ranks.values().copied().max().map_or(0, |r| r + 1);
    let mut layering = init_order(g, ranks, num_ranks);

    let mut best_cc = cross_count(g, ranks, &flatten(&layering));
    let mut best = layering.clone();
    let mut since_best = 0;

    for i in 0..options.max_ordering_iterations {
        if best_cc == 0 || since_best >= 4 {
            break;
        }
        let use_down = i % 2 == 0;
        let bias_right = i % 4 >= 2;
        sweep(g, ranks, &mut layering, use_down, bias_right);

        let cc = cross_count(g, ranks, &flatten(&layering));
        if cc < best_cc {
            best_cc = cc;
            best = layering.clone();
            since_best = 0;
        } else {
            since_best += 1;
        }
    }

    tracing::debug!(crossings = best_cc, "ordered ranks");
    Order::from_ranks(flatten(&best))
}

/// Family-by-family initial layering: each rank is filled in the order of the parents above it.
fn init_order(g: &PedigreeGraph, ranks: &VertexVec<usize>, num_ranks: usize) -> Layering {
    let mut layering: Layering = vec![Vec::new(); num_ranks];
    let mut placed = vec![false; g.num_vertices()];
    let mut slot: VertexVec<usize> = vec![usize::MAX; g.num_vertices()].into();

    for (r, layer) in layering.iter_mut().enumerate() {
        let mut candidates: Vec<VertexId> = g.vertex_ids().filter(|&v| ranks[v] == r).collect();
        candidates.sort_by_key(|&v| {
            let parent_slot = g.in_edges(v).first().map_or(usize::MAX, |&u| {
                if ranks[u] < r { slot[u] } else { usize::MAX }
            });
            (parent_slot, v)
        });

        let mut next = 0;
        for v in candidates {
            if placed[v.index()] {
                continue;
            }
            let mut unit = Vec::new();
            if g.is_person(v) {
                collect_chain(g, ranks, v, &mut placed, &mut unit);
            } else {
                placed[v.index()] = true;
                unit.push(v);
            }
            for &u in &unit {
                slot[u] = next;
                next += 1;
            }
            layer.push(unit);
        }
    }
    layering
}

/// Appends `person`, then each of its same-rank relationships followed by that partner's chain.
fn collect_chain(
    g: &PedigreeGraph,
    ranks: &VertexVec<usize>,
    person: VertexId,
    placed: &mut [bool],
    unit: &mut Unit,
) {
    placed[person.index()] = true;
    unit.push(person);
    for &rel in g.out_edges(person) {
        if placed[rel.index()] || ranks[rel] != ranks[person] {
            continue;
        }
        placed[rel.index()] = true;
        unit.push(rel);
        for &partner in g.in_edges(rel) {
            if !placed[partner.index()] {
                collect_chain(g, ranks, partner, placed, unit);
            }
        }
    }
}

fn flatten(layering: &Layering) -> Vec<Vec<VertexId>> {
    layering
        .iter()
        .map(|units| units.iter().flatten().copied().collect())
        .collect()
}

fn sweep(
    g: &PedigreeGraph,
    ranks: &VertexVec<usize>,
    layering: &mut Layering,
    use_down: bool,
    bias_right: bool,
) {
    let num_ranks = layering.len();
    let sweep_ranks: Vec<usize> = if use_down {
        (1..num_ranks).collect()
    } else {
        (0..num_ranks.saturating_sub(1)).rev().collect()
    };

    for r in sweep_ranks {
        let slots = slots_of(g, layering);
        let entries: Vec<SortEntry> = layering[r]
            .iter()
            .enumerate()
            .map(|(i, unit)| {
                let neighbours: Vec<usize> = unit
                    .iter()
                    .flat_map(|&v| {
                        let edges = if use_down {
                            g.in_edges(v)
                        } else {
                            g.out_edges(v)
                        };
                        edges.iter().copied().filter(move |&u| {
                            if use_down { ranks[u] < r } else { ranks[u] > r }
                        })
                    })
                    .map(|u| slots[u])
                    .collect();
                let weight = neighbours.len() as f64;
                let barycenter = (!neighbours.is_empty())
                    .then(|| neighbours.iter().sum::<usize>() as f64 / weight);
                SortEntry {
                    unit: unit.clone(),
                    i,
                    barycenter,
                }
            })
            .collect();
        layering[r] = sort(entries, bias_right);
    }
}

fn slots_of(g: &PedigreeGraph, layering: &Layering) -> VertexVec<usize> {
    let mut slots: VertexVec<usize> = vec![0; g.num_vertices()].into();
    for units in layering {
        for (i, &v) in units.iter().flatten().enumerate() {
            slots[v] = i;
        }
    }
    slots
}

#[derive(Debug, Clone)]
struct SortEntry {
    unit: Unit,
    i: usize,
    barycenter: Option<f64>,
}

/// Sorts units with a barycenter and keeps the others at their current index.
fn sort(entries: Vec<SortEntry>, bias_right: bool) -> Vec<Unit> {
    let (mut sortable, mut unsortable): (Vec<SortEntry>, Vec<SortEntry>) =
        entries.into_iter().partition(|e| e.barycenter.is_some());

    unsortable.sort_by(|a, b| b.i.cmp(&a.i));
    sortable.sort_by(|a, b| {
        let a_bc = a.barycenter.unwrap_or(0.0);
        let b_bc = b.barycenter.unwrap_or(0.0);
        a_bc.total_cmp(&b_bc).then_with(|| {
            if bias_right {
                b.i.cmp(&a.i)
            } else {
                a.i.cmp(&b.i)
            }
        })
    });

    fn consume_unsortable(
        parts: &mut Vec<Unit>,
        unsortable: &mut Vec<SortEntry>,
        mut index: usize,
    ) -> usize {
        while let Some(last) = unsortable.last() {
            if last.i > index {
                break;
            }
            let Some(last) = unsortable.pop() else {
                break;
            };
            parts.push(last.unit);
            index += 1;
        }
        index
    }

    let mut parts: Vec<Unit> = Vec::new();
    let mut index = consume_unsortable(&mut parts, &mut unsortable, 0);
    for entry in sortable {
        index += 1;
        parts.push(entry.unit);
        index = consume_unsortable(&mut parts, &mut unsortable, index);
    }
    parts.extend(unsortable.into_iter().rev().map(|e| e.unit));
    parts
}

/// Crossings between edges joining adjacent ranks, summed over all rank pairs.
pub fn cross_count(g: &PedigreeGraph, ranks: &VertexVec<usize>, layering: &[Vec<VertexId>]) -> usize {
    (1..layering.len())
        .map(|r| two_layer_cross_count(g, ranks, &layering[r - 1], &layering[r], r))
        .sum()
}

/// Accumulator-tree bilayer crossing count.
fn two_layer_cross_count(
    g: &PedigreeGraph,
    ranks: &VertexVec<usize>,
    north: &[VertexId],
    south: &[VertexId],
    south_rank: usize,
) -> usize {
    if south.is_empty() {
        return 0;
    }
    let mut south_pos: VertexVec<usize> = vec![0; g.num_vertices()].into();
    for (i, &v) in south.iter().enumerate() {
        south_pos[v] = i;
    }

    let mut south_entries: Vec<usize> = Vec::new();
    for &v in north {
        let mut entries: Vec<usize> = g
            .out_edges(v)
            .iter()
            .filter(|&&w| ranks[w] == south_rank)
            .map(|&w| south_pos[w])
            .collect();
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<usize> = vec![0; tree_size];

    let mut cc = 0;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}
