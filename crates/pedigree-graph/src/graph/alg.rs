//! Helper algorithms over [`PedigreeGraph`].

use super::{PedigreeGraph, VertexId};
use std::collections::VecDeque;

/// All vertices reachable from `v` by walking in-edges (excluding `v` itself), in BFS order.
pub fn ancestors(g: &PedigreeGraph, v: VertexId) -> Vec<VertexId> {
    walk(g, v, |g, u| g.in_edges(u))
}

/// All vertices reachable from `v` by walking out-edges (excluding `v` itself), in BFS order.
pub fn descendants(g: &PedigreeGraph, v: VertexId) -> Vec<VertexId> {
    walk(g, v, |g, u| g.out_edges(u))
}

fn walk<'g>(
    g: &'g PedigreeGraph,
    start: VertexId,
    next: impl Fn(&'g PedigreeGraph, VertexId) -> &'g [VertexId],
) -> Vec<VertexId> {
    if !g.contains(start) {
        return Vec::new();
    }
    let mut seen = vec![false; g.num_vertices()];
    seen[start.index()] = true;
    let mut out = Vec::new();
    let mut q: VecDeque<VertexId> = VecDeque::new();
    q.push_back(start);
    while let Some(u) = q.pop_front() {
        for &w in next(g, u) {
            if !seen[w.index()] {
                seen[w.index()] = true;
                out.push(w);
                q.push_back(w);
            }
        }
    }
    out
}

/// Weakly connected components, each listed in BFS order from its smallest id.
pub fn components(g: &PedigreeGraph) -> Vec<Vec<VertexId>> {
    let mut seen = vec![false; g.num_vertices()];
    let mut out: Vec<Vec<VertexId>> = Vec::new();

    for start in g.vertex_ids() {
        if seen[start.index()] {
            continue;
        }
        seen[start.index()] = true;
        let mut comp: Vec<VertexId> = Vec::new();
        let mut q: VecDeque<VertexId> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            comp.push(v);
            for &n in g.out_edges(v).iter().chain(g.in_edges(v)) {
                if !seen[n.index()] {
                    seen[n.index()] = true;
                    q.push_back(n);
                }
            }
        }
        out.push(comp);
    }

    out
}

/// Strongly connected components with more than one vertex (Tarjan), sorted by first vertex.
pub fn find_cycles(g: &PedigreeGraph) -> Vec<Vec<VertexId>> {
    struct Tarjan<'a> {
        g: &'a PedigreeGraph,
        index: usize,
        stack: Vec<VertexId>,
        on_stack: Vec<bool>,
        indices: Vec<Option<usize>>,
        lowlink: Vec<usize>,
        sccs: Vec<Vec<VertexId>>,
    }

    impl Tarjan<'_> {
        fn strongconnect(&mut self, v: VertexId) {
            let vi = v.index();
            self.indices[vi] = Some(self.index);
            self.lowlink[vi] = self.index;
            self.index += 1;
            self.stack.push(v);
            self.on_stack[vi] = true;

            for &w in self.g.out_edges(v) {
                let wi = w.index();
                match self.indices[wi] {
                    None => {
                        self.strongconnect(w);
                        self.lowlink[vi] = self.lowlink[vi].min(self.lowlink[wi]);
                    }
                    Some(w_idx) if self.on_stack[wi] => {
                        self.lowlink[vi] = self.lowlink[vi].min(w_idx);
                    }
                    Some(_) => {}
                }
            }

            if Some(self.lowlink[vi]) == self.indices[vi] {
                let mut scc: Vec<VertexId> = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w.index()] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                self.sccs.push(scc);
            }
        }
    }

    let n = g.num_vertices();
    let mut tarjan = Tarjan {
        g,
        index: 0,
        stack: Vec::new(),
        on_stack: vec![false; n],
        indices: vec![None; n],
        lowlink: vec![0; n],
        sccs: Vec::new(),
    };

    for v in g.vertex_ids() {
        if tarjan.indices[v.index()].is_none() {
            tarjan.strongconnect(v);
        }
    }

    let mut cycles: Vec<Vec<VertexId>> = tarjan
        .sccs
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|mut scc| {
            scc.sort();
            scc
        })
        .collect();
    cycles.sort_by(|a, b| a.first().cmp(&b.first()));
    cycles
}
