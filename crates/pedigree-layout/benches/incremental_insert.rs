use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use pedigree_layout::graph::{GraphOptions, PedigreeGraph, Properties, VertexId, VertexKind};
use pedigree_layout::{LayoutOptions, PositionedGraph};
use std::hint::black_box;
use std::time::Duration;

/// A single founder followed by `generations` rounds of "add partner and child" on the newest
/// child, with `siblings` extra children per couple.
fn build_pedigree(generations: usize, siblings: usize) -> PositionedGraph {
    let mut g = PedigreeGraph::new(GraphOptions::default());
    let founder = g
        .insert_vertex("", VertexKind::Person, Properties::new(), None, &[], &[])
        .unwrap();
    let mut pg = PositionedGraph::new(g, LayoutOptions::default()).unwrap();

    let mut person = founder;
    for _ in 0..generations {
        let changes = pg
            .add_new_relationship(person, Properties::new(), false)
            .unwrap();
        let rel = changes.new[0];
        for _ in 0..siblings {
            pg.add_new_child(rel, Properties::new()).unwrap();
        }
        person = changes.new[2];
    }
    pg
}

fn bench_incremental_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_insert");
    group.measurement_time(Duration::from_secs(10));

    let cases = [("gen_5_s2", 5usize, 2usize), ("gen_20_s3", 20, 3), ("gen_40_s4", 40, 4)];

    for (name, generations, siblings) in cases {
        group.bench_with_input(
            BenchmarkId::new("add_new_child", name),
            &(generations, siblings),
            |b, &(generations, siblings)| {
                b.iter_batched(
                    || build_pedigree(generations, siblings),
                    |mut pg| {
                        let rel = pg
                            .graph()
                            .relationships_iter()
                            .next()
                            .unwrap();
                        let changes = pg.add_new_child(black_box(rel), Properties::new());
                        black_box(changes.map(|c| c.moved.len()).unwrap_or(0));
                    },
                    BatchSize::LargeInput,
                )
            },
        );

        group.bench_with_input(
            BenchmarkId::new("add_new_parents", name),
            &(generations, siblings),
            |b, &(generations, siblings)| {
                b.iter_batched(
                    || build_pedigree(generations, siblings),
                    |mut pg| {
                        let changes = pg.add_new_parents(black_box(VertexId::new(0)));
                        black_box(changes.map(|c| c.moved.len()).unwrap_or(0));
                    },
                    BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_incremental_insert);
criterion_main!(benches);
