use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fsmp_engine::enumerator::{AnchorPolicy, FaultSetEnumerator};
use fsmp_engine::pipeline::evaluate_fault_set;
use fsmp_graph::{burnt_pancake_graph, EdgeId, FaultSet, VertexId};
use fsmp_lp::{ExactSimplex, FloatSimplex};

fn bench_enumerate_b3_budget3(c: &mut Criterion) {
    let g = burnt_pancake_graph(3).unwrap();
    let enumerator =
        FaultSetEnumerator::for_graph(&g, 3, AnchorPolicy::Assume(VertexId(0))).unwrap();
    c.bench_function("enumerate_b3_budget3", |b| {
        b.iter(|| black_box(enumerator.iter().count()))
    });
}

fn bench_evaluate_b3_four_edges_float(c: &mut Criterion) {
    let g = burnt_pancake_graph(3).unwrap();
    let faults = FaultSet::from_edges([EdgeId(0), EdgeId(17), EdgeId(40), EdgeId(71)]);
    let solver = FloatSimplex::new();
    c.bench_function("evaluate_b3_four_edges_float", |b| {
        b.iter(|| evaluate_fault_set(black_box(&g), black_box(&faults), &solver).unwrap())
    });
}

fn bench_evaluate_b3_four_edges_exact(c: &mut Criterion) {
    let g = burnt_pancake_graph(3).unwrap();
    let faults = FaultSet::from_edges([EdgeId(0), EdgeId(17), EdgeId(40), EdgeId(71)]);
    let solver = ExactSimplex::new();
    c.bench_function("evaluate_b3_four_edges_exact", |b| {
        b.iter(|| evaluate_fault_set(black_box(&g), black_box(&faults), &solver).unwrap())
    });
}

criterion_group!(
    benches,
    bench_enumerate_b3_budget3,
    bench_evaluate_b3_four_edges_float,
    bench_evaluate_b3_four_edges_exact
);
criterion_main!(benches);
