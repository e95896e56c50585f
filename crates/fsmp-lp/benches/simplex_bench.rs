use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fsmp_lp::{ExactSimplex, FeasibilitySolver, FloatSimplex, LinearProgram, VarBounds};

/// Fractional perfect matching program of the prism over a `k`-cycle:
/// two `k`-cycles joined by a perfect matching, `3k` edges on `2k` vertices.
fn prism_matching_program(k: usize) -> LinearProgram {
    let mut edges = Vec::new();
    for i in 0..k {
        edges.push((i, (i + 1) % k));
        edges.push((k + i, k + (i + 1) % k));
        edges.push((i, k + i));
    }
    let mut lp = LinearProgram::new(edges.len());
    for var in 0..edges.len() {
        lp.set_bounds(var, VarBounds::UNIT).unwrap();
    }
    for vertex in 0..2 * k {
        let terms = edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.0 == vertex || edge.1 == vertex)
            .map(|(var, _)| (var, 1));
        lp.add_equality(terms, 1).unwrap();
    }
    lp.set_objective(vec![1; edges.len()]).unwrap();
    lp
}

fn bench_float_prism_24(c: &mut Criterion) {
    let lp = prism_matching_program(24);
    let solver = FloatSimplex::new();
    c.bench_function("float_simplex_prism_24", |b| {
        b.iter(|| solver.solve(black_box(&lp)).unwrap())
    });
}

fn bench_exact_prism_24(c: &mut Criterion) {
    let lp = prism_matching_program(24);
    let solver = ExactSimplex::new();
    c.bench_function("exact_simplex_prism_24", |b| {
        b.iter(|| solver.solve(black_box(&lp)).unwrap())
    });
}

criterion_group!(benches, bench_float_prism_24, bench_exact_prism_24);
criterion_main!(benches);
