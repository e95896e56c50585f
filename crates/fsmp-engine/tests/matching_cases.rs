//! Fractional perfect matching on small named graphs, against both
//! simplex backends.

use fsmp_engine::matching::{fractional_perfect_matching, has_fractional_perfect_matching};
use fsmp_graph::{EdgeId, FaultSet, Graph, GraphView, VertexId};
use fsmp_lp::{ExactSimplex, FeasibilitySolver, FloatSimplex};

type Weights = Option<Vec<(EdgeId, f64)>>;

fn cycle(n: u32) -> Graph<u32> {
    let edges: Vec<(u32, u32)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    Graph::from_edge_list(n, &edges).unwrap()
}

fn path(n: u32) -> Graph<u32> {
    let edges: Vec<(u32, u32)> = (1..n).map(|i| (i - 1, i)).collect();
    Graph::from_edge_list(n, &edges).unwrap()
}

fn star(leaves: u32) -> Graph<u32> {
    let edges: Vec<(u32, u32)> = (1..=leaves).map(|leaf| (0, leaf)).collect();
    Graph::from_edge_list(leaves + 1, &edges).unwrap()
}

fn weights<G: GraphView, S: FeasibilitySolver>(graph: &G, solver: &S) -> Weights {
    fractional_perfect_matching(graph, solver)
        .unwrap()
        .map(|m| m.weights)
}

/// Weights from the float and the exact backend, in that order.
fn solve_both<G: GraphView>(graph: &G) -> [Weights; 2] {
    [
        weights(graph, &FloatSimplex::new()),
        weights(graph, &ExactSimplex::new()),
    ]
}

#[test]
fn even_cycle_has_matching() {
    for result in solve_both(&cycle(4)) {
        assert!(result.is_some());
    }
}

#[test]
fn odd_cycle_has_half_integral_matching() {
    for result in solve_both(&cycle(5)) {
        let weights = result.expect("C5 is matchable");
        assert_eq!(weights.len(), 5);
        for (_, w) in weights {
            assert!((w - 0.5).abs() < 1e-9, "weight {w}");
        }
    }
}

#[test]
fn single_edge_gets_full_weight() {
    for result in solve_both(&path(2)) {
        let weights = result.expect("K2 is matchable");
        assert_eq!(weights.len(), 1);
        assert_eq!(weights[0].0, EdgeId(0));
        assert!((weights[0].1 - 1.0).abs() < 1e-9);
    }
}

#[test]
fn odd_path_and_claw_have_none() {
    for graph in [path(3), star(3), path(5)] {
        assert_eq!(solve_both(&graph), [None, None]);
    }
}

#[test]
fn isolated_vertex_has_none() {
    let g = Graph::from_edge_list(5, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
    assert!(!has_fractional_perfect_matching(&g, &FloatSimplex::new()).unwrap());
    assert!(!has_fractional_perfect_matching(&g, &ExactSimplex::new()).unwrap());
}

#[test]
fn triangular_prism_weights_sum_to_one_at_every_vertex() {
    let g = Graph::from_edge_list(
        6,
        &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (0, 3), (1, 4), (2, 5)],
    )
    .unwrap();
    for result in solve_both(&g) {
        let weights = result.expect("prism is matchable");
        for v in g.vertices() {
            let around: f64 = g
                .incident_edges(v)
                .map(|e| {
                    weights
                        .iter()
                        .find(|(id, _)| *id == e)
                        .map_or(0.0, |(_, w)| *w)
                })
                .sum();
            assert!((around - 1.0).abs() < 1e-9);
        }
    }
}

#[test]
fn faulted_view_is_solved_on_live_edges_only() {
    // C6 minus vertex 0 is P5: odd, no matching. C6 minus edge 0 is P6.
    let g = cycle(6);
    let p5 = g.with_faults(&FaultSet::from_vertices([VertexId(0)]));
    let p6 = g.with_faults(&FaultSet::from_edges([EdgeId(0)]));
    assert_eq!(solve_both(&p5), [None, None]);
    for result in solve_both(&p6) {
        let weights = result.expect("P6 is matchable");
        assert_eq!(weights.len(), 5);
        assert!(weights.iter().all(|(e, _)| *e != EdgeId(0)));
    }
}
