//! Proptest strategies for graphs and fault sets.

use proptest::prelude::*;

use crate::fault::FaultSet;
use crate::graph::{EdgeId, Graph, VertexId};

/// Strategy for a simple graph on `2..=max_vertices` vertices labelled
/// `0..n`, with each vertex pair joined independently.
pub fn arb_graph(max_vertices: u32) -> impl Strategy<Value = Graph<u32>> {
    (2..=max_vertices.max(2))
        .prop_flat_map(|n| {
            let pairs = (n * (n - 1) / 2) as usize;
            (Just(n), proptest::collection::vec(any::<bool>(), pairs))
        })
        .prop_map(|(n, present)| {
            let mut edges = Vec::new();
            let mut slot = 0;
            for a in 0..n {
                for b in (a + 1)..n {
                    if present[slot] {
                        edges.push((a, b));
                    }
                    slot += 1;
                }
            }
            // Pairs are distinct and loop-free by construction.
            Graph::from_edge_list(n, &edges).unwrap_or_default()
        })
}

/// Strategy for a fault set over a graph with the given shape, with at most
/// `max_faults` vertices and at most `max_faults` edges.
pub fn arb_fault_set(
    vertex_count: usize,
    edge_count: usize,
    max_faults: usize,
) -> impl Strategy<Value = FaultSet> {
    let vertices = if vertex_count == 0 {
        Just(Vec::new()).boxed()
    } else {
        proptest::collection::vec(0..vertex_count as u32, 0..=max_faults).boxed()
    };
    let edges = if edge_count == 0 {
        Just(Vec::new()).boxed()
    } else {
        proptest::collection::vec(0..edge_count as u32, 0..=max_faults).boxed()
    };
    (vertices, edges).prop_map(|(vertices, edges)| {
        FaultSet::new(
            vertices.into_iter().map(VertexId),
            edges.into_iter().map(EdgeId),
        )
    })
}

/// Strategy for a graph together with a fault set over it.
pub fn arb_faulted_graph(
    max_vertices: u32,
    max_faults: usize,
) -> impl Strategy<Value = (Graph<u32>, FaultSet)> {
    arb_graph(max_vertices).prop_flat_map(move |graph| {
        let faults = arb_fault_set(graph.num_vertices(), graph.num_edges(), max_faults);
        (Just(graph), faults)
    })
}
