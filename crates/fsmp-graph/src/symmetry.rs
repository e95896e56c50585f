//! Vertex-transitivity witnesses for burnt pancake graphs.
//!
//! B_n is a Cayley graph of the hyperoctahedral group: flips act on
//! positions and value relabellings act on values, and the two commute.
//! Every relabelling is therefore an automorphism, and for any `u`, `v`
//! the relabelling `u.relabelling_to(v)` maps `u` onto `v`. The anchor
//! reduction of the fault-set enumeration rests on this fact, so it is
//! checked on the concrete graph rather than assumed.

use crate::graph::{Graph, VertexId};
use crate::pancake::PancakeGraph;
use crate::vertex::SignedPermutation;

/// Vertex map induced by relabelling values through `map`.
///
/// Returns `None` if some relabelled vertex is missing from `graph`, which
/// only happens when `map` has the wrong dimension for it.
pub fn relabelling_map(graph: &PancakeGraph, map: &SignedPermutation) -> Option<Vec<VertexId>> {
    graph
        .vertex_ids()
        .map(|id| {
            let label = graph.label(id);
            if label.dimension() != map.dimension() {
                return None;
            }
            graph.vertex_id(&label.relabel(map))
        })
        .collect()
}

/// True iff `image` is a bijection on the vertices of `graph` that maps
/// every edge onto an edge.
pub fn is_automorphism<L>(graph: &Graph<L>, image: &[VertexId]) -> bool {
    if image.len() != graph.num_vertices() {
        return false;
    }
    let mut hit = vec![false; image.len()];
    for &target in image {
        if !graph.contains_vertex(target) || hit[target.index()] {
            return false;
        }
        hit[target.index()] = true;
    }
    // Injective on vertices and edge-preserving on a finite graph implies
    // the edge map is a bijection as well.
    graph.edge_list().iter().all(|edge| {
        graph
            .edge_between(image[edge.u.index()], image[edge.v.index()])
            .is_some()
    })
}

/// Check that for every vertex `v` some automorphism maps `anchor` to `v`.
///
/// The witness for `v` is the value relabelling from the anchor's label to
/// `v`'s label.
pub fn has_transitivity_witness(graph: &PancakeGraph, anchor: VertexId) -> bool {
    if !graph.contains_vertex(anchor) {
        return false;
    }
    let source = graph.label(anchor);
    graph.vertex_ids().all(|target| {
        let map = source.relabelling_to(graph.label(target));
        match relabelling_map(graph, &map) {
            Some(image) => image[anchor.index()] == target && is_automorphism(graph, &image),
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pancake::burnt_pancake_graph;

    #[test]
    fn relabellings_are_automorphisms() {
        let g = burnt_pancake_graph(3).unwrap();
        let map = SignedPermutation::new(vec![-2, 3, 1]).unwrap();
        let image = relabelling_map(&g, &map).unwrap();
        assert!(is_automorphism(&g, &image));
    }

    #[test]
    fn b3_and_b4_are_vertex_transitive() {
        for n in [3, 4] {
            let g = burnt_pancake_graph(n).unwrap();
            assert!(has_transitivity_witness(&g, VertexId(0)), "n = {n}");
        }
    }

    #[test]
    fn non_edge_preserving_map_is_rejected() {
        // Path 0-1-2: swapping 0 and 1 breaks edge 1-2.
        let g = Graph::from_edge_list(3, &[(0, 1), (1, 2)]).unwrap();
        assert!(!is_automorphism(&g, &[VertexId(1), VertexId(0), VertexId(2)]));
        assert!(is_automorphism(&g, &[VertexId(2), VertexId(1), VertexId(0)]));
        assert!(!is_automorphism(&g, &[VertexId(0), VertexId(0), VertexId(2)]));
    }

    #[test]
    fn missing_anchor_has_no_witness() {
        let g = burnt_pancake_graph(2).unwrap();
        assert!(!has_transitivity_witness(&g, VertexId(999)));
    }
}
