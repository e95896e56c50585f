//! Burnt pancake graph generator.
//!
//! B_n has one vertex per signed permutation of `1..=n` (n!·2ⁿ vertices) and
//! joins `u` to `u.flip(k)` for every prefix length `k` in `1..=n`. Each flip
//! is an involution and changes at least one sign, so B_n is n-regular with
//! n·n!·2ⁿ/2 edges.
//!
//! Adjacency is generated directly from each vertex's n flips, which costs
//! O(V·n). Testing all vertex pairs against every flip would cost O(V²·n)
//! and is already impractical for n = 6. The vertex count itself grows as
//! n!·2ⁿ, so [`MAX_DIMENSION`] caps the generator well before memory does.

use crate::graph::{Graph, GraphError, VertexId};
use crate::vertex::SignedPermutation;

/// Largest dimension the generator accepts (8!·2⁸ ≈ 10.3M vertices).
pub const MAX_DIMENSION: usize = 8;

pub type PancakeGraph = Graph<SignedPermutation>;

fn check_dimension(n: usize) -> Result<(), GraphError> {
    if n == 0 {
        return Err(GraphError::InvalidDimension(n));
    }
    if n > MAX_DIMENSION {
        return Err(GraphError::DimensionTooLarge {
            dimension: n,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

/// Number of vertices of B_n, `n!·2ⁿ`.
pub fn vertex_count(n: usize) -> usize {
    (1..=n).product::<usize>() << n
}

/// Number of edges of B_n, `n·n!·2ⁿ / 2`.
pub fn edge_count(n: usize) -> usize {
    vertex_count(n) * n / 2
}

/// All signed permutations of `1..=n` in generation order.
///
/// Permutations are produced in lexicographic order; within each
/// permutation, sign patterns follow a binary counter whose most significant
/// bit is the first position (`0` = positive).
pub fn signed_permutations(n: usize) -> Result<Vec<SignedPermutation>, GraphError> {
    check_dimension(n)?;
    let mut permutations = Vec::new();
    let mut prefix = Vec::with_capacity(n);
    let mut used = vec![false; n];
    lexicographic_permutations(&mut prefix, &mut used, &mut permutations);

    let mut out = Vec::with_capacity(vertex_count(n));
    for permutation in &permutations {
        for pattern in 0u32..(1u32 << n) {
            let entries = permutation
                .iter()
                .enumerate()
                .map(|(position, &value)| {
                    if (pattern >> (n - 1 - position)) & 1 == 1 {
                        -value
                    } else {
                        value
                    }
                })
                .collect();
            out.push(SignedPermutation::from_entries(entries));
        }
    }
    Ok(out)
}

fn lexicographic_permutations(prefix: &mut Vec<i32>, used: &mut [bool], out: &mut Vec<Vec<i32>>) {
    if prefix.len() == used.len() {
        out.push(prefix.clone());
        return;
    }
    for value in 0..used.len() {
        if used[value] {
            continue;
        }
        used[value] = true;
        prefix.push(value as i32 + 1);
        lexicographic_permutations(prefix, used, out);
        prefix.pop();
        used[value] = false;
    }
}

/// Build the burnt pancake graph B_n.
///
/// Vertex ids follow [`signed_permutations`] order, so `VertexId(0)` is the
/// identity `(1, 2, ..., n)`. Edges are inserted while scanning vertices in
/// id order and flips in ascending length, keeping only the first sighting
/// of each unordered pair.
pub fn burnt_pancake_graph(n: usize) -> Result<PancakeGraph, GraphError> {
    let vertices = signed_permutations(n)?;
    let mut graph = Graph::with_capacity(vertices.len(), edge_count(n));
    for vertex in vertices {
        graph.add_vertex(vertex)?;
    }

    let ids: Vec<VertexId> = graph.vertex_ids().collect();
    for id in ids {
        let mut neighbors = Vec::with_capacity(n);
        for k in 1..=n {
            let flipped = graph.label(id).flip(k);
            // Every flip of a signed permutation is again a signed permutation.
            let neighbor = graph
                .vertex_id(&flipped)
                .ok_or_else(|| GraphError::InvalidSignedPermutation {
                    entries: flipped.entries().to_vec(),
                })?;
            neighbors.push(neighbor);
        }
        for neighbor in neighbors {
            if id < neighbor {
                graph.add_edge(id, neighbor)?;
            }
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphView;
    use std::collections::HashSet;

    #[test]
    fn rejects_out_of_range_dimensions() {
        assert_eq!(
            burnt_pancake_graph(0).unwrap_err(),
            GraphError::InvalidDimension(0)
        );
        assert!(matches!(
            signed_permutations(MAX_DIMENSION + 1),
            Err(GraphError::DimensionTooLarge { .. })
        ));
    }

    #[test]
    fn vertex_and_edge_counts_match_closed_forms() {
        for n in 1..=5 {
            let g = burnt_pancake_graph(n).unwrap();
            assert_eq!(g.num_vertices(), vertex_count(n), "n = {n}");
            assert_eq!(g.num_edges(), edge_count(n), "n = {n}");
        }
    }

    #[test]
    fn b3_has_48_vertices_and_72_edges() {
        let g = burnt_pancake_graph(3).unwrap();
        assert_eq!(g.num_vertices(), 48);
        assert_eq!(g.num_edges(), 72);
    }

    #[test]
    fn graph_is_n_regular() {
        for n in 1..=5 {
            let g = burnt_pancake_graph(n).unwrap();
            assert_eq!(g.regular_degree(), Some(n), "n = {n}");
        }
    }

    #[test]
    fn generation_order_starts_at_identity() {
        let vertices = signed_permutations(3).unwrap();
        assert_eq!(vertices.len(), 48);
        assert_eq!(vertices[0], SignedPermutation::identity(3).unwrap());
        assert_eq!(vertices[1].entries(), &[1, 2, -3]);
        assert_eq!(vertices[4].entries(), &[-1, 2, 3]);
        assert_eq!(vertices[8].entries(), &[1, 3, 2]);
        let unique: HashSet<_> = vertices.iter().collect();
        assert_eq!(unique.len(), 48);
    }

    #[test]
    fn neighbors_are_exactly_the_flips() {
        let g = burnt_pancake_graph(4).unwrap();
        for id in g.vertex_ids() {
            let label = g.label(id);
            let expected: HashSet<_> = (1..=4).map(|k| label.flip(k)).collect();
            let actual: HashSet<_> = g.neighbors(id).map(|v| g.label(v).clone()).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn b1_is_a_single_edge() {
        let g = burnt_pancake_graph(1).unwrap();
        assert_eq!(g.num_vertices(), 2);
        assert_eq!(g.num_edges(), 1);
    }
}
