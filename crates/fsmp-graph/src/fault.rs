use std::fmt;
use std::hash::Hash;

use serde::Serialize;

use crate::graph::{Edge, EdgeId, Graph, GraphView, VertexId};

/// Vertices and edges to delete from a base graph.
///
/// Both lists are kept sorted and free of duplicates, so two fault sets with
/// the same members compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FaultSet {
    vertices: Vec<VertexId>,
    edges: Vec<EdgeId>,
}

impl FaultSet {
    pub fn new(
        vertices: impl IntoIterator<Item = VertexId>,
        edges: impl IntoIterator<Item = EdgeId>,
    ) -> Self {
        let mut vertices: Vec<_> = vertices.into_iter().collect();
        let mut edges: Vec<_> = edges.into_iter().collect();
        vertices.sort_unstable();
        vertices.dedup();
        edges.sort_unstable();
        edges.dedup();
        Self { vertices, edges }
    }

    pub fn from_vertices(vertices: impl IntoIterator<Item = VertexId>) -> Self {
        Self::new(vertices, Vec::new())
    }

    pub fn from_edges(edges: impl IntoIterator<Item = EdgeId>) -> Self {
        Self::new(Vec::new(), edges)
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Total fault count `|V_f| + |E_f|`.
    pub fn len(&self) -> usize {
        self.vertices.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }
}

impl fmt::Display for FaultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertices: Vec<String> = self.vertices.iter().map(ToString::to_string).collect();
        let edges: Vec<String> = self.edges.iter().map(ToString::to_string).collect();
        write!(
            f,
            "vertices: [{}]  edges: [{}]",
            vertices.join(", "),
            edges.join(", ")
        )
    }
}

/// A base graph with a fault set applied.
///
/// Faults are liveness masks over the immutable base graph. An edge is live
/// iff it was not removed and both endpoints are live.
#[derive(Debug, Clone)]
pub struct FaultedGraph<'g, L> {
    base: &'g Graph<L>,
    vertex_alive: Vec<bool>,
    edge_alive: Vec<bool>,
    degree: Vec<u32>,
    live_vertices: usize,
    live_edges: usize,
}

impl<'g, L> FaultedGraph<'g, L> {
    /// Apply `faults` to `base`: remove the edges, then the vertices together
    /// with their incident edges.
    ///
    /// # Panics
    /// If the fault set references a vertex or edge outside `base`.
    pub fn new(base: &'g Graph<L>, faults: &FaultSet) -> Self {
        let mut vertex_alive = vec![true; base.num_vertices()];
        let mut edge_alive = vec![true; base.num_edges()];

        for &edge in faults.edges() {
            assert!(
                edge.index() < edge_alive.len(),
                "fault set references edge {edge} outside the base graph"
            );
            edge_alive[edge.index()] = false;
        }
        for &vertex in faults.vertices() {
            assert!(
                vertex.index() < vertex_alive.len(),
                "fault set references vertex {vertex} outside the base graph"
            );
            vertex_alive[vertex.index()] = false;
            for &edge in base.incidence(vertex) {
                edge_alive[edge.index()] = false;
            }
        }

        let mut degree = vec![0u32; base.num_vertices()];
        let mut live_edges = 0;
        for (edge, alive) in base.edge_list().iter().zip(&edge_alive) {
            if *alive {
                degree[edge.u.index()] += 1;
                degree[edge.v.index()] += 1;
                live_edges += 1;
            }
        }
        let live_vertices = vertex_alive.iter().filter(|alive| **alive).count();

        Self {
            base,
            vertex_alive,
            edge_alive,
            degree,
            live_vertices,
            live_edges,
        }
    }

    pub fn base(&self) -> &'g Graph<L> {
        self.base
    }

    pub fn is_vertex_alive(&self, vertex: VertexId) -> bool {
        self.vertex_alive[vertex.index()]
    }

    pub fn is_edge_alive(&self, edge: EdgeId) -> bool {
        self.edge_alive[edge.index()]
    }
}

impl<L: Clone + Hash + Eq + fmt::Debug> FaultedGraph<'_, L> {
    /// Copy the surviving vertices and edges into a standalone graph.
    ///
    /// Vertex and edge ids are renumbered densely; labels are preserved.
    pub fn materialize(&self) -> Graph<L> {
        let mut graph = Graph::with_capacity(self.live_vertices, self.live_edges);
        let mut remap = vec![None; self.base.num_vertices()];
        for vertex in self.vertices() {
            // Labels are unique in the base graph, so insertion cannot collide.
            if let Ok(id) = graph.add_vertex(self.base.label(vertex).clone()) {
                remap[vertex.index()] = Some(id);
            }
        }
        for edge in self.edges() {
            let Edge { u, v } = self.base.edge(edge);
            if let (Some(u), Some(v)) = (remap[u.index()], remap[v.index()]) {
                let _ = graph.add_edge(u, v);
            }
        }
        graph
    }
}

impl<L> GraphView for FaultedGraph<'_, L> {
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.base
            .vertex_ids()
            .filter(move |v| self.vertex_alive[v.index()])
    }

    fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.base
            .edge_ids()
            .filter(move |e| self.edge_alive[e.index()])
    }

    fn endpoints(&self, edge: EdgeId) -> Edge {
        self.base.edge(edge)
    }

    fn incident_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.base
            .incidence(vertex)
            .iter()
            .copied()
            .filter(move |e| self.edge_alive[e.index()])
    }

    fn degree(&self, vertex: VertexId) -> usize {
        self.degree[vertex.index()] as usize
    }

    fn vertex_count(&self) -> usize {
        self.live_vertices
    }

    fn edge_count(&self) -> usize {
        self.live_edges
    }
}

impl<L> Graph<L> {
    /// View of this graph with `faults` removed.
    pub fn with_faults(&self, faults: &FaultSet) -> FaultedGraph<'_, L> {
        FaultedGraph::new(self, faults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Square 0-1-2-3-0 with chord 0-2.
    fn square_with_chord() -> Graph<u32> {
        Graph::from_edge_list(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap()
    }

    #[test]
    fn fault_set_normalizes_members() {
        let a = FaultSet::new([VertexId(3), VertexId(1), VertexId(3)], [EdgeId(2)]);
        let b = FaultSet::new([VertexId(1), VertexId(3)], [EdgeId(2), EdgeId(2)]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(FaultSet::default().is_empty());
    }

    #[test]
    fn removing_a_vertex_drops_incident_edges() {
        let g = square_with_chord();
        let faulted = g.with_faults(&FaultSet::from_vertices([VertexId(0)]));
        assert_eq!(faulted.vertex_count(), 3);
        assert_eq!(faulted.edge_count(), 2);
        assert_eq!(faulted.degree(VertexId(2)), 2);
        assert_eq!(faulted.degree(VertexId(1)), 1);
        assert!(!faulted.is_vertex_alive(VertexId(0)));
        assert_eq!(faulted.incident_edges(VertexId(0)).count(), 0);
    }

    #[test]
    fn removing_an_edge_keeps_endpoints() {
        let g = square_with_chord();
        let chord = g.edge_between(VertexId(0), VertexId(2)).unwrap();
        let faulted = g.with_faults(&FaultSet::from_edges([chord]));
        assert_eq!(faulted.vertex_count(), 4);
        assert_eq!(faulted.edge_count(), 4);
        assert!(!faulted.is_edge_alive(chord));
        for v in faulted.vertices() {
            assert_eq!(faulted.degree(v), 2);
        }
    }

    #[test]
    fn base_graph_is_untouched() {
        let g = square_with_chord();
        let _ = g.with_faults(&FaultSet::new([VertexId(1)], [EdgeId(0)]));
        assert_eq!(g.num_vertices(), 4);
        assert_eq!(g.num_edges(), 5);
    }

    #[test]
    fn materialize_matches_view() {
        let g = square_with_chord();
        let faulted = g.with_faults(&FaultSet::new([VertexId(3)], [EdgeId(0)]));
        let copy = faulted.materialize();
        assert_eq!(copy.num_vertices(), faulted.vertex_count());
        assert_eq!(copy.num_edges(), faulted.edge_count());
        for v in faulted.vertices() {
            let label = g.label(v);
            let copied = copy.vertex_id(label).unwrap();
            assert_eq!(GraphView::degree(&copy, copied), faulted.degree(v));
        }
    }

    #[test]
    #[should_panic(expected = "outside the base graph")]
    fn foreign_edge_is_a_defect() {
        let g = square_with_chord();
        let _ = g.with_faults(&FaultSet::from_edges([EdgeId(99)]));
    }
}
