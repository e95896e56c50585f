use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Dimension must be at least 1, got {0}")]
    InvalidDimension(usize),
    #[error("Dimension {dimension} exceeds the supported maximum of {max}")]
    DimensionTooLarge { dimension: usize, max: usize },
    #[error("Not a signed permutation: {entries:?}")]
    InvalidSignedPermutation { entries: Vec<i32> },
    #[error("Duplicate vertex label: {0}")]
    DuplicateVertex(String),
    #[error("Unknown vertex id {0}")]
    UnknownVertex(u32),
    #[error("Self-loop on vertex {0}")]
    SelfLoop(u32),
    #[error("Duplicate edge {{{0}, {1}}}")]
    DuplicateEdge(u32, u32),
    #[error("Graph exceeds the u32 id space")]
    CapacityExceeded,
}

/// Dense index of a vertex in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VertexId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Dense index of an edge in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// An unordered edge, stored with `u < v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub u: VertexId,
    pub v: VertexId,
}

impl Edge {
    fn normalized(a: VertexId, b: VertexId) -> Self {
        if a < b {
            Self { u: a, v: b }
        } else {
            Self { u: b, v: a }
        }
    }

    /// The endpoint opposite `end`.
    pub fn other(&self, end: VertexId) -> VertexId {
        if self.u == end {
            self.v
        } else {
            self.u
        }
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.u == vertex || self.v == vertex
    }
}

/// Read-only access to a (possibly faulted) simple graph.
///
/// The triviality predicates and the matching program are written against
/// this trait, so they run unchanged on a full [`Graph`] and on a
/// [`FaultedGraph`](crate::FaultedGraph) view.
pub trait GraphView {
    /// Live vertices in ascending id order.
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_;

    /// Live edges in ascending id order.
    fn edges(&self) -> impl Iterator<Item = EdgeId> + '_;

    fn endpoints(&self, edge: EdgeId) -> Edge;

    /// Live edges incident to `vertex`.
    fn incident_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_;

    fn degree(&self, vertex: VertexId) -> usize {
        self.incident_edges(vertex).count()
    }

    fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.incident_edges(vertex)
            .map(move |edge| self.endpoints(edge).other(vertex))
    }

    fn vertex_count(&self) -> usize {
        self.vertices().count()
    }

    fn edge_count(&self) -> usize {
        self.edges().count()
    }
}

/// Immutable-after-construction arena graph with labelled vertices.
///
/// Vertex ids follow label insertion order; edge ids follow edge insertion
/// order. Both are stable for the life of the graph.
#[derive(Debug, Clone)]
pub struct Graph<L> {
    labels: IndexSet<L>,
    edges: Vec<Edge>,
    incidence: Vec<Vec<EdgeId>>,
    edge_lookup: HashMap<Edge, EdgeId>,
}

impl<L> Default for Graph<L> {
    fn default() -> Self {
        Self {
            labels: IndexSet::new(),
            edges: Vec::new(),
            incidence: Vec::new(),
            edge_lookup: HashMap::new(),
        }
    }
}

impl<L> Graph<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_vertices(&self) -> usize {
        self.labels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeId) -> Edge {
        self.edges[id.index()]
    }

    pub fn edge_list(&self) -> &[Edge] {
        &self.edges
    }

    /// All incident edges of `vertex` in the base graph.
    pub fn incidence(&self, vertex: VertexId) -> &[EdgeId] {
        &self.incidence[vertex.index()]
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.labels.len() as u32).map(VertexId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len() as u32).map(EdgeId)
    }

    /// Label of `id`.
    ///
    /// # Panics
    /// If `id` is not a vertex of this graph.
    pub fn label(&self, id: VertexId) -> &L {
        match self.labels.get_index(id.index()) {
            Some(label) => label,
            None => panic!("vertex {id} is not in the graph"),
        }
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        id.index() < self.labels.len()
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&Edge::normalized(a, b)).copied()
    }

    /// Common degree of every vertex, or `None` if degrees differ.
    ///
    /// An empty graph is reported as 0-regular.
    pub fn regular_degree(&self) -> Option<usize> {
        let mut degrees = self.incidence.iter().map(Vec::len);
        let first = degrees.next().unwrap_or(0);
        degrees.all(|d| d == first).then_some(first)
    }

    /// Insert an edge between two existing vertices.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, GraphError> {
        for end in [a, b] {
            if !self.contains_vertex(end) {
                return Err(GraphError::UnknownVertex(end.0));
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop(a.0));
        }
        let edge = Edge::normalized(a, b);
        if self.edge_lookup.contains_key(&edge) {
            return Err(GraphError::DuplicateEdge(edge.u.0, edge.v.0));
        }
        let id = EdgeId(u32::try_from(self.edges.len()).map_err(|_| GraphError::CapacityExceeded)?);
        self.edges.push(edge);
        self.incidence[edge.u.index()].push(id);
        self.incidence[edge.v.index()].push(id);
        self.edge_lookup.insert(edge, id);
        Ok(id)
    }
}

impl<L: Hash + Eq + fmt::Debug> Graph<L> {
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            labels: IndexSet::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            incidence: Vec::with_capacity(vertices),
            edge_lookup: HashMap::with_capacity(edges),
        }
    }

    /// Insert a vertex with a fresh label.
    pub fn add_vertex(&mut self, label: L) -> Result<VertexId, GraphError> {
        let id = VertexId(
            u32::try_from(self.labels.len()).map_err(|_| GraphError::CapacityExceeded)?,
        );
        if self.labels.contains(&label) {
            return Err(GraphError::DuplicateVertex(format!("{label:?}")));
        }
        self.labels.insert(label);
        self.incidence.push(Vec::new());
        Ok(id)
    }

    pub fn vertex_id(&self, label: &L) -> Option<VertexId> {
        self.labels.get_index_of(label).map(|i| VertexId(i as u32))
    }
}

impl Graph<u32> {
    /// Build a graph on vertices `0..vertex_count` labelled by their index.
    pub fn from_edge_list(vertex_count: u32, edges: &[(u32, u32)]) -> Result<Self, GraphError> {
        let mut graph = Graph::with_capacity(vertex_count as usize, edges.len());
        for label in 0..vertex_count {
            graph.add_vertex(label)?;
        }
        for &(a, b) in edges {
            graph.add_edge(VertexId(a), VertexId(b))?;
        }
        Ok(graph)
    }
}

impl<L> GraphView for Graph<L> {
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_ids()
    }

    fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_ids()
    }

    fn endpoints(&self, edge: EdgeId) -> Edge {
        self.edge(edge)
    }

    fn incident_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incidence(vertex).iter().copied()
    }

    fn degree(&self, vertex: VertexId) -> usize {
        self.incidence(vertex).len()
    }

    fn vertex_count(&self) -> usize {
        self.num_vertices()
    }

    fn edge_count(&self) -> usize {
        self.num_edges()
    }
}
