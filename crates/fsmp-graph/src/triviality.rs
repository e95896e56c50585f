//! Triviality predicates for faulted graphs.
//!
//! A fault set that leaves an isolated vertex ("basic") or two pendant
//! vertices hanging off one common neighbour ("conditionally basic") destroys
//! every fractional perfect matching for a trivial reason. Such fault sets are
//! not counted as preclusion counterexamples.

use serde::Serialize;

use crate::graph::{GraphView, VertexId};

/// Outcome of the triviality test for one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Triviality {
    Basic,
    ConditionallyBasic,
    NonTrivial,
}

/// True iff `graph` has a vertex of degree 0.
///
/// A graph without vertices counts as basic: its minimum degree is
/// undefined, and it has no fractional perfect matching either.
pub fn is_basic<G: GraphView>(graph: &G) -> bool {
    graph.vertex_count() == 0 || graph.vertices().any(|v| graph.degree(v) == 0)
}

/// True iff `graph` is not basic, has exactly two vertices of degree 1, and
/// those two vertices share at least one neighbour.
pub fn is_conditionally_basic<G: GraphView>(graph: &G) -> bool {
    if is_basic(graph) {
        return false;
    }
    match pendant_pair(graph) {
        Some((a, b)) => !common_neighbors(graph, a, b).is_empty(),
        None => false,
    }
}

/// Classify `graph`; basic takes precedence over conditionally basic.
pub fn classify<G: GraphView>(graph: &G) -> Triviality {
    if is_basic(graph) {
        Triviality::Basic
    } else if is_conditionally_basic(graph) {
        Triviality::ConditionallyBasic
    } else {
        Triviality::NonTrivial
    }
}

/// The two degree-1 vertices, if there are exactly two.
fn pendant_pair<G: GraphView>(graph: &G) -> Option<(VertexId, VertexId)> {
    let mut pendants = graph.vertices().filter(|&v| graph.degree(v) == 1);
    let first = pendants.next()?;
    let second = pendants.next()?;
    match pendants.next() {
        Some(_) => None,
        None => Some((first, second)),
    }
}

/// Vertices adjacent to both `a` and `b`, in ascending id order.
pub fn common_neighbors<G: GraphView>(graph: &G, a: VertexId, b: VertexId) -> Vec<VertexId> {
    let mut around_a: Vec<VertexId> = graph.neighbors(a).collect();
    around_a.sort_unstable();
    let mut shared: Vec<VertexId> = graph
        .neighbors(b)
        .filter(|v| around_a.binary_search(v).is_ok())
        .collect();
    shared.sort_unstable();
    shared.dedup();
    shared
}
