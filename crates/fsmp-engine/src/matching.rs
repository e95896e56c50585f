//! Fractional perfect matchings as linear feasibility programs.
//!
//! A fractional perfect matching assigns every edge a weight in `[0, 1]`
//! such that the weights around each vertex sum to exactly 1. Whether one
//! exists is decided by a [`FeasibilitySolver`]; an integral matching
//! algorithm would answer a different question and is never used here.

use thiserror::Error;

use fsmp_graph::{EdgeId, GraphView};
use fsmp_lp::{FeasibilityResult, FeasibilitySolver, LinearProgram, LpError, VarBounds};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    #[error("feasibility backend was inconclusive: {0}")]
    Inconclusive(String),
    #[error("feasibility backend failed: {0}")]
    Backend(String),
    #[error("malformed matching program: {0}")]
    Program(#[from] LpError),
}

/// Bijection between the live edges of a graph and LP variable indices,
/// in ascending edge-id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeIndex {
    edges: Vec<EdgeId>,
}

impl EdgeIndex {
    pub fn new<G: GraphView>(graph: &G) -> Self {
        let mut edges: Vec<EdgeId> = graph.edges().collect();
        edges.sort_unstable();
        Self { edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn variable(&self, edge: EdgeId) -> Option<usize> {
        self.edges.binary_search(&edge).ok()
    }

    pub fn edge(&self, variable: usize) -> Option<EdgeId> {
        self.edges.get(variable).copied()
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// Edge weights of a fractional perfect matching.
#[derive(Debug, Clone, PartialEq)]
pub struct FractionalMatching {
    pub weights: Vec<(EdgeId, f64)>,
}

impl FractionalMatching {
    pub fn weight(&self, edge: EdgeId) -> Option<f64> {
        self.weights
            .iter()
            .find(|(e, _)| *e == edge)
            .map(|(_, w)| *w)
    }

    /// Sum of all weights; half the number of vertices for a perfect one.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().map(|(_, w)| w).sum()
    }
}

/// One `[0, 1]` variable per live edge and one equality per live vertex:
/// the weights of its incident edges sum to 1. The objective is the total
/// weight.
pub fn fractional_matching_program<G: GraphView>(
    graph: &G,
) -> Result<(LinearProgram, EdgeIndex), MatchingError> {
    let index = EdgeIndex::new(graph);
    let mut program = LinearProgram::new(index.len());
    for var in 0..index.len() {
        program.set_bounds(var, VarBounds::UNIT)?;
    }
    for vertex in graph.vertices() {
        let terms = graph
            .incident_edges(vertex)
            .filter_map(|edge| index.variable(edge))
            .map(|var| (var, 1));
        program.add_equality(terms, 1)?;
    }
    program.set_objective(vec![1; index.len()])?;
    Ok((program, index))
}

/// A fractional perfect matching of `graph`, or `None` if there is none.
///
/// Graphs without vertices or with an isolated vertex are rejected without
/// consulting the solver.
pub fn fractional_perfect_matching<G, S>(
    graph: &G,
    solver: &S,
) -> Result<Option<FractionalMatching>, MatchingError>
where
    G: GraphView,
    S: FeasibilitySolver + ?Sized,
{
    if graph.vertex_count() == 0 || graph.vertices().any(|v| graph.degree(v) == 0) {
        return Ok(None);
    }
    let (program, index) = fractional_matching_program(graph)?;
    let result = solver
        .solve(&program)
        .map_err(|e| MatchingError::Backend(e.to_string()))?;
    match result {
        FeasibilityResult::Feasible(solution) => Ok(Some(FractionalMatching {
            weights: index
                .edges()
                .iter()
                .copied()
                .zip(solution.values)
                .collect(),
        })),
        FeasibilityResult::Infeasible => Ok(None),
        FeasibilityResult::Unknown(reason) => Err(MatchingError::Inconclusive(reason)),
    }
}

pub fn has_fractional_perfect_matching<G, S>(graph: &G, solver: &S) -> Result<bool, MatchingError>
where
    G: GraphView,
    S: FeasibilitySolver + ?Sized,
{
    fractional_perfect_matching(graph, solver).map(|matching| matching.is_some())
}
