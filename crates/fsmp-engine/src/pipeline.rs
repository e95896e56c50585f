//! Predicate pipeline and parallel verification driver.
//!
//! Each fault set is applied to the immutable base graph and run through
//! the triviality predicates; only non-trivial survivors reach the LP
//! backend. The enumeration is cut into rank-contiguous chunks that rayon
//! workers seek to independently, and chunk outcomes are merged in rank
//! order so a report does not depend on scheduling.

use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use fsmp_graph::symmetry::has_transitivity_witness;
use fsmp_graph::{
    burnt_pancake_graph, classify, FaultSet, Graph, GraphError, PancakeGraph, SignedPermutation,
    Triviality, MAX_DIMENSION,
};
use fsmp_lp::{ExactSimplex, FeasibilitySolver, FloatSimplex, PortfolioSolver};

use crate::enumerator::{AnchorPolicy, EnumerationPlan, FaultSetEnumerator};
use crate::matching::{has_fractional_perfect_matching, MatchingError};
use crate::result::{
    reproducibility_fingerprint, Counterexample, GraphSummary, UnverifiedFaultSet, Verdict,
    VerdictCounts, VerificationReport,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
    #[error(
        "enumerating {budget} faults over {vertices} vertices and {edges} edges overflows a 64-bit rank"
    )]
    EnumerationTooLarge {
        budget: usize,
        vertices: usize,
        edges: usize,
    },
    #[error("anchor reduction unsupported: {0}")]
    AnchorReductionUnsupported(String),
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),
    #[error("solver failed on fault set #{index}: {reason}")]
    SolverFailure { index: u64, reason: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Which feasibility backend answers the matching programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverChoice {
    Float,
    Exact,
    /// Float simplex, with every non-feasible answer confirmed exactly.
    #[default]
    Portfolio,
}

impl fmt::Display for SolverChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolverChoice::Float => "float",
            SolverChoice::Exact => "exact",
            SolverChoice::Portfolio => "portfolio",
        })
    }
}

/// What to do when the backend cannot decide a fault set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverFailurePolicy {
    /// Record the fault set as unverified and keep going.
    #[default]
    Flag,
    /// Stop the run with [`EngineError::SolverFailure`].
    Abort,
}

/// Options for [`run_verification`] over an arbitrary graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOptions {
    pub budget: usize,
    pub anchor: AnchorPolicy,
    /// Global rank of the first fault set to examine.
    pub resume_from: u64,
    /// Examine at most this many fault sets.
    pub limit: Option<u64>,
    /// Worker threads; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    pub chunk_size: u64,
    pub stop_on_first: bool,
    pub on_solver_failure: SolverFailurePolicy,
    /// Log progress every this many fault sets; 0 disables it.
    pub progress_every: u64,
    /// Wall-clock budget in seconds; 0 means unlimited.
    pub timeout_secs: u64,
}

impl RunOptions {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            anchor: AnchorPolicy::Disabled,
            resume_from: 0,
            limit: None,
            threads: None,
            chunk_size: 4096,
            stop_on_first: false,
            on_solver_failure: SolverFailurePolicy::Flag,
            progress_every: 1000,
            timeout_secs: 0,
        }
    }

    fn validate<L>(&self, graph: &Graph<L>) -> Result<(), EngineError> {
        if self.budget == 0 {
            return Err(EngineError::Config(
                "fault budget must be at least 1".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(EngineError::Config("chunk size must be at least 1".into()));
        }
        if self.threads == Some(0) {
            return Err(EngineError::Config(
                "thread count must be at least 1".into(),
            ));
        }
        if let AnchorPolicy::Assume(anchor) = self.anchor {
            if !graph.contains_vertex(anchor) {
                return Err(EngineError::Config(format!(
                    "anchor {anchor} is not a vertex of the graph"
                )));
            }
            if graph.regular_degree().is_none() {
                return Err(EngineError::AnchorReductionUnsupported(
                    "graph is not regular, so it cannot be vertex-transitive".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Options for [`verify_burnt_pancake`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOptions {
    pub dimension: usize,
    pub budget: usize,
    /// Assume the identity vertex is faulty whenever a vertex is.
    pub anchor_reduction: bool,
    pub solver: SolverChoice,
    pub resume_from: u64,
    pub limit: Option<u64>,
    pub threads: Option<usize>,
    pub chunk_size: u64,
    pub stop_on_first: bool,
    pub on_solver_failure: SolverFailurePolicy,
    pub progress_every: u64,
    pub timeout_secs: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        let run = RunOptions::new(4);
        Self {
            dimension: 3,
            budget: run.budget,
            anchor_reduction: true,
            solver: SolverChoice::default(),
            resume_from: run.resume_from,
            limit: run.limit,
            threads: run.threads,
            chunk_size: run.chunk_size,
            stop_on_first: run.stop_on_first,
            on_solver_failure: run.on_solver_failure,
            progress_every: run.progress_every,
            timeout_secs: run.timeout_secs,
        }
    }
}

impl PipelineOptions {
    fn validate(&self) -> Result<(), EngineError> {
        if self.dimension == 0 || self.dimension > MAX_DIMENSION {
            return Err(EngineError::Config(format!(
                "dimension must be between 1 and {MAX_DIMENSION}, got {}",
                self.dimension
            )));
        }
        if self.budget == 0 {
            return Err(EngineError::Config(
                "fault budget must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn run_options(&self, anchor: AnchorPolicy) -> RunOptions {
        RunOptions {
            budget: self.budget,
            anchor,
            resume_from: self.resume_from,
            limit: self.limit,
            threads: self.threads,
            chunk_size: self.chunk_size,
            stop_on_first: self.stop_on_first,
            on_solver_failure: self.on_solver_failure,
            progress_every: self.progress_every,
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Classify one fault set: trivial first, then matching feasibility.
pub fn evaluate_fault_set<L, S>(
    base: &Graph<L>,
    faults: &FaultSet,
    solver: &S,
) -> Result<Verdict, MatchingError>
where
    S: FeasibilitySolver + ?Sized,
{
    let faulted = base.with_faults(faults);
    match classify(&faulted) {
        Triviality::Basic => Ok(Verdict::Basic),
        Triviality::ConditionallyBasic => Ok(Verdict::ConditionallyBasic),
        Triviality::NonTrivial => {
            if has_fractional_perfect_matching(&faulted, solver)? {
                Ok(Verdict::HasFractionalMatching)
            } else {
                Ok(Verdict::Counterexample)
            }
        }
    }
}

#[derive(Debug, Default)]
struct ChunkOutcome {
    counts: VerdictCounts,
    counterexamples: Vec<Counterexample>,
    unverified: Vec<UnverifiedFaultSet>,
    failure: Option<(u64, String)>,
}

/// Shared, advisory run state. Nothing here feeds into results.
struct RunControl {
    progress: AtomicU64,
    stop: AtomicBool,
    deadline: Option<Instant>,
    timed_out: AtomicBool,
}

impl RunControl {
    fn should_stop(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            self.timed_out.store(true, Ordering::Relaxed);
            self.stop.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }
}

/// Run the pipeline over every fault set in `options`' scope.
pub fn run_verification<L, S>(
    graph: &Graph<L>,
    solver: &S,
    options: &RunOptions,
) -> Result<VerificationReport, EngineError>
where
    L: fmt::Display + Sync,
    S: FeasibilitySolver,
{
    options.validate(graph)?;
    let started = Instant::now();
    let enumerator = FaultSetEnumerator::for_graph(graph, options.budget, options.anchor)?;
    let total = enumerator.total();
    let start = options.resume_from.min(total);
    let end = options
        .limit
        .map_or(total, |limit| start.saturating_add(limit).min(total));

    let chunks: Vec<(u64, u64)> = (start..end)
        .step_by(usize::try_from(options.chunk_size).unwrap_or(usize::MAX))
        .map(|lo| (lo, lo.saturating_add(options.chunk_size).min(end)))
        .collect();
    info!(
        total,
        start,
        end,
        chunks = chunks.len(),
        backend = solver.name(),
        "starting fault-set enumeration"
    );

    let control = RunControl {
        progress: AtomicU64::new(0),
        stop: AtomicBool::new(false),
        deadline: overall_deadline(options.timeout_secs),
        timed_out: AtomicBool::new(false),
    };

    let run_chunk = |&(lo, hi): &(u64, u64)| -> ChunkOutcome {
        let mut outcome = ChunkOutcome::default();
        for item in enumerator.iter_from(lo).take_while(|item| item.index < hi) {
            if control.should_stop() {
                break;
            }
            match evaluate_fault_set(graph, &item.faults, solver) {
                Ok(verdict) => {
                    outcome.counts.record(verdict);
                    if verdict == Verdict::Counterexample {
                        warn!(index = item.index, faults = %item.faults, "counterexample found");
                        outcome
                            .counterexamples
                            .push(Counterexample::describe(graph, item.index, &item.faults));
                        if options.stop_on_first {
                            control.stop.store(true, Ordering::Relaxed);
                        }
                    }
                }
                Err(err) => match options.on_solver_failure {
                    SolverFailurePolicy::Flag => {
                        debug!(index = item.index, error = %err, "fault set left unverified");
                        outcome.counts.unverified += 1;
                        outcome.unverified.push(UnverifiedFaultSet {
                            index: item.index,
                            faults: item.faults,
                            reason: err.to_string(),
                        });
                    }
                    SolverFailurePolicy::Abort => {
                        outcome.failure = Some((item.index, err.to_string()));
                        control.stop.store(true, Ordering::Relaxed);
                        break;
                    }
                },
            }

            let done = control.progress.fetch_add(1, Ordering::Relaxed) + 1;
            if options.progress_every > 0 && done % options.progress_every == 0 {
                let tested = start + done;
                info!(
                    "Tested {tested} combos so far... ({:.2}%)",
                    100.0 * tested as f64 / total as f64
                );
            }
        }
        outcome
    };

    let outcomes: Vec<ChunkOutcome> = match options.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?
            .install(|| chunks.par_iter().map(&run_chunk).collect()),
        None => chunks.par_iter().map(&run_chunk).collect(),
    };

    let mut counts = VerdictCounts::default();
    let mut counterexamples = Vec::new();
    let mut unverified = Vec::new();
    let mut failure: Option<(u64, String)> = None;
    for outcome in outcomes {
        counts.merge(&outcome.counts);
        counterexamples.extend(outcome.counterexamples);
        unverified.extend(outcome.unverified);
        if let Some((index, reason)) = outcome.failure {
            if failure.as_ref().map_or(true, |(first, _)| index < *first) {
                failure = Some((index, reason));
            }
        }
    }
    if let Some((index, reason)) = failure {
        return Err(EngineError::SolverFailure { index, reason });
    }
    counterexamples.sort_by_key(|c| c.index);
    unverified.sort_by_key(|u| u.index);

    let examined = counts.examined();
    let stopped_early = start + examined < end;
    if control.timed_out.load(Ordering::Relaxed) {
        warn!(examined, "timeout reached before the enumeration finished");
    }
    info!(
        examined,
        counterexamples = counterexamples.len(),
        unverified = unverified.len(),
        "Completed"
    );

    let summary = GraphSummary::of(graph);
    let reproducibility_fingerprint =
        reproducibility_fingerprint(&summary, options, &counterexamples, &unverified)?;
    Ok(VerificationReport {
        graph: summary,
        solver: solver.name().to_string(),
        options: options.clone(),
        total,
        skipped: start,
        examined,
        counts,
        counterexamples,
        unverified,
        stopped_early,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        reproducibility_fingerprint,
    })
}

fn overall_deadline(timeout_secs: u64) -> Option<Instant> {
    if timeout_secs == 0 {
        None
    } else {
        Instant::now().checked_add(Duration::from_secs(timeout_secs))
    }
}

/// Anchor for `B_n`: the identity vertex, once a transitivity witness
/// confirms that fixing it loses no generality.
fn burnt_pancake_anchor(
    graph: &PancakeGraph,
    options: &PipelineOptions,
) -> Result<AnchorPolicy, EngineError> {
    if !options.anchor_reduction {
        return Ok(AnchorPolicy::Disabled);
    }
    let identity = SignedPermutation::identity(options.dimension)?;
    let anchor = graph.vertex_id(&identity).ok_or_else(|| {
        EngineError::AnchorReductionUnsupported(format!("identity {identity} is missing"))
    })?;
    if !has_transitivity_witness(graph, anchor) {
        return Err(EngineError::AnchorReductionUnsupported(format!(
            "no automorphism witness maps {identity} to every vertex"
        )));
    }
    debug!(%identity, "transitivity witness checked");
    Ok(AnchorPolicy::Assume(anchor))
}

/// The enumeration a [`verify_burnt_pancake`] run with these options walks.
pub fn plan_burnt_pancake(options: &PipelineOptions) -> Result<EnumerationPlan, EngineError> {
    options.validate()?;
    let graph = burnt_pancake_graph(options.dimension)?;
    let anchor = burnt_pancake_anchor(&graph, options)?;
    EnumerationPlan::new(
        graph.num_vertices(),
        graph.num_edges(),
        options.budget,
        anchor,
    )
}

/// Verify the fault-set claim on the burnt pancake graph `B_n`.
///
/// With anchor reduction on, the identity vertex is the anchor, and the
/// reduction is only used after checking that every vertex is the image of
/// the anchor under some automorphism.
pub fn verify_burnt_pancake(options: &PipelineOptions) -> Result<VerificationReport, EngineError> {
    options.validate()?;
    let graph = burnt_pancake_graph(options.dimension)?;
    info!(
        dimension = options.dimension,
        vertices = graph.num_vertices(),
        edges = graph.num_edges(),
        "built burnt pancake graph"
    );
    let anchor = burnt_pancake_anchor(&graph, options)?;

    let run = options.run_options(anchor);
    match options.solver {
        SolverChoice::Float => run_verification(&graph, &FloatSimplex::new(), &run),
        SolverChoice::Exact => run_verification(&graph, &ExactSimplex::new(), &run),
        SolverChoice::Portfolio => {
            let solver = PortfolioSolver::new(FloatSimplex::new(), ExactSimplex::new());
            run_verification(&graph, &solver, &run)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsmp_graph::{EdgeId, VertexId};

    fn cycle(n: u32) -> Graph<u32> {
        let edges: Vec<(u32, u32)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        Graph::from_edge_list(n, &edges).unwrap()
    }

    #[test]
    fn zero_budget_is_rejected() {
        let err =
            run_verification(&cycle(4), &FloatSimplex::new(), &RunOptions::new(0)).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn anchor_on_irregular_graph_is_rejected() {
        let path = Graph::from_edge_list(3, &[(0, 1), (1, 2)]).unwrap();
        let mut options = RunOptions::new(1);
        options.anchor = AnchorPolicy::Assume(VertexId(0));
        let err = run_verification(&path, &FloatSimplex::new(), &options).unwrap_err();
        assert!(matches!(err, EngineError::AnchorReductionUnsupported(_)));
    }

    #[test]
    fn cycle_faults_are_classified() {
        let c6 = cycle(6);
        let solver = FloatSimplex::new();
        // Removing a vertex leaves P5, which has an odd number of vertices.
        assert_eq!(
            evaluate_fault_set(&c6, &FaultSet::from_vertices([VertexId(0)]), &solver),
            Ok(Verdict::Counterexample)
        );
        // Removing an edge leaves P6.
        assert_eq!(
            evaluate_fault_set(&c6, &FaultSet::from_edges([EdgeId(0)]), &solver),
            Ok(Verdict::HasFractionalMatching)
        );
        // Removing two edges at vertex 0 isolates it.
        assert_eq!(
            evaluate_fault_set(
                &c6,
                &FaultSet::from_edges([EdgeId(0), EdgeId(5)]),
                &solver
            ),
            Ok(Verdict::Basic)
        );
    }

    #[test]
    fn limit_and_resume_bound_the_scope() {
        let mut options = RunOptions::new(1);
        options.resume_from = 3;
        options.limit = Some(4);
        options.chunk_size = 3;
        let report = run_verification(&cycle(6), &FloatSimplex::new(), &options).unwrap();
        assert_eq!(report.total, 12);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.examined, 4);
        assert!(!report.stopped_early);
        assert!(!report.is_complete());
        let indices: Vec<u64> = report.counterexamples.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![3, 4, 5]);
    }

    #[test]
    fn default_pipeline_options() {
        let options = PipelineOptions::default();
        assert_eq!(options.dimension, 3);
        assert_eq!(options.budget, 4);
        assert!(options.anchor_reduction);
        assert_eq!(options.solver, SolverChoice::Portfolio);
        assert_eq!(options.on_solver_failure, SolverFailurePolicy::Flag);
    }

    #[test]
    fn burnt_pancake_plan_follows_anchor_choice() {
        let reduced = plan_burnt_pancake(&PipelineOptions::default()).unwrap();
        assert_eq!(reduced.total, 1_302_609);
        assert!(matches!(reduced.anchor, AnchorPolicy::Assume(_)));

        let full = plan_burnt_pancake(&PipelineOptions {
            budget: 1,
            anchor_reduction: false,
            ..PipelineOptions::default()
        })
        .unwrap();
        assert_eq!(full.anchor, AnchorPolicy::Disabled);
        assert_eq!(full.total, 48 + 72);
    }

    #[test]
    fn invalid_dimension_is_a_config_error() {
        let options = PipelineOptions {
            dimension: MAX_DIMENSION + 1,
            ..PipelineOptions::default()
        };
        assert!(matches!(
            verify_burnt_pancake(&options),
            Err(EngineError::Config(_))
        ));
    }
}
