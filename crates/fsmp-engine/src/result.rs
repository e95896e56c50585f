use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

use fsmp_graph::{FaultSet, Graph};

use crate::pipeline::{EngineError, RunOptions};

/// Outcome of the predicate pipeline for one fault set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Basic,
    ConditionallyBasic,
    HasFractionalMatching,
    /// Non-trivial and no fractional perfect matching.
    Counterexample,
}

impl Verdict {
    pub fn is_trivial(self) -> bool {
        matches!(self, Verdict::Basic | Verdict::ConditionallyBasic)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Basic => "basic",
            Verdict::ConditionallyBasic => "conditionally basic",
            Verdict::HasFractionalMatching => "has fractional perfect matching",
            Verdict::Counterexample => "counterexample",
        };
        f.write_str(s)
    }
}

/// Per-verdict tallies. Fault sets the solver could not decide are counted
/// under `unverified` and under no verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub basic: u64,
    pub conditionally_basic: u64,
    pub has_fractional_matching: u64,
    pub counterexample: u64,
    pub unverified: u64,
}

impl VerdictCounts {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Basic => self.basic += 1,
            Verdict::ConditionallyBasic => self.conditionally_basic += 1,
            Verdict::HasFractionalMatching => self.has_fractional_matching += 1,
            Verdict::Counterexample => self.counterexample += 1,
        }
    }

    pub fn merge(&mut self, other: &VerdictCounts) {
        self.basic += other.basic;
        self.conditionally_basic += other.conditionally_basic;
        self.has_fractional_matching += other.has_fractional_matching;
        self.counterexample += other.counterexample;
        self.unverified += other.unverified;
    }

    /// Fault sets that went through the pipeline, decided or not.
    pub fn examined(&self) -> u64 {
        self.basic
            + self.conditionally_basic
            + self.has_fractional_matching
            + self.counterexample
            + self.unverified
    }
}

/// A non-trivial fault set that leaves no fractional perfect matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counterexample {
    pub index: u64,
    pub faults: FaultSet,
    pub removed_vertices: Vec<String>,
    pub removed_edges: Vec<(String, String)>,
}

impl Counterexample {
    pub fn describe<L: fmt::Display>(graph: &Graph<L>, index: u64, faults: &FaultSet) -> Self {
        let removed_vertices = faults
            .vertices()
            .iter()
            .map(|&v| graph.label(v).to_string())
            .collect();
        let removed_edges = faults
            .edges()
            .iter()
            .map(|&e| {
                let edge = graph.edge(e);
                (
                    graph.label(edge.u).to_string(),
                    graph.label(edge.v).to_string(),
                )
            })
            .collect();
        Self {
            index,
            faults: faults.clone(),
            removed_vertices,
            removed_edges,
        }
    }
}

impl fmt::Display for Counterexample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: Vec<String> = self
            .removed_edges
            .iter()
            .map(|(u, v)| format!("{{{u}, {v}}}"))
            .collect();
        write!(
            f,
            "#{}  vertices: [{}]  edges: [{}]",
            self.index,
            self.removed_vertices.join(", "),
            edges.join(", ")
        )
    }
}

/// A fault set whose matching question the backend could not settle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnverifiedFaultSet {
    pub index: u64,
    pub faults: FaultSet,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub vertices: usize,
    pub edges: usize,
    pub regular_degree: Option<usize>,
}

impl GraphSummary {
    pub fn of<L>(graph: &Graph<L>) -> Self {
        Self {
            vertices: graph.num_vertices(),
            edges: graph.num_edges(),
            regular_degree: graph.regular_degree(),
        }
    }
}

/// Everything a verification run produced.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub graph: GraphSummary,
    pub solver: String,
    pub options: RunOptions,
    /// Size of the whole enumeration.
    pub total: u64,
    /// Fault sets before `resume_from`.
    pub skipped: u64,
    pub examined: u64,
    pub counts: VerdictCounts,
    pub counterexamples: Vec<Counterexample>,
    pub unverified: Vec<UnverifiedFaultSet>,
    pub stopped_early: bool,
    pub elapsed_ms: u64,
    pub reproducibility_fingerprint: String,
}

impl VerificationReport {
    pub fn result(&self) -> VerificationResult {
        if !self.counterexamples.is_empty() {
            VerificationResult::CounterexampleFound {
                counterexamples: self.counterexamples.clone(),
            }
        } else if !self.unverified.is_empty() {
            VerificationResult::Inconclusive {
                unverified: self.unverified.clone(),
            }
        } else if self.stopped_early {
            VerificationResult::Incomplete {
                examined: self.examined,
                total: self.total,
            }
        } else {
            VerificationResult::AllTrivial {
                examined: self.examined,
            }
        }
    }

    /// True iff the run covered the enumeration from `skipped` to the end.
    pub fn is_complete(&self) -> bool {
        !self.stopped_early && self.skipped + self.examined == self.total
    }
}

/// Overall verdict of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum VerificationResult {
    /// Every examined fault set was trivial or left a fractional perfect
    /// matching.
    AllTrivial { examined: u64 },
    /// Takes precedence over undecided fault sets.
    CounterexampleFound {
        counterexamples: Vec<Counterexample>,
    },
    Inconclusive { unverified: Vec<UnverifiedFaultSet> },
    /// Nothing found, but the run stopped (timeout) before its scope ended.
    Incomplete { examined: u64, total: u64 },
}

impl VerificationResult {
    /// Machine-readable verdict class for reproducibility checks.
    ///
    /// Depends only on the variant, so two runs over the same input and
    /// options can be compared by this string alone.
    pub fn verdict_class(&self) -> &'static str {
        match self {
            VerificationResult::AllTrivial { .. } => "all_trivial",
            VerificationResult::CounterexampleFound { .. } => "counterexample_found",
            VerificationResult::Inconclusive { .. } => "inconclusive",
            VerificationResult::Incomplete { .. } => "incomplete",
        }
    }
}

/// Compute lowercase hex SHA-256 digest for arbitrary bytes.
pub(crate) fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes.as_ref());
    format!("{:x}", hasher.finalize())
}

/// Deterministic fingerprint over graph shape, run scope, and the ordered
/// indices of every counterexample and undecided fault set.
///
/// Thread count, chunk size and timing are not part of it.
pub(crate) fn reproducibility_fingerprint(
    graph: &GraphSummary,
    options: &RunOptions,
    counterexamples: &[Counterexample],
    unverified: &[UnverifiedFaultSet],
) -> Result<String, EngineError> {
    let payload = serde_json::json!({
        "graph": graph,
        "budget": options.budget,
        "anchor": options.anchor,
        "resume_from": options.resume_from,
        "limit": options.limit,
        "counterexamples": counterexamples.iter().map(|c| c.index).collect::<Vec<_>>(),
        "unverified": unverified.iter().map(|u| u.index).collect::<Vec<_>>(),
    });
    let serialized = serde_json::to_vec(&payload).map_err(|e| {
        EngineError::Serialization(format!(
            "failed to serialize reproducibility payload: {e}"
        ))
    })?;
    Ok(sha256_hex(serialized))
}
