//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Exhaustive check that every small fault set of a burnt pancake graph is \
    trivial or leaves a fractional perfect matching.\n\n\
    Typical session:\n  \
    1. fsmp graph --dimension 3\n  \
    2. fsmp count --dimension 3 --faults 4\n  \
    3. fsmp verify --dimension 3 --faults 4 --out report.json\n\n\
    Use --resume-from and --limit to split a run into shards.";

#[derive(Parser)]
#[command(name = "fsmp")]
#[command(about = "Fractional matching preclusion checker for burnt pancake graphs")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Classify every fault set of the given size
    Verify {
        /// Burnt pancake dimension n (the graph is B_n)
        #[arg(long, default_value_t = 3)]
        dimension: usize,

        /// Number of faulty vertices plus faulty edges
        #[arg(long, default_value_t = 4)]
        faults: usize,

        /// Feasibility backend: float | exact | portfolio
        #[arg(long, default_value = "portfolio")]
        solver: String,

        /// Global rank of the first fault set to examine
        #[arg(long, default_value_t = 0)]
        resume_from: u64,

        /// Examine at most this many fault sets
        #[arg(long)]
        limit: Option<u64>,

        /// Worker threads (defaults to one per core)
        #[arg(long)]
        threads: Option<usize>,

        /// Fault sets per parallel work unit
        #[arg(long, default_value_t = 4096)]
        chunk_size: u64,

        /// Enumerate every fault set instead of fixing a faulty identity vertex
        #[arg(long, default_value_t = false)]
        no_anchor_reduction: bool,

        /// Stop at the first counterexample
        #[arg(long, default_value_t = false)]
        stop_on_first: bool,

        /// Undecided fault sets: flag (record and continue) | abort
        #[arg(long, default_value = "flag")]
        on_solver_failure: String,

        /// Log progress every this many fault sets (0 disables)
        #[arg(long, default_value_t = 1000)]
        progress_every: u64,

        /// Wall-clock timeout in seconds (0 disables)
        #[arg(long, default_value_t = 0)]
        timeout: u64,

        /// Output format: text | json
        #[arg(long, default_value = "text")]
        format: String,

        /// Optional path to write the full report (JSON)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show how many fault sets a run would examine
    Count {
        /// Burnt pancake dimension n (the graph is B_n)
        #[arg(long, default_value_t = 3)]
        dimension: usize,

        /// Number of faulty vertices plus faulty edges
        #[arg(long, default_value_t = 4)]
        faults: usize,

        /// Count without fixing a faulty identity vertex
        #[arg(long, default_value_t = false)]
        no_anchor_reduction: bool,

        /// Output format: text | json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Describe the burnt pancake graph B_n
    Graph {
        /// Burnt pancake dimension n (the graph is B_n)
        #[arg(long, default_value_t = 3)]
        dimension: usize,

        /// Also list every edge
        #[arg(long, default_value_t = false)]
        edges: bool,

        /// Output format: text | json
        #[arg(long, default_value = "text")]
        format: String,
    },
}
