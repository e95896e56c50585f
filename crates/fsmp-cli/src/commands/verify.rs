// Command handler for: Verify

use std::path::PathBuf;

use serde_json::json;
use tracing::warn;

use fsmp_engine::pipeline::{verify_burnt_pancake, PipelineOptions};
use fsmp_engine::result::{VerificationReport, VerificationResult};

use super::helpers::{parse_output_format, print_json, write_json_artifact};
use crate::types::OutputFormat;

pub(crate) fn run_verify_command(
    options: PipelineOptions,
    format: &str,
    out: Option<PathBuf>,
) -> miette::Result<()> {
    let output_format = parse_output_format(format)?;
    let report = verify_burnt_pancake(&options).map_err(|e| miette::miette!("{e}"))?;
    let result = report.result();

    let artifact = json!({
        "schema_version": 1,
        "dimension": options.dimension,
        "solver_choice": options.solver,
        "anchor_reduction": options.anchor_reduction,
        "result": result.verdict_class(),
        "complete": report.is_complete(),
        "report": report,
    });
    match output_format {
        OutputFormat::Json => print_json(&artifact)?,
        OutputFormat::Text => print!("{}", render_text(&report, &result)),
    }
    if let Some(path) = out {
        write_json_artifact(&path, &artifact)?;
    }
    if !report.is_complete() {
        warn!(
            skipped = report.skipped,
            examined = report.examined,
            total = report.total,
            "run did not cover the rest of the enumeration"
        );
    }

    match result {
        VerificationResult::AllTrivial { .. } => Ok(()),
        VerificationResult::CounterexampleFound { counterexamples } => Err(miette::miette!(
            "found {} counterexample(s); first at fault set #{}",
            counterexamples.len(),
            counterexamples.first().map_or(0, |c| c.index)
        )),
        VerificationResult::Inconclusive { unverified } => Err(miette::miette!(
            "{} fault set(s) could not be decided by the {} backend",
            unverified.len(),
            report.solver
        )),
        VerificationResult::Incomplete { examined, total } => Err(miette::miette!(
            "run stopped early after {examined} of {total} fault sets; the result is incomplete"
        )),
    }
}

pub(crate) fn render_text(report: &VerificationReport, result: &VerificationResult) -> String {
    let mut text = String::new();
    match result {
        VerificationResult::AllTrivial { .. } => text.push_str("No counterexample found\n"),
        VerificationResult::CounterexampleFound { counterexamples } => {
            for counterexample in counterexamples {
                text.push_str(&format!("{counterexample}\n"));
            }
        }
        VerificationResult::Inconclusive { unverified } => {
            text.push_str("No counterexample found, but some fault sets are undecided\n");
            for entry in unverified {
                text.push_str(&format!(
                    "#{}  undecided: {}  ({})\n",
                    entry.index, entry.faults, entry.reason
                ));
            }
        }
        VerificationResult::Incomplete { examined, total } => text.push_str(&format!(
            "Incomplete: stopped after {examined} of {total} fault sets, \
             none of them a counterexample\n"
        )),
    }
    let counts = &report.counts;
    text.push_str(&format!(
        "examined {} of {} fault sets with {}: basic {}, conditionally basic {}, \
         fractional matching {}, counterexample {}, unverified {}\n",
        report.examined,
        report.total,
        report.solver,
        counts.basic,
        counts.conditionally_basic,
        counts.has_fractional_matching,
        counts.counterexample,
        counts.unverified
    ));
    text.push_str(&format!("fingerprint {}\n", report.reproducibility_fingerprint));
    text
}
