//! Argument parsing and artifact helpers shared by the command handlers.

use std::fs;
use std::path::Path;

use miette::IntoDiagnostic;
use serde::Serialize;

use fsmp_engine::pipeline::{PipelineOptions, SolverChoice, SolverFailurePolicy};

use crate::types::OutputFormat;

pub(crate) fn parse_solver_choice(raw: &str) -> miette::Result<SolverChoice> {
    match raw {
        "float" => Ok(SolverChoice::Float),
        "exact" => Ok(SolverChoice::Exact),
        "portfolio" => Ok(SolverChoice::Portfolio),
        other => Err(miette::miette!(
            "Unknown solver: {other}. Use 'float', 'exact', or 'portfolio'."
        )),
    }
}

pub(crate) fn parse_failure_policy(raw: &str) -> miette::Result<SolverFailurePolicy> {
    match raw {
        "flag" => Ok(SolverFailurePolicy::Flag),
        "abort" => Ok(SolverFailurePolicy::Abort),
        other => Err(miette::miette!(
            "Unknown solver failure policy: {other}. Use 'flag' or 'abort'."
        )),
    }
}

pub(crate) fn parse_output_format(raw: &str) -> miette::Result<OutputFormat> {
    match raw {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(miette::miette!(
            "Unknown output format: {other}. Use 'text' or 'json'."
        )),
    }
}

/// Pipeline options for the scope flags shared by `verify` and `count`.
pub(crate) fn make_options(
    dimension: usize,
    faults: usize,
    solver: &str,
    anchor_reduction: bool,
    on_solver_failure: &str,
) -> miette::Result<PipelineOptions> {
    Ok(PipelineOptions {
        dimension,
        budget: faults,
        anchor_reduction,
        solver: parse_solver_choice(solver)?,
        on_solver_failure: parse_failure_policy(on_solver_failure)?,
        ..PipelineOptions::default()
    })
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> miette::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

pub(crate) fn write_json_artifact<T: Serialize>(path: &Path, value: &T) -> miette::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    fs::write(path, serde_json::to_string_pretty(value).into_diagnostic()?).into_diagnostic()?;
    Ok(())
}
