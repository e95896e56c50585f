mod cli;
mod commands;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            dimension,
            faults,
            solver,
            resume_from,
            limit,
            threads,
            chunk_size,
            no_anchor_reduction,
            stop_on_first,
            on_solver_failure,
            progress_every,
            timeout,
            format,
            out,
        } => {
            let options = commands::helpers::make_options(
                dimension,
                faults,
                &solver,
                !no_anchor_reduction,
                &on_solver_failure,
            )?;
            commands::verify::run_verify_command(
                fsmp_engine::pipeline::PipelineOptions {
                    resume_from,
                    limit,
                    threads,
                    chunk_size,
                    stop_on_first,
                    progress_every,
                    timeout_secs: timeout,
                    ..options
                },
                &format,
                out,
            )?;
        }
        Commands::Count {
            dimension,
            faults,
            no_anchor_reduction,
            format,
        } => {
            commands::count::run_count_command(dimension, faults, !no_anchor_reduction, &format)?;
        }
        Commands::Graph {
            dimension,
            edges,
            format,
        } => {
            commands::graph::run_graph_command(dimension, edges, &format)?;
        }
    }

    Ok(())
}
