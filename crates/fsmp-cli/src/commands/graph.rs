// Command handler for: Graph

use serde::Serialize;

use fsmp_graph::symmetry::has_transitivity_witness;
use fsmp_graph::{burnt_pancake_graph, PancakeGraph, SignedPermutation};

use super::helpers::{parse_output_format, print_json};
use crate::types::OutputFormat;

#[derive(Debug, Serialize)]
pub(crate) struct GraphDescription {
    pub dimension: usize,
    pub vertices: usize,
    pub edges: usize,
    pub regular_degree: Option<usize>,
    pub identity: String,
    pub transitivity_witness: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_list: Option<Vec<(String, String)>>,
}

pub(crate) fn describe_graph(
    dimension: usize,
    list_edges: bool,
) -> miette::Result<GraphDescription> {
    let graph: PancakeGraph = burnt_pancake_graph(dimension).map_err(|e| miette::miette!("{e}"))?;
    let identity = SignedPermutation::identity(dimension).map_err(|e| miette::miette!("{e}"))?;
    let transitivity_witness = graph
        .vertex_id(&identity)
        .is_some_and(|anchor| has_transitivity_witness(&graph, anchor));
    let edge_list: Option<Vec<(String, String)>> = list_edges.then(|| {
        graph
            .edge_list()
            .iter()
            .map(|edge| (graph.label(edge.u).to_string(), graph.label(edge.v).to_string()))
            .collect()
    });
    Ok(GraphDescription {
        dimension,
        vertices: graph.num_vertices(),
        edges: graph.num_edges(),
        regular_degree: graph.regular_degree(),
        identity: identity.to_string(),
        transitivity_witness,
        edge_list,
    })
}

pub(crate) fn run_graph_command(dimension: usize, edges: bool, format: &str) -> miette::Result<()> {
    let output_format = parse_output_format(format)?;
    let description = describe_graph(dimension, edges)?;
    match output_format {
        OutputFormat::Json => print_json(&description)?,
        OutputFormat::Text => print!("{}", render_text(&description)),
    }
    Ok(())
}

fn render_text(description: &GraphDescription) -> String {
    let degree = description
        .regular_degree
        .map_or_else(|| "irregular".to_string(), |d| format!("{d}-regular"));
    let witness = if description.transitivity_witness {
        "found"
    } else {
        "missing"
    };
    let mut text = format!(
        "B_{}: {} vertices, {} edges, {}\ntransitivity witness from {}: {}\n",
        description.dimension,
        description.vertices,
        description.edges,
        degree,
        description.identity,
        witness
    );
    for (u, v) in description.edge_list.iter().flatten() {
        text.push_str(&format!("{u} -- {v}\n"));
    }
    text
}
