// Command handler for: Count

use fsmp_engine::enumerator::{AnchorPolicy, EnumerationPlan};
use fsmp_engine::pipeline::{plan_burnt_pancake, PipelineOptions};

use super::helpers::{parse_output_format, print_json};
use crate::types::OutputFormat;

pub(crate) fn run_count_command(
    dimension: usize,
    faults: usize,
    anchor_reduction: bool,
    format: &str,
) -> miette::Result<()> {
    let output_format = parse_output_format(format)?;
    let options = PipelineOptions {
        dimension,
        budget: faults,
        anchor_reduction,
        ..PipelineOptions::default()
    };
    let plan = plan_burnt_pancake(&options).map_err(|e| miette::miette!("{e}"))?;
    match output_format {
        OutputFormat::Json => print_json(&plan)?,
        OutputFormat::Text => print!("{}", render_plan(&plan)),
    }
    Ok(())
}

pub(crate) fn render_plan(plan: &EnumerationPlan) -> String {
    let mut text = format!(
        "{} faults over {} vertices and {} edges",
        plan.budget, plan.num_vertices, plan.num_edges
    );
    match plan.anchor {
        AnchorPolicy::Disabled => text.push_str(", no anchor\n"),
        AnchorPolicy::Assume(anchor) => text.push_str(&format!(", anchor {anchor}\n")),
    }
    for split in &plan.splits {
        text.push_str(&format!(
            "  {} edges + {} vertices{}: {} (from #{})\n",
            split.edge_faults,
            split.vertex_faults,
            if split.removes_anchor { " + anchor" } else { "" },
            split.count,
            split.first_index
        ));
    }
    text.push_str(&format!("total {}\n", plan.total));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_text_lists_every_split() {
        let plan = plan_burnt_pancake(&PipelineOptions {
            budget: 2,
            ..PipelineOptions::default()
        })
        .unwrap();
        let text = render_plan(&plan);
        assert!(text.starts_with("2 faults over 48 vertices and 72 edges, anchor v"));
        assert!(text.contains("  0 edges + 1 vertices + anchor: 47 (from #0)\n"));
        assert!(text.contains("  1 edges + 0 vertices + anchor: 72 (from #47)\n"));
        assert!(text.contains("  2 edges + 0 vertices: 2556 (from #119)\n"));
        assert!(text.ends_with("total 2675\n"));
    }
}
