//! `dg edges`: outbound (dependencies) or inbound (dependents) edges of one
//! node.

use std::io::Write;

use clap::Args;
use depgraph_core::{Edge, Graph};
use serde::Serialize;

use super::require_node;
use crate::manifest::DepGraph;
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `dg edges`.
#[derive(Args, Debug)]
pub struct EdgesArgs {
    /// Node to inspect.
    pub node: String,

    /// List dependents (inbound edges) instead of dependencies.
    #[arg(long)]
    pub inbound: bool,
}

#[derive(Debug, Serialize)]
struct EdgesOutput {
    node: String,
    direction: &'static str,
    edges: Vec<Edge<String, String>>,
}

/// Execute `dg edges`.
pub fn run_edges(args: &EdgesArgs, output: OutputMode, graph: &DepGraph) -> anyhow::Result<()> {
    require_node(graph, &args.node)?;

    let edges = if args.inbound {
        graph.inbound_edges(&args.node)
    } else {
        graph.outbound_edges(&args.node)
    };
    let payload = EdgesOutput {
        node: args.node.clone(),
        direction: if args.inbound { "inbound" } else { "outbound" },
        edges: edges.unwrap_or_default(),
    };

    render_mode(output, &payload, render_edges_text, render_edges_pretty)
}

fn render_edges_text(payload: &EdgesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for edge in &payload.edges {
        writeln!(w, "{}\t{}\t{}", edge.origin(), edge.destination(), edge.value())?;
    }
    Ok(())
}

fn render_edges_pretty(payload: &EdgesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let heading = if payload.direction == "inbound" {
        format!("Dependents of {}", payload.node)
    } else {
        format!("Dependencies of {}", payload.node)
    };
    pretty_section(w, &heading)?;
    if payload.edges.is_empty() {
        return writeln!(w, "  (none)");
    }
    for edge in &payload.edges {
        writeln!(w, "  {edge}")?;
    }
    Ok(())
}
