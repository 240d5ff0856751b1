//! `dg nodes`: list every declared node in manifest order.

use std::io::Write;

use clap::Args;
use depgraph_core::Graph;
use serde::Serialize;

use crate::manifest::DepGraph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dg nodes`.
#[derive(Args, Debug, Default)]
pub struct NodesArgs {}

#[derive(Debug, Serialize)]
struct NodesOutput {
    count: usize,
    edges: usize,
    nodes: Vec<NodeRow>,
}

#[derive(Debug, Serialize)]
struct NodeRow {
    name: String,
    dependencies: usize,
    dependents: usize,
}

/// Execute `dg nodes`.
pub fn run_nodes(_args: &NodesArgs, output: OutputMode, graph: &DepGraph) -> anyhow::Result<()> {
    let nodes = graph
        .values()
        .into_iter()
        .map(|name| NodeRow {
            name: name.clone(),
            dependencies: graph.outbound_edges(name).map_or(0, |e| e.len()),
            dependents: graph.inbound_edges(name).map_or(0, |e| e.len()),
        })
        .collect();
    let payload = NodesOutput {
        count: graph.size(),
        edges: graph.edge_count(),
        nodes,
    };

    render_mode(output, &payload, render_nodes_text, render_nodes_pretty)
}

fn render_nodes_text(payload: &NodesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for node in &payload.nodes {
        writeln!(w, "{}\t{}\t{}", node.name, node.dependencies, node.dependents)?;
    }
    Ok(())
}

fn render_nodes_pretty(payload: &NodesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Nodes ({})", payload.count))?;
    for node in &payload.nodes {
        writeln!(
            w,
            "  {:<32} {:>3} deps  {:>3} dependents",
            node.name, node.dependencies, node.dependents
        )?;
    }
    writeln!(w)?;
    pretty_kv(w, "edges", payload.edges.to_string())
}
