//! `dg remove`: drop a node and every dependency only it kept alive.
//!
//! Runs against the in-memory graph; the manifest file is never rewritten.

use std::io::Write;

use clap::Args;
use depgraph_core::Graph;
use serde::Serialize;
use tracing::info;

use super::require_node;
use crate::manifest::DepGraph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dg remove`.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Node to remove.
    pub node: String,
}

#[derive(Debug, Serialize)]
struct RemoveOutput {
    node: String,
    removed: Vec<String>,
    remaining: Vec<String>,
}

/// Execute `dg remove`.
pub fn run_remove(args: &RemoveArgs, output: OutputMode, graph: &mut DepGraph) -> anyhow::Result<()> {
    require_node(graph, &args.node)?;

    let removed = graph.remove_node(&args.node)?;
    info!(node = %args.node, cascade = removed.len().saturating_sub(1), "removed node");

    let payload = RemoveOutput {
        node: args.node.clone(),
        removed,
        remaining: graph.values().into_iter().cloned().collect(),
    };
    render_mode(output, &payload, render_remove_text, render_remove_pretty)
}

fn render_remove_text(payload: &RemoveOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for name in &payload.removed {
        writeln!(w, "{name}")?;
    }
    Ok(())
}

fn render_remove_pretty(payload: &RemoveOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Removing {}", payload.node))?;
    for name in &payload.removed {
        writeln!(w, "  - {name}")?;
    }
    writeln!(w)?;
    pretty_kv(w, "remaining", payload.remaining.join(", "))
}
