//! `dg prune`: drop every node nothing depends on, except those kept.

use std::io::Write;

use clap::Args;
use depgraph_core::Graph;
use serde::Serialize;
use tracing::info;

use crate::manifest::DepGraph;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `dg prune`.
#[derive(Args, Debug, Default)]
pub struct PruneArgs {
    /// Root node to keep (repeatable).
    #[arg(long = "keep", value_name = "NODE")]
    pub keep: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PruneOutput {
    removed: Vec<String>,
    kept: Vec<String>,
    remaining: usize,
}

/// Execute `dg prune`.
pub fn run_prune(args: &PruneArgs, output: OutputMode, graph: &mut DepGraph) -> anyhow::Result<()> {
    let removed = graph.prune(&args.keep);
    info!(removed = removed.len(), "pruned unreferenced nodes");

    let payload = PruneOutput {
        removed,
        kept: args.keep.clone(),
        remaining: graph.size(),
    };
    render_mode(output, &payload, render_prune_text, render_prune_pretty)
}

fn render_prune_text(payload: &PruneOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for name in &payload.removed {
        writeln!(w, "{name}")?;
    }
    Ok(())
}

fn render_prune_pretty(payload: &PruneOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Pruned {} node(s)", payload.removed.len()))?;
    for name in &payload.removed {
        writeln!(w, "  - {name}")?;
    }
    writeln!(w)?;
    if !payload.kept.is_empty() {
        pretty_kv(w, "kept", payload.kept.join(", "))?;
    }
    pretty_kv(w, "remaining", payload.remaining.to_string())
}
