//! `dg paths`: every dependency chain from one node to another.

use std::io::Write;

use clap::Args;
use depgraph_core::{Graph, Path};
use serde::Serialize;

use super::require_node;
use crate::manifest::DepGraph;
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `dg paths`.
#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Dependent node the chains start from.
    pub from: String,

    /// Dependency node the chains end at.
    pub to: String,
}

#[derive(Debug, Serialize)]
struct PathsOutput {
    from: String,
    to: String,
    paths: Vec<Path<String>>,
}

/// Execute `dg paths`.
pub fn run_paths(args: &PathsArgs, output: OutputMode, graph: &DepGraph) -> anyhow::Result<()> {
    require_node(graph, &args.from)?;
    require_node(graph, &args.to)?;

    let payload = PathsOutput {
        from: args.from.clone(),
        to: args.to.clone(),
        paths: graph.get_paths(&args.from, &args.to)?,
    };
    render_mode(output, &payload, render_paths_text, render_paths_pretty)
}

fn render_paths_text(payload: &PathsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for path in &payload.paths {
        writeln!(w, "{path}")?;
    }
    Ok(())
}

fn render_paths_pretty(payload: &PathsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "Paths from {} to {} ({})",
            payload.from,
            payload.to,
            payload.paths.len()
        ),
    )?;
    if payload.paths.is_empty() {
        return writeln!(w, "  {} does not depend on {}", payload.from, payload.to);
    }
    for (idx, path) in payload.paths.iter().enumerate() {
        writeln!(w, "{:>4}. {path}", idx + 1)?;
    }
    Ok(())
}
