//! `dg up`: post-order walk, deepest dependencies first.

use std::io::Write;

use clap::Args;
use depgraph_core::Graph;
use serde::Serialize;

use crate::manifest::DepGraph;
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `dg up`.
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Node to start from.
    pub root: String,
}

#[derive(Debug, Serialize)]
struct UpOutput {
    root: String,
    visits: Vec<UpVisit>,
}

#[derive(Debug, Serialize)]
struct UpVisit {
    origin: String,
    destination: String,
    kind: String,
    depth: usize,
}

/// Execute `dg up`.
pub fn run_up(args: &UpArgs, output: OutputMode, graph: &DepGraph) -> anyhow::Result<()> {
    let mut visits = Vec::new();
    graph.traverse_up(&args.root, |origin, destination, kind, depth| {
        visits.push(UpVisit {
            origin: origin.clone(),
            destination: destination.clone(),
            kind: kind.clone(),
            depth,
        });
    })?;

    let payload = UpOutput {
        root: args.root.clone(),
        visits,
    };
    render_mode(output, &payload, render_up_text, render_up_pretty)
}

fn render_up_text(payload: &UpOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for visit in &payload.visits {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            visit.depth, visit.origin, visit.destination, visit.kind
        )?;
    }
    Ok(())
}

fn render_up_pretty(payload: &UpOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Bottom-up walk from {}", payload.root))?;
    for (idx, visit) in payload.visits.iter().enumerate() {
        writeln!(
            w,
            "{:>4}. {} -> {} ({}, depth {})",
            idx + 1,
            visit.origin,
            visit.destination,
            visit.kind,
            visit.depth
        )?;
    }
    Ok(())
}
