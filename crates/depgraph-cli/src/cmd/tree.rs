//! `dg tree`: pre-order walk of everything a node depends on.

use std::io::Write;

use clap::Args;
use depgraph_core::{Edge, EdgeFilter, Graph};
use serde::Serialize;

use crate::manifest::DepGraph;
use crate::output::{OutputMode, render_mode};

/// Arguments for `dg tree`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Node to start from.
    pub root: String,

    /// Show each dependency once, at its first occurrence.
    #[arg(long)]
    pub once: bool,

    /// Only follow edges of this kind (repeatable).
    #[arg(long = "kind", value_name = "KIND")]
    pub kinds: Vec<String>,

    /// Only follow edges whose kind matches the edge used to reach the node.
    #[arg(long)]
    pub same_kind: bool,

    /// Stop descending below this depth.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TreeOutput {
    root: String,
    visits: Vec<Visit>,
}

#[derive(Debug, Serialize)]
struct Visit {
    origin: String,
    destination: String,
    kind: String,
    depth: usize,
    last: bool,
}

/// Execute `dg tree`.
pub fn run_tree(args: &TreeArgs, output: OutputMode, graph: &DepGraph) -> anyhow::Result<()> {
    let kinds = &args.kinds;
    let same_kind = args.same_kind;
    let filter = |edge: &Edge<String, String>, entry: Option<&Edge<String, String>>| {
        (kinds.is_empty() || kinds.contains(edge.value()))
            && (!same_kind || entry.is_none_or(|entry| entry.value() == edge.value()))
    };
    let edge_filter = (!kinds.is_empty() || same_kind)
        .then_some(&filter as &EdgeFilter<'_, String, String>);

    let mut visits = Vec::new();
    graph.traverse(&args.root, args.once, edge_filter, |origin, destination, kind, depth, last| {
        visits.push(Visit {
            origin: origin.clone(),
            destination: destination.clone(),
            kind: kind.clone(),
            depth,
            last,
        });
        args.max_depth.is_none_or(|max| depth < max)
    })?;

    let payload = TreeOutput {
        root: args.root.clone(),
        visits,
    };
    render_mode(output, &payload, render_tree_text, render_tree_pretty)
}

fn render_tree_text(payload: &TreeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for visit in &payload.visits {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            visit.depth, visit.origin, visit.destination, visit.kind
        )?;
    }
    Ok(())
}

fn render_tree_pretty(payload: &TreeOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{}", payload.root)?;

    // One flag per ancestor level: does that level still have siblings below?
    let mut open: Vec<bool> = Vec::new();
    for (visit, last) in payload.visits.iter().zip(last_drawn(&payload.visits)) {
        open.truncate(visit.depth.saturating_sub(1));
        let mut line: String = open
            .iter()
            .map(|more| if *more { "│   " } else { "    " })
            .collect();
        line.push_str(if last { "└── " } else { "├── " });
        writeln!(w, "{line}{} ({})", visit.destination, visit.kind)?;
        open.push(!last);
    }
    Ok(())
}

/// Whether each visit is the final one drawn under its parent.
///
/// `--once` skips edges after the walk has already flagged their siblings, so
/// the connectors are derived from the visits actually rendered.
fn last_drawn(visits: &[Visit]) -> Vec<bool> {
    visits
        .iter()
        .enumerate()
        .map(|(i, visit)| {
            visits[i + 1..]
                .iter()
                .take_while(|later| later.depth >= visit.depth)
                .all(|later| later.depth != visit.depth)
        })
        .collect()
}
