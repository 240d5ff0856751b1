//! `dg find`: depth-first search below a node for a matching name.

use std::io::Write;

use clap::Args;
use depgraph_core::Graph;
use serde::Serialize;

use crate::manifest::DepGraph;
use crate::output::{OutputMode, render_mode};

/// Arguments for `dg find`.
#[derive(Args, Debug)]
pub struct FindArgs {
    /// Node to search from. It is tested itself before any dependency.
    pub root: String,

    /// Text to look for in node names.
    pub needle: String,

    /// Require the whole name to match instead of a substring.
    #[arg(long)]
    pub exact: bool,
}

#[derive(Debug, Serialize)]
struct FindOutput {
    root: String,
    needle: String,
    found: Option<String>,
}

/// Execute `dg find`.
pub fn run_find(args: &FindArgs, output: OutputMode, graph: &DepGraph) -> anyhow::Result<()> {
    let needle = args.needle.as_str();
    let found = graph.find(&args.root, |name| {
        if args.exact {
            name == needle
        } else {
            name.contains(needle)
        }
    })?;

    let payload = FindOutput {
        root: args.root.clone(),
        needle: args.needle.clone(),
        found: found.cloned(),
    };
    render_mode(output, &payload, render_find_text, render_find_pretty)
}

fn render_find_text(payload: &FindOutput, w: &mut dyn Write) -> std::io::Result<()> {
    match payload.found {
        Some(ref name) => writeln!(w, "{name}"),
        None => Ok(()),
    }
}

fn render_find_pretty(payload: &FindOutput, w: &mut dyn Write) -> std::io::Result<()> {
    match payload.found {
        Some(ref name) => writeln!(w, "Found {name} below {}", payload.root),
        None => writeln!(w, "No node matching '{}' below {}", payload.needle, payload.root),
    }
}
