//! `dg order`: every node with its dependencies listed before it.

use std::io::Write;

use clap::Args;
use depgraph_core::build_order;
use serde::Serialize;

use crate::manifest::DepGraph;
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `dg order`.
#[derive(Args, Debug, Default)]
pub struct OrderArgs {}

#[derive(Debug, Serialize)]
struct OrderOutput {
    order: Vec<String>,
}

/// Execute `dg order`.
pub fn run_order(_args: &OrderArgs, output: OutputMode, graph: &DepGraph) -> anyhow::Result<()> {
    let payload = OrderOutput {
        order: build_order(graph)?,
    };
    render_mode(output, &payload, render_order_text, render_order_pretty)
}

fn render_order_text(payload: &OrderOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for name in &payload.order {
        writeln!(w, "{name}")?;
    }
    Ok(())
}

fn render_order_pretty(payload: &OrderOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Build order")?;
    for (idx, name) in payload.order.iter().enumerate() {
        writeln!(w, "{:>4}. {name}", idx + 1)?;
    }
    Ok(())
}
