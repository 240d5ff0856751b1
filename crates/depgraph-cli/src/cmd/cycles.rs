//! `dg cycles`: list dependency cycles (strongly connected components).

use std::io::Write;

use clap::Args;
use depgraph_core::find_cycles;
use serde::Serialize;

use crate::manifest::DepGraph;
use crate::output::{OutputMode, render_mode};

/// Arguments for `dg cycles`.
#[derive(Args, Debug, Default)]
pub struct CyclesArgs {}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    cycles: Vec<Vec<String>>,
}

/// Execute `dg cycles`.
pub fn run_cycles(_args: &CyclesArgs, output: OutputMode, graph: &DepGraph) -> anyhow::Result<()> {
    let payload = CyclesOutput {
        cycles: find_cycles(graph),
    };
    render_mode(output, &payload, render_cycles_text, render_cycles_pretty)
}

fn render_cycles_text(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for cycle in &payload.cycles {
        writeln!(w, "{}", cycle.join("\t"))?;
    }
    Ok(())
}

fn render_cycles_pretty(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.cycles.is_empty() {
        writeln!(w, "No dependency cycles found.")?;
        return Ok(());
    }

    writeln!(w, "Dependency cycles ({})", payload.cycles.len())?;

    for (idx, cycle) in payload.cycles.iter().enumerate() {
        writeln!(w, "\nCycle {}:", idx + 1)?;
        for name in cycle {
            writeln!(w, "  - {name}")?;
        }
    }

    Ok(())
}
