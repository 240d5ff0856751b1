#![forbid(unsafe_code)]

mod cmd;
mod manifest;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use depgraph_core::GraphError;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cmd::CommandError;
use crate::manifest::ManifestError;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dg: inspect a dependency manifest as a graph",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Manifest to load.
    #[arg(long, global = true, value_name = "PATH", default_value = manifest::DEFAULT_MANIFEST)]
    manifest: PathBuf,

    /// Output format (defaults to FORMAT, then pretty on a TTY and text otherwise).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and environment.
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "List declared nodes",
        long_about = "List every node in manifest order with its dependency and dependent counts.",
        after_help = "EXAMPLES:\n    # List nodes\n    dg nodes\n\n    # Emit machine-readable output\n    dg nodes --json"
    )]
    Nodes(cmd::nodes::NodesArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show edges of one node",
        long_about = "Show the dependencies (outbound edges) of a node, or its dependents with --inbound.",
        after_help = "EXAMPLES:\n    # What does app depend on?\n    dg edges app\n\n    # What depends on util?\n    dg edges util --inbound"
    )]
    Edges(cmd::edges::EdgesArgs),

    #[command(
        next_help_heading = "Traverse",
        about = "Draw the dependency tree of a node",
        long_about = "Walk dependencies depth-first from a node and draw them as a tree.",
        after_help = "EXAMPLES:\n    # Full tree\n    dg tree app\n\n    # Each dependency once, compile edges only\n    dg tree app --once --kind compile\n\n    # Stay on one kind of edge along each chain\n    dg tree app --same-kind"
    )]
    Tree(cmd::tree::TreeArgs),

    #[command(
        next_help_heading = "Traverse",
        about = "Walk dependencies bottom-up",
        long_about = "Walk dependencies depth-first and report each edge after everything below it.",
        after_help = "EXAMPLES:\n    # Deepest dependencies first\n    dg up app"
    )]
    Up(cmd::up::UpArgs),

    #[command(
        next_help_heading = "Traverse",
        about = "Search below a node",
        long_about = "Search a node and its dependencies depth-first for a name containing the needle.",
        after_help = "EXAMPLES:\n    # First dependency of app whose name contains 'log'\n    dg find app log\n\n    # Exact name match\n    dg find app util --exact"
    )]
    Find(cmd::find::FindArgs),

    #[command(
        next_help_heading = "Traverse",
        about = "List dependency chains between two nodes",
        long_about = "List every chain of dependency edges leading from one node to another.",
        after_help = "EXAMPLES:\n    # How does app end up depending on util?\n    dg paths app util"
    )]
    Paths(cmd::paths::PathsArgs),

    #[command(
        next_help_heading = "Analyze",
        about = "Preview removing a node",
        long_about = "Remove a node and every dependency left without dependents, then report the cascade. The manifest is not modified.",
        after_help = "EXAMPLES:\n    # What goes away with core?\n    dg remove core"
    )]
    Remove(cmd::remove::RemoveArgs),

    #[command(
        next_help_heading = "Analyze",
        about = "Preview pruning unreferenced nodes",
        long_about = "Remove every node that nothing depends on, except the ones kept. The manifest is not modified.",
        after_help = "EXAMPLES:\n    # Drop unreferenced nodes but keep app\n    dg prune --keep app"
    )]
    Prune(cmd::prune::PruneArgs),

    #[command(
        next_help_heading = "Analyze",
        about = "List dependency cycles",
        long_about = "List strongly connected components that form dependency cycles.",
        after_help = "EXAMPLES:\n    # Show cycles\n    dg cycles\n\n    # Emit machine-readable output\n    dg cycles --json"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        next_help_heading = "Analyze",
        about = "Print a build order",
        long_about = "Print every node with its dependencies before it. Fails if the manifest has a cycle.",
        after_help = "EXAMPLES:\n    # Build order\n    dg order"
    )]
    Order(cmd::order::OrderArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    dg completions bash\n\n    # Generate zsh completions\n    dg completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("DEPGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "depgraph=debug,info"
        } else {
            "depgraph=info,warn"
        })
    });

    let format = env::var("DEPGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Map any command failure onto the structured error the output layer renders.
fn to_cli_error(err: &anyhow::Error) -> CliError {
    if let Some(graph) = err.downcast_ref::<GraphError>() {
        return CliError::from(graph);
    }
    if let Some(command) = err.downcast_ref::<CommandError>() {
        return CliError::with_details(command.to_string(), command.hint(), command.code());
    }
    if let Some(manifest) = err.downcast_ref::<ManifestError>() {
        return CliError::with_details(format!("{err:#}"), manifest.hint(), manifest.code());
    }
    CliError::new(format!("{err:#}"))
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let mut graph = manifest::load(&cli.manifest)?;
    debug!(manifest = %cli.manifest.display(), "graph ready");

    match &cli.command {
        Commands::Nodes(args) => cmd::nodes::run_nodes(args, output, &graph),
        Commands::Edges(args) => cmd::edges::run_edges(args, output, &graph),
        Commands::Tree(args) => cmd::tree::run_tree(args, output, &graph),
        Commands::Up(args) => cmd::up::run_up(args, output, &graph),
        Commands::Find(args) => cmd::find::run_find(args, output, &graph),
        Commands::Paths(args) => cmd::paths::run_paths(args, output, &graph),
        Commands::Remove(args) => cmd::remove::run_remove(args, output, &mut graph),
        Commands::Prune(args) => cmd::prune::run_prune(args, output, &mut graph),
        Commands::Cycles(args) => cmd::cycles::run_cycles(args, output, &graph),
        Commands::Order(args) => cmd::order::run_order(args, output, &graph),
        Commands::Completions(_) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if render_error(output, &to_cli_error(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
