#![forbid(unsafe_code)]

mod cmd;
mod manifest;
mod output;
mod resolve;

use std::env;

use atlas_core::AtlasError;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status for configuration errors (bad ids, budgets, globs, focus).
const EXIT_CONFIG: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "atlas: deterministic, budget-aware repository maps",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Render the repository map",
        long_about = "Build the import graph from a parser manifest and render the budgeted markdown map.",
        after_help = "EXAMPLES:\n    # Map with the default profile\n    atlas map manifest.json\n\n    # Zoom in on one file and its path to public API\n    atlas map manifest.json --focus src/api --focus-file src/api/client.ts\n\n    # Show everything, no truncation\n    atlas map manifest.json --full-signals"
    )]
    Map(cmd::map::MapArgs),

    #[command(
        about = "Print computed signals",
        long_about = "Print inline tags, ranked summary lists and contract statuses for every file.",
        after_help = "EXAMPLES:\n    # Human-readable listing\n    atlas signals manifest.json\n\n    # Emit machine-readable output\n    atlas signals manifest.json --json"
    )]
    Signals(cmd::signals::SignalsArgs),

    #[command(
        about = "List import cycles",
        long_about = "List every import cycle, each starting at its smallest file id.",
        after_help = "EXAMPLES:\n    # List cycles\n    atlas cycles manifest.json\n\n    # Emit machine-readable output\n    atlas cycles manifest.json --json"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        about = "Generate shell completions",
        long_about = "Generate shell completion scripts for atlas.",
        after_help = "EXAMPLES:\n    # Generate zsh completions\n    atlas completions zsh > _atlas"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ATLAS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "atlas=debug,info"
        } else {
            "atlas=info,warn"
        })
    });

    let format = env::var("ATLAS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    debug!(command = ?cli.command, "dispatching");

    let result = match &cli.command {
        Commands::Map(args) => cmd::map::run_map(args, output, &project_root),
        Commands::Signals(args) => cmd::signals::run_signals(args, output, &project_root),
        Commands::Cycles(args) => cmd::cycles::run_cycles(args, output, &project_root),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    };

    if let Err(err) = &result
        && let Some(atlas) = err.downcast_ref::<AtlasError>()
    {
        render_error(output, &CliError::from(atlas))?;
        std::process::exit(EXIT_CONFIG);
    }
    result
}
