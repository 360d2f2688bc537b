//! Subcommand handlers and the analysis pipeline they share.

pub mod completions;
pub mod cycles;
pub mod map;
pub mod signals;

use std::path::{Path, PathBuf};

use anyhow::Result;
use atlas_core::config::load_project_config;
use atlas_core::graph::normalize_id;
use atlas_core::{
    BudgetProfile, Budgets, DependencyGraph, SignalConfig, SignalsResult, compute_signals,
};
use clap::Args;
use tracing::info;

use crate::manifest::Manifest;
use crate::resolve::FileSetResolver;

/// Input shared by every analysis command.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Parser manifest: `{"files": [...], "imports": {"<file>": ["<specifier>"]}}`.
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Project root holding `.atlas/config.toml` (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Budget profile: compact, default or wide (overrides the config file).
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<BudgetProfile>,
}

/// Graph and signals for one manifest, plus the budgets they were
/// computed under.
#[derive(Debug)]
pub struct Analysis {
    pub graph: DependencyGraph,
    pub signals: SignalsResult,
    pub profile: BudgetProfile,
    /// Configured budgets, before any full-signal override.
    pub budgets: Budgets,
}

/// Load config and manifest, build the graph and compute signals.
///
/// In full-signal mode the signal computer runs with unbounded budgets, so
/// every hub is tagged.
///
/// # Errors
///
/// Fails on unreadable input and on any configuration error.
pub fn analyze(
    input: &InputArgs,
    project_root: &Path,
    full_signals: bool,
    show_orphans: bool,
) -> Result<Analysis> {
    let root = input.root.as_deref().unwrap_or(project_root);
    let config = load_project_config(root)?;
    let profile = input.profile.unwrap_or(config.budgets.profile);
    let budgets = config.budgets.resolve(input.profile)?;
    let patterns = config.compile_patterns()?;

    let manifest = Manifest::load(&input.manifest)?;
    let files = manifest
        .files
        .iter()
        .map(String::as_str)
        .map(normalize_id)
        .collect::<Result<Vec<_>, _>>()?;
    let parsed = manifest.parsed_files()?;
    let resolver = FileSetResolver::new(files.iter().cloned());

    let graph = DependencyGraph::build(&files, &parsed, &resolver)?;
    let signal_config = SignalConfig {
        patterns,
        budgets: if full_signals {
            Budgets::unbounded()
        } else {
            budgets
        },
        show_orphans,
    };
    let signals = compute_signals(&graph, &signal_config);

    info!(
        files = graph.node_count(),
        edges = graph.edge_count(),
        cycles = graph.cycles.len(),
        profile = %profile,
        "analysis complete"
    );
    Ok(Analysis {
        graph,
        signals,
        profile,
        budgets,
    })
}

/// Canonicalize a user-supplied focus path (`src/` and `./src` become `src`).
///
/// # Errors
///
/// Returns [`atlas_core::AtlasError::InvalidFileId`] for paths that escape
/// the repository.
pub fn normalize_focus(focus: Option<&str>) -> Result<Option<String>> {
    Ok(focus.map(normalize_id).transpose()?)
}
