//! `atlas map`: render the repository map report.

use std::path::Path;

use atlas_core::BudgetProfile;
use atlas_render::{RenderOptions, TreeNode, build_tree, render_report};
use clap::Args;
use serde::Serialize;

use super::{InputArgs, analyze, normalize_focus};
use crate::output::{OutputMode, render};

/// Arguments for `atlas map`.
#[derive(Args, Debug, Clone, Default)]
pub struct MapArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Tree depth; directories below it collapse into stubs.
    #[arg(long, value_name = "N")]
    pub depth: Option<usize>,

    /// File or directory kept expanded and used to scope local dependencies.
    #[arg(long, value_name = "PATH")]
    pub focus: Option<String>,

    /// File whose dependencies and impact path are reported.
    #[arg(long, value_name = "FILE")]
    pub focus_file: Option<String>,

    /// Disable every budget: no truncation, no collapsing.
    #[arg(long)]
    pub full_signals: bool,

    /// Tag noise-pattern orphans and add the orphans summary list.
    #[arg(long)]
    pub show_orphans: bool,
}

#[derive(Debug, Serialize)]
struct MapOutput {
    profile: BudgetProfile,
    full_signals: bool,
    graph_hash: String,
    files: usize,
    edges: usize,
    cycles: usize,
    /// Full file tree, before depth collapsing.
    tree: TreeNode,
    report: String,
}

/// Execute `atlas map`.
pub fn run_map(args: &MapArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let focus = normalize_focus(args.focus.as_deref())?;
    let focus_file = normalize_focus(args.focus_file.as_deref())?;
    let analysis = analyze(&args.input, project_root, args.full_signals, args.show_orphans)?;

    let options = RenderOptions {
        depth: args.depth,
        focus,
        focus_file,
        budget_profile: analysis.profile,
        budgets: analysis.budgets,
        full_signals: args.full_signals,
        show_orphans: args.show_orphans,
    };
    let tree = build_tree(analysis.graph.file_ids());
    let report = render_report(&tree, &analysis.graph, &analysis.signals, &options)?;

    let payload = MapOutput {
        profile: analysis.profile,
        full_signals: args.full_signals,
        graph_hash: analysis.graph.content_hash(),
        files: analysis.graph.node_count(),
        edges: analysis.graph.edge_count(),
        cycles: analysis.graph.cycles.len(),
        tree,
        report,
    };
    render(output, &payload, |p, w| w.write_all(p.report.as_bytes()))
}
