//! `atlas signals`: dump per-file tags, ranked lists and contract statuses.

use std::io::{self, Write};
use std::path::Path;

use atlas_core::SignalsResult;
use atlas_core::model::SummaryItem;
use clap::Args;

use super::{InputArgs, analyze};
use crate::output::{OutputMode, render};

/// Arguments for `atlas signals`.
#[derive(Args, Debug, Clone, Default)]
pub struct SignalsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Compute with unbounded budgets (tags every hub).
    #[arg(long)]
    pub full_signals: bool,

    /// Tag noise-pattern orphans too.
    #[arg(long)]
    pub show_orphans: bool,
}

/// Execute `atlas signals`.
pub fn run_signals(
    args: &SignalsArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let analysis = analyze(&args.input, project_root, args.full_signals, args.show_orphans)?;
    render(output, &analysis.signals, render_signals_human)
}

fn render_signals_human(signals: &SignalsResult, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "files ({}):", signals.files.len())?;
    for file in &signals.files {
        if file.inline.is_empty() {
            writeln!(w, "  {}", file.file)?;
            continue;
        }
        let tags: Vec<String> = file.inline.iter().map(ToString::to_string).collect();
        writeln!(w, "  {}  {}", file.file, tags.join(" "))?;
    }

    let lists: [(&str, &[SummaryItem]); 4] = [
        ("entrypoints", &signals.entrypoints),
        ("public api", &signals.public_api),
        ("hubs (fan-in)", &signals.hubs_fan_in),
        ("hubs (fan-out)", &signals.hubs_fan_out),
    ];
    for (title, items) in lists {
        writeln!(w)?;
        writeln!(w, "{title} ({}):", items.len())?;
        if items.is_empty() {
            writeln!(w, "  (none)")?;
        }
        for item in items {
            writeln!(w, "  {}: {}", item.file, item.reason)?;
        }
    }

    writeln!(w)?;
    writeln!(w, "orphans ({}):", signals.orphans.len())?;
    if signals.orphans.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for orphan in &signals.orphans {
        writeln!(w, "  {orphan}")?;
    }

    let contracts: Vec<_> = signals
        .contract_signals
        .iter()
        .filter(|(_, contract)| contract.evidence.included_by.is_some())
        .collect();
    if !contracts.is_empty() {
        writeln!(w)?;
        writeln!(w, "contracts ({}):", contracts.len())?;
        for (file, contract) in contracts {
            writeln!(
                w,
                "  {file}  {} ({}/{} expected edges)",
                contract.status,
                contract.evidence.found(),
                contract.evidence.expected()
            )?;
        }
    }

    if !signals.warnings.is_empty() {
        writeln!(w)?;
        writeln!(w, "warnings ({}):", signals.warnings.len())?;
        for warning in &signals.warnings {
            writeln!(w, "  {warning}")?;
        }
    }
    Ok(())
}
