//! Report assembly.
//!
//! # Overview
//!
//! [`render_report`] turns a tree, a graph and its signals into one markdown
//! document with stable `## <name>` headings:
//!
//! ```text
//! # Repository Map
//! ## Generation             mode, profile, depth, graph fingerprint
//! ## Tree                   collapsed tree, inline signals, fan counts
//! ## Summary                ranked lists, each capped by its top-N
//! ## Cycles                 every cycle, never truncated
//! ## External Dependencies  capped by the list budget
//! ## Local Dependencies     deep-dive nodes and their direct neighbors
//! ## Impact Path            only with a focus file
//! ## Warnings
//! ```
//!
//! Every truncated list ends with the canonical notice from
//! [`truncation_notice`], followed by [`HUB_HINT`] when a hidden entry is a
//! hub. In full-signal mode every budget is unbounded, so neither appears.

use atlas_core::budget::{BudgetProfile, Budgets, Limit};
use atlas_core::model::{FileSignals, SignalsResult, SummaryItem};
use atlas_core::{AtlasError, DependencyGraph};
use tracing::{debug, instrument};

use crate::collapse::{CollapseOptions, FileAnnotator, collapse_tree};
use crate::impact::{impact_path, render_path};
use crate::tree::TreeNode;

// ---------------------------------------------------------------------------
// Canonical strings
// ---------------------------------------------------------------------------

pub const HUB_HINT: &str =
    "hint: hidden entries include hubs; rerun with --full-signals before changing shared code";
pub const NO_PUBLIC_SURFACE: &str = "No reachable public surface from focus file.";
pub const EMPTY_TREE: &str = "(no files)";
pub const EMPTY_LIST: &str = "(none)";

/// `... {N} more hidden by budget (rerun with --full-signals to show all)`
#[must_use]
pub fn truncation_notice(hidden: usize) -> String {
    format!("... {hidden} more hidden by budget (rerun with --full-signals to show all)")
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How the report is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Tree depth; `None` uses the profile default.
    pub depth: Option<usize>,
    /// File or directory to keep expanded and to scope local dependencies.
    pub focus: Option<String>,
    /// File whose local dependencies and impact path are reported.
    pub focus_file: Option<String>,
    pub budget_profile: BudgetProfile,
    /// Budgets in effect outside full-signal mode.
    pub budgets: Budgets,
    pub full_signals: bool,
    /// Add the `### Orphans` summary list.
    pub show_orphans: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::for_profile(BudgetProfile::Default)
    }
}

impl RenderOptions {
    #[must_use]
    pub fn for_profile(profile: BudgetProfile) -> Self {
        Self {
            depth: None,
            focus: None,
            focus_file: None,
            budget_profile: profile,
            budgets: profile.budgets(),
            full_signals: false,
            show_orphans: false,
        }
    }

    /// Budgets actually applied: all unbounded in full-signal mode.
    #[must_use]
    pub fn effective_budgets(&self) -> Budgets {
        if self.full_signals {
            Budgets::unbounded()
        } else {
            self.budgets
        }
    }

    /// Tree depth actually applied: unlimited in full-signal mode.
    #[must_use]
    pub fn effective_depth(&self) -> Option<usize> {
        if self.full_signals {
            None
        } else {
            Some(self.depth.unwrap_or_else(|| self.budget_profile.default_depth()))
        }
    }

    /// Reject focus targets missing from the graph and zero budgets.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::FocusNotFound`] or [`AtlasError::InvalidBudget`].
    pub fn validate(&self, graph: &DependencyGraph) -> Result<(), AtlasError> {
        if let Some(focus) = &self.focus {
            let prefix = format!("{focus}/");
            if !graph.contains(focus) && !graph.file_ids().any(|id| id.starts_with(&prefix)) {
                return Err(AtlasError::FocusNotFound(focus.clone()));
            }
        }
        if let Some(file) = &self.focus_file
            && !graph.contains(file)
        {
            return Err(AtlasError::FocusNotFound(file.clone()));
        }
        self.budgets.validate()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the full report.
///
/// # Errors
///
/// Fails with a configuration error before producing any output when
/// [`RenderOptions::validate`] does.
#[instrument(skip_all, fields(files = graph.node_count(), full_signals = options.full_signals))]
pub fn render_report(
    tree: &TreeNode,
    graph: &DependencyGraph,
    signals: &SignalsResult,
    options: &RenderOptions,
) -> Result<String, AtlasError> {
    options.validate(graph)?;

    let ctx = Context {
        graph,
        signals,
        budgets: options.effective_budgets(),
        options,
    };
    let mut warnings: Vec<String> = signals.warnings.clone();
    let mut out: Vec<String> = vec!["# Repository Map".to_string()];

    section(&mut out, "Generation", ctx.generation());
    section(&mut out, "Tree", ctx.tree(tree));
    section(&mut out, "Summary", ctx.summary());
    section(&mut out, "Cycles", ctx.cycles());
    section(&mut out, "External Dependencies", ctx.externals());
    section(&mut out, "Local Dependencies", ctx.local_dependencies());
    if let Some(focus_file) = &options.focus_file {
        section(&mut out, "Impact Path", ctx.impact(focus_file, &mut warnings));
    }
    section(&mut out, "Warnings", bullets(&warnings));

    debug!(
        lines = out.len(),
        warnings = warnings.len(),
        unbounded = ctx.budgets.is_unbounded(),
        "report rendered"
    );
    let mut report = out.join("\n");
    report.push('\n');
    Ok(report)
}

fn section(out: &mut Vec<String>, title: &str, body: Vec<String>) {
    out.push(String::new());
    out.push(format!("## {title}"));
    out.push(String::new());
    out.extend(body);
}

fn bullets(items: &[String]) -> Vec<String> {
    if items.is_empty() {
        return vec![EMPTY_LIST.to_string()];
    }
    items.iter().map(|item| format!("- {item}")).collect()
}

/// Shared state for the section renderers.
struct Context<'a> {
    graph: &'a DependencyGraph,
    signals: &'a SignalsResult,
    budgets: Budgets,
    options: &'a RenderOptions,
}

impl Context<'_> {
    fn generation(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.options.full_signals {
            lines.push("- mode: full-signal (no budgets applied)".to_string());
        } else {
            lines.push("- mode: budgeted".to_string());
            lines.push(format!("- profile: {}", self.options.budget_profile));
        }
        lines.push(format!(
            "- depth: {}",
            self.options
                .effective_depth()
                .map_or_else(|| "unlimited".to_string(), |d| d.to_string())
        ));
        if let Some(focus) = &self.options.focus {
            lines.push(format!("- focus: {focus}"));
        }
        if let Some(file) = &self.options.focus_file {
            lines.push(format!("- focus file: {file}"));
        }
        lines.push(format!(
            "- files: {}, edges: {}, cycles: {}",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.graph.cycles.len()
        ));
        lines.push(format!("- graph: {}", self.graph.content_hash()));
        lines
    }

    fn tree(&self, tree: &TreeNode) -> Vec<String> {
        let focus: Vec<&str> = self
            .options
            .focus
            .iter()
            .chain(&self.options.focus_file)
            .map(String::as_str)
            .collect();
        let options = CollapseOptions {
            depth: self.options.effective_depth(),
            focus: &focus,
        };
        let folded = collapse_tree(tree, &options, self);
        if folded.lines.is_empty() {
            return vec![EMPTY_TREE.to_string()];
        }

        let mut lines = Vec::with_capacity(folded.lines.len() + 2);
        lines.push("```text".to_string());
        lines.extend(folded.lines);
        lines.push("```".to_string());
        lines
    }

    fn summary(&self) -> Vec<String> {
        let s = self.signals;
        let b = &self.budgets;
        let mut lines = Vec::new();
        self.ranked(&mut lines, "Entrypoints", &s.entrypoints, b.entrypoints_top_n);
        self.ranked(&mut lines, "Public API", &s.public_api, b.public_api_top_n);
        self.ranked(&mut lines, "Hubs (fan-in)", &s.hubs_fan_in, b.hubs_top_n);
        self.ranked(&mut lines, "Hubs (fan-out)", &s.hubs_fan_out, b.hubs_top_n);
        if self.options.show_orphans {
            push_subsection(
                &mut lines,
                "Orphans",
                self.budgeted(
                    &s.orphans,
                    b.list_budget,
                    |id| id.as_str(),
                    |id| format!("- {id}"),
                ),
            );
        }
        // Drop the blank line the first subsection opened with.
        if lines.first().is_some_and(String::is_empty) {
            lines.remove(0);
        }
        lines
    }

    fn ranked(&self, lines: &mut Vec<String>, title: &str, items: &[SummaryItem], limit: Limit) {
        let body = self.budgeted(
            items,
            limit,
            |item| item.file.as_str(),
            |item| format!("- {}: {}", item.file, item.reason),
        );
        push_subsection(lines, title, body);
    }

    /// Render `items` capped at `limit`, with the truncation notice and the
    /// hub hint when they apply.
    fn budgeted<T>(
        &self,
        items: &[T],
        limit: Limit,
        file_of: impl Fn(&T) -> &str,
        line: impl Fn(&T) -> String,
    ) -> Vec<String> {
        if items.is_empty() {
            return vec![EMPTY_LIST.to_string()];
        }
        let shown = limit.take(items.len());
        let mut lines: Vec<String> = items[..shown].iter().map(&line).collect();
        let hidden = &items[shown..];
        if !hidden.is_empty() {
            lines.push(truncation_notice(hidden.len()));
            if hidden.iter().any(|item| self.signals.is_hub(file_of(item))) {
                lines.push(HUB_HINT.to_string());
            }
        }
        lines
    }

    fn cycles(&self) -> Vec<String> {
        let rendered: Vec<String> = self
            .graph
            .cycles
            .iter()
            .filter_map(|cycle| {
                let start = cycle.first()?;
                let mut closed = cycle.clone();
                closed.push(start.clone());
                Some(render_path(&closed))
            })
            .collect();
        bullets(&rendered)
    }

    fn externals(&self) -> Vec<String> {
        let mut usage: Vec<(&str, usize)> = self.graph.external_usage().into_iter().collect();
        usage.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        // External names are never files, so hidden entries are never hubs.
        self.budgeted(
            &usage,
            self.budgets.list_budget,
            |(name, _)| *name,
            |(name, count)| {
                format!("- {name} ({count} {})", if *count == 1 { "file" } else { "files" })
            },
        )
    }

    /// Focus file, else files under the focus, else every tagged hub.
    fn deep_dive_selection(&self) -> Vec<&str> {
        if let Some(file) = &self.options.focus_file {
            return vec![file.as_str()];
        }
        if let Some(focus) = &self.options.focus {
            let prefix = format!("{focus}/");
            return self
                .graph
                .file_ids()
                .filter(|id| *id == focus.as_str() || id.starts_with(&prefix))
                .collect();
        }
        self.graph
            .file_ids()
            .filter(|id| self.signals.is_hub(id))
            .collect()
    }

    fn local_dependencies(&self) -> Vec<String> {
        let selection = self.deep_dive_selection();
        if selection.is_empty() {
            return vec![EMPTY_LIST.to_string()];
        }

        let shown = self.budgets.deep_dive_budget.take(selection.len());
        let mut lines = Vec::new();
        for id in &selection[..shown] {
            let Some(node) = self.graph.node(id) else {
                continue;
            };
            let imports: Vec<&String> = node.outgoing.iter().collect();
            let importers: Vec<&String> = node.incoming.iter().collect();
            let list = |items: &[&String]| {
                self.budgeted(
                    items,
                    self.budgets.list_budget,
                    |id| id.as_str(),
                    |id| format!("- {id}"),
                )
            };

            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("### {id}"));
            lines.push(String::new());
            lines.push(format!("imports ({}):", imports.len()));
            lines.extend(list(&imports));
            lines.push(format!("imported by ({}):", importers.len()));
            lines.extend(list(&importers));
        }

        let hidden = &selection[shown..];
        if !hidden.is_empty() {
            lines.push(String::new());
            lines.push(truncation_notice(hidden.len()));
            if hidden.iter().any(|id| self.signals.is_hub(id)) {
                lines.push(HUB_HINT.to_string());
            }
        }
        lines
    }

    fn impact(&self, focus_file: &str, warnings: &mut Vec<String>) -> Vec<String> {
        match impact_path(self.graph, self.signals, focus_file) {
            Some(path) => vec![render_path(&path)],
            None => {
                warnings.push(format!("no reachable public surface from {focus_file}"));
                vec![NO_PUBLIC_SURFACE.to_string()]
            }
        }
    }
}

fn push_subsection(lines: &mut Vec<String>, title: &str, body: Vec<String>) {
    lines.push(String::new());
    lines.push(format!("### {title}"));
    lines.push(String::new());
    lines.extend(body);
}

impl FileAnnotator for Context<'_> {
    fn file_line(&self, rel_path: &str, name: &str) -> String {
        let Some(node) = self.graph.node(rel_path) else {
            return name.to_string();
        };
        let mut line = format!("{name} (←{} →{})", node.fan_in(), node.fan_out());

        if let Some(fs) = self.signals.file(rel_path) {
            let limit = self.budgets.inline_per_file_max;
            let shown = limit.take(fs.inline.len());
            for signal in &fs.inline[..shown] {
                line.push(' ');
                line.push_str(&signal.to_string());
            }
            let hidden = limit.hidden(fs.inline.len());
            if hidden > 0 {
                line.push_str(&format!(" [+{hidden}]"));
            }
        }
        line
    }

    fn has_risk(&self, rel_path: &str) -> bool {
        self.signals.file(rel_path).is_some_and(FileSignals::has_risk)
    }
}
