use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use atlas_core::budget::Limit;
use atlas_core::graph::{DependencyGraph, ParsedFile, ResolvedTarget};
use atlas_core::{SignalConfig, compute_signals};
use atlas_render::collapse::{CollapseOptions, FileAnnotator, collapse_tree};
use atlas_render::{RenderOptions, build_tree, render_map};

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Distinct file ids like `a/b/x.ts`, 1..=4 segments deep.
fn arb_files() -> impl Strategy<Value = Vec<String>> {
    let dir = prop::sample::select(vec!["a", "b", "c"]);
    let file = prop::sample::select(vec!["x.ts", "y.ts", "z.ts"]);
    let path = (prop::collection::vec(dir, 0..4), file).prop_map(|(dirs, file)| {
        let mut parts: Vec<&str> = dirs;
        parts.push(file);
        parts.join("/")
    });
    prop::collection::btree_set(path, 1..12).prop_map(|set| set.into_iter().collect())
}

fn arb_graph() -> impl Strategy<Value = (Vec<String>, Vec<(usize, usize)>)> {
    arb_files().prop_flat_map(|files| {
        let n = files.len();
        (Just(files), prop::collection::vec((0..n, 0..n), 0..(n * 2)))
    })
}

fn build(files: &[String], edges: &[(usize, usize)]) -> DependencyGraph {
    let mut parsed: BTreeMap<String, ParsedFile> = BTreeMap::new();
    for &(from, to) in edges {
        parsed
            .entry(files[from].clone())
            .or_default()
            .specifiers
            .push(files[to].clone());
    }
    DependencyGraph::build(files, &parsed, &|_: &str, spec: &str| {
        ResolvedTarget::Internal(spec.to_string())
    })
    .expect("generated graphs are well-formed")
}

/// Marks risky files with a trailing `!`.
struct Marked(BTreeSet<String>);

impl FileAnnotator for Marked {
    fn file_line(&self, rel_path: &str, name: &str) -> String {
        if self.0.contains(rel_path) {
            format!("{name}!")
        } else {
            name.to_string()
        }
    }

    fn has_risk(&self, rel_path: &str) -> bool {
        self.0.contains(rel_path)
    }
}

fn stub_risks(line: &str) -> usize {
    line.split_once(") (")
        .and_then(|(_, rest)| rest.split_once(' '))
        .and_then(|(count, _)| count.parse().ok())
        .unwrap_or(0)
}

/// Bullet counts per `### ` subsection of the summary.
fn summary_counts(report: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    let mut current: Option<String> = None;
    let mut in_summary = false;
    for line in report.lines() {
        if line.starts_with("## ") {
            in_summary = line == "## Summary";
            current = None;
            continue;
        }
        if !in_summary {
            continue;
        }
        if let Some(title) = line.strip_prefix("### ") {
            current = Some(title.to_string());
            counts.insert(title.to_string(), 0);
        } else if line.starts_with("- ")
            && let Some(title) = &current
        {
            *counts.entry(title.clone()).or_default() += 1;
        }
    }
    counts
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(128))]

    #[test]
    fn prop_render_is_deterministic((files, edges) in arb_graph(), depth in 0usize..4) {
        let g1 = build(&files, &edges);
        let mut reversed = files.clone();
        reversed.reverse();
        let remapped: Vec<(usize, usize)> = edges
            .iter()
            .map(|&(a, b)| (files.len() - 1 - a, files.len() - 1 - b))
            .collect();
        let g2 = build(&reversed, &remapped);

        let options = RenderOptions {
            depth: Some(depth),
            show_orphans: true,
            ..RenderOptions::default()
        };
        let s1 = compute_signals(&g1, &SignalConfig::default());
        let s2 = compute_signals(&g2, &SignalConfig::default());
        prop_assert_eq!(
            render_map(&g1, &s1, &options).expect("render"),
            render_map(&g2, &s2, &options).expect("render")
        );
    }

    #[test]
    fn prop_summary_respects_top_n((files, edges) in arb_graph(), top_n in 1usize..4) {
        let g = build(&files, &edges);
        let signals = compute_signals(&g, &SignalConfig::default());

        let mut options = RenderOptions::default();
        options.budgets.entrypoints_top_n = Limit::Bounded(top_n);
        options.budgets.public_api_top_n = Limit::Bounded(top_n);
        options.budgets.hubs_top_n = Limit::Bounded(top_n);
        let budgeted = summary_counts(&render_map(&g, &signals, &options).expect("render"));
        for (title, count) in &budgeted {
            prop_assert!(*count <= top_n, "{} shows {} > {}", title, count, top_n);
        }

        options.full_signals = true;
        let full = summary_counts(&render_map(&g, &signals, &options).expect("render"));
        prop_assert_eq!(full["Entrypoints"], signals.entrypoints.len());
        prop_assert_eq!(full["Public API"], signals.public_api.len());
        prop_assert_eq!(full["Hubs (fan-in)"], signals.hubs_fan_in.len());
        prop_assert_eq!(full["Hubs (fan-out)"], signals.hubs_fan_out.len());
    }

    #[test]
    fn prop_collapse_never_loses_risk(
        files in arb_files(),
        risky_mask in prop::collection::vec(any::<bool>(), 12),
        depth in 0usize..4,
    ) {
        let risky: BTreeSet<String> = files
            .iter()
            .zip(&risky_mask)
            .filter(|&(_, &r)| r)
            .map(|(f, _)| f.clone())
            .collect();
        let tree = build_tree(files.iter().map(String::as_str));
        let options = CollapseOptions { depth: Some(depth), focus: &[] };
        let out = collapse_tree(&tree, &options, &Marked(risky.clone()));

        let visible = out.lines.iter().filter(|l| l.ends_with('!')).count();
        let hidden: usize = out
            .lines
            .iter()
            .filter(|l| l.contains("/ ... ("))
            .map(String::as_str)
            .map(stub_risks)
            .sum();
        prop_assert_eq!(visible + hidden, risky.len());
        prop_assert_eq!(out.risks, risky.len());
        for line in out.lines.iter().filter(|l| l.contains("/ ... (")) {
            prop_assert_eq!(line.contains("hidden risk"), stub_risks(line) > 0);
        }
    }

    #[test]
    fn prop_focus_chain_never_collapses(
        files in arb_files(),
        pick in any::<prop::sample::Index>(),
        depth in 0usize..3,
    ) {
        let focus = pick.get(&files).clone();
        let tree = build_tree(files.iter().map(String::as_str));
        let focus_list = [focus.as_str()];
        let options = CollapseOptions { depth: Some(depth), focus: &focus_list };
        let out = collapse_tree(&tree, &options, &Marked(BTreeSet::new()));

        let segments: Vec<&str> = focus.split('/').collect();
        let last = segments.len() - 1;
        for (level, segment) in segments.iter().enumerate() {
            let expected = if level == last {
                format!("{}{}", "  ".repeat(level), segment)
            } else {
                format!("{}{}/", "  ".repeat(level), segment)
            };
            prop_assert!(
                out.lines.contains(&expected),
                "missing {:?} in {:?}",
                expected,
                out.lines
            );
        }
    }
}
