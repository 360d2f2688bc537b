#![no_main]

use std::collections::{BTreeMap, BTreeSet};

use atlas_core::graph::{DependencyGraph, ParsedFile, ResolvedTarget};
use atlas_core::{SignalConfig, compute_signals};
use atlas_render::{RenderOptions, render_map};
use libfuzzer_sys::fuzz_target;

// Input is one `from>to` edge per line; a bare line is a file with no edges.
fuzz_target!(|data: &str| {
    let mut files: BTreeSet<String> = BTreeSet::new();
    let mut parsed: BTreeMap<String, ParsedFile> = BTreeMap::new();
    for line in data.lines().take(256) {
        let (from, to) = line.split_once('>').unwrap_or((line, ""));
        let Ok(from) = atlas_core::graph::normalize_id(from) else {
            continue;
        };
        files.insert(from.clone());
        if let Ok(to) = atlas_core::graph::normalize_id(to) {
            files.insert(to.clone());
            parsed.entry(from).or_default().specifiers.push(to);
        }
    }

    let files: Vec<String> = files.into_iter().collect();
    let resolve = |_: &str, spec: &str| ResolvedTarget::Internal(spec.to_string());
    let Ok(graph) = DependencyGraph::build(&files, &parsed, &resolve) else {
        return;
    };
    let signals = compute_signals(&graph, &SignalConfig::default());

    let options = RenderOptions::default();
    let first = render_map(&graph, &signals, &options).expect("valid options");
    let second = render_map(&graph, &signals, &options).expect("valid options");
    assert_eq!(first, second);

    // The cycles section is never truncated.
    for id in graph.cycles.iter().flatten() {
        assert!(first.contains(id.as_str()));
    }
});
