//! Known-topology scenarios for the graph builder and signal computer.
//!
//! Each test uses a hand-crafted graph whose expected fan counts, cycles and
//! tags are worked out by hand, so any behavior change is caught.

use std::collections::BTreeMap;

use atlas_core::graph::{DependencyGraph, ParsedFile, ResolvedTarget};
use atlas_core::model::codes;
use atlas_core::patterns::{BoundaryRule, CompiledPatterns, PatternConfig};
use atlas_core::{ContractStatus, SignalConfig, compute_signals};

// ---------------------------------------------------------------------------
// Helper: build a DependencyGraph from an edge list
// ---------------------------------------------------------------------------

fn build(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
    let files: Vec<String> = nodes.iter().map(|s| (*s).to_string()).collect();
    let mut parsed: BTreeMap<String, ParsedFile> = BTreeMap::new();
    for (from, to) in edges {
        parsed
            .entry((*from).to_string())
            .or_default()
            .specifiers
            .push((*to).to_string());
    }
    DependencyGraph::build(&files, &parsed, &|_: &str, spec: &str| {
        spec.strip_prefix("npm:").map_or_else(
            || ResolvedTarget::Internal(spec.to_string()),
            |name| ResolvedTarget::External(name.to_string()),
        )
    })
    .expect("graph must build")
}

fn fans(graph: &DependencyGraph, id: &str) -> (usize, usize) {
    let node = graph.node(id).expect("node exists");
    (node.fan_in(), node.fan_out())
}

// ---------------------------------------------------------------------------
// Graph shape
// ---------------------------------------------------------------------------

#[test]
fn triangle_fan_counts() {
    let g = build(
        &["A.ts", "B.ts", "C.ts"],
        &[("A.ts", "B.ts"), ("A.ts", "C.ts"), ("B.ts", "C.ts")],
    );
    assert_eq!(fans(&g, "A.ts"), (0, 2));
    assert_eq!(fans(&g, "B.ts"), (1, 1));
    assert_eq!(fans(&g, "C.ts"), (2, 0));
    assert!(g.cycles.is_empty());
}

#[test]
fn mutual_import_is_one_cycle_tagged_on_both() {
    let g = build(&["A.ts", "B.ts"], &[("A.ts", "B.ts"), ("B.ts", "A.ts")]);
    assert_eq!(g.cycles.len(), 1);
    assert_eq!(g.cycles[0], vec!["A.ts".to_string(), "B.ts".to_string()]);

    let signals = compute_signals(&g, &SignalConfig::default());
    assert!(signals.has_signal("A.ts", codes::CYCLE));
    assert!(signals.has_signal("B.ts", codes::CYCLE));
}

#[test]
fn externals_do_not_become_nodes() {
    let g = build(
        &["src/a.ts", "src/b.ts"],
        &[("src/a.ts", "npm:react"), ("src/b.ts", "npm:react"), ("src/b.ts", "npm:zod")],
    );
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 0);
    let usage = g.external_usage();
    assert_eq!(usage.get("react"), Some(&2));
    assert_eq!(usage.get("zod"), Some(&1));
}

#[test]
fn two_disjoint_cycles_sorted_by_start() {
    let g = build(
        &["lib/x.ts", "lib/y.ts", "app/p.ts", "app/q.ts", "app/r.ts"],
        &[
            ("lib/y.ts", "lib/x.ts"),
            ("lib/x.ts", "lib/y.ts"),
            ("app/r.ts", "app/p.ts"),
            ("app/p.ts", "app/q.ts"),
            ("app/q.ts", "app/r.ts"),
        ],
    );
    assert_eq!(
        g.cycles,
        vec![
            vec!["app/p.ts".to_string(), "app/q.ts".to_string(), "app/r.ts".to_string()],
            vec!["lib/x.ts".to_string(), "lib/y.ts".to_string()],
        ]
    );
}

// ---------------------------------------------------------------------------
// Signals over a small application
// ---------------------------------------------------------------------------

fn small_app() -> DependencyGraph {
    build(
        &[
            "src/main.ts",
            "src/index.ts",
            "src/routes/users.ts",
            "src/services/users.ts",
            "src/db/pool.ts",
            "src/util/log.ts",
            "tests/users.test.ts",
            "README.md",
        ],
        &[
            ("src/main.ts", "src/routes/users.ts"),
            ("src/main.ts", "src/util/log.ts"),
            ("src/routes/users.ts", "src/services/users.ts"),
            ("src/routes/users.ts", "src/util/log.ts"),
            ("src/services/users.ts", "src/db/pool.ts"),
            ("src/services/users.ts", "src/util/log.ts"),
            ("src/index.ts", "src/services/users.ts"),
            ("tests/users.test.ts", "src/services/users.ts"),
        ],
    )
}

#[test]
fn small_app_ranked_lists() {
    let signals = compute_signals(&small_app(), &SignalConfig::default());

    let entry: Vec<&str> = signals.entrypoints.iter().map(|i| i.file.as_str()).collect();
    assert_eq!(entry, vec!["src/main.ts", "src/index.ts"]);

    let api: Vec<&str> = signals.public_api.iter().map(|i| i.file.as_str()).collect();
    assert_eq!(api, vec!["src/index.ts"]);

    let fan_in: Vec<(&str, usize)> = signals
        .hubs_fan_in
        .iter()
        .map(|i| (i.file.as_str(), i.score))
        .collect();
    assert_eq!(
        fan_in,
        vec![
            ("src/services/users.ts", 3),
            ("src/util/log.ts", 3),
            ("src/db/pool.ts", 1),
            ("src/routes/users.ts", 1),
        ]
    );

    // Test files and docs are noise; only real orphans remain.
    assert_eq!(signals.orphans, vec!["src/index.ts", "src/main.ts"]);
    assert!(!signals.has_signal("tests/users.test.ts", codes::ORPHAN));
    assert!(!signals.has_signal("README.md", codes::ORPHAN));
}

#[test]
fn small_app_contracts() {
    let rules = [BoundaryRule {
        name: "services".to_string(),
        include: vec!["src/services/**".to_string()],
        expect_inbound: vec!["src/routes/**".to_string()],
        expect_outbound: vec!["src/db/**".to_string(), "src/cache/**".to_string()],
        ..BoundaryRule::default()
    }];
    let config = SignalConfig {
        patterns: CompiledPatterns::compile(&PatternConfig::default(), &rules).expect("compile"),
        ..SignalConfig::default()
    };
    let signals = compute_signals(&small_app(), &config);

    let contract = &signals.contract_signals["src/services/users.ts"];
    assert_eq!(contract.status, ContractStatus::Partial);
    assert_eq!(contract.evidence.outbound_missing, vec!["src/cache/**"]);
    assert!(signals.has_signal("src/services/users.ts", "C~"));
    assert!(signals.warnings.is_empty());
}

#[test]
fn ambiguous_boundary_is_a_risk_with_warning() {
    let rules = [BoundaryRule {
        name: "db".to_string(),
        include: vec!["src/db/**".to_string()],
        exclude: vec!["**/pool.ts".to_string()],
        ..BoundaryRule::default()
    }];
    let config = SignalConfig {
        patterns: CompiledPatterns::compile(&PatternConfig::default(), &rules).expect("compile"),
        ..SignalConfig::default()
    };
    let signals = compute_signals(&small_app(), &config);

    assert_eq!(
        signals.contract_signals["src/db/pool.ts"].status,
        ContractStatus::Uncertain
    );
    let pool = signals.file("src/db/pool.ts").expect("analyzed");
    assert!(pool.has_risk());
    assert_eq!(pool.inline[0].code, "C?");
    assert_eq!(signals.warnings.len(), 1);
}
