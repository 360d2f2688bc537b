//! Per-file signals and ranked summary lists.
//!
//! # Overview
//!
//! [`compute_signals`] is a pure function of the graph and a
//! [`SignalConfig`]. It tags files inline (CYCLE, ORPHAN, ENTRYPOINT,
//! PUBLIC-API, HUB-IN, HUB-OUT, contract status), builds the four ranked
//! lists and evaluates contract evidence.
//!
//! ## Determinism
//!
//! Files are visited in id order and every ranking breaks ties by id, so
//! two runs over the same graph produce identical results, list order
//! included.

pub mod contract;
pub mod rank;

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::budget::Budgets;
use crate::graph::{DependencyGraph, cyclic_files};
use crate::model::{ContractStatus, FileSignals, Signal, SignalKind, SignalsResult, codes};
use crate::patterns::CompiledPatterns;

pub use rank::HubDirection;

/// Inputs besides the graph.
#[derive(Debug, Clone, Default)]
pub struct SignalConfig {
    pub patterns: CompiledPatterns,
    pub budgets: Budgets,
    /// Tag noise-pattern orphans too.
    pub show_orphans: bool,
}

/// Derive every signal, ranked list and contract status from `graph`.
#[must_use]
#[instrument(skip_all, fields(files = graph.node_count(), cycles = graph.cycles.len()))]
pub fn compute_signals(graph: &DependencyGraph, config: &SignalConfig) -> SignalsResult {
    let patterns = &config.patterns;

    // Every member of a cyclic component, not only those on its listed walk.
    let in_cycle = cyclic_files(graph);

    let (orphans, suppressed) = rank::orphans(graph, patterns, config.show_orphans);
    let orphan_set: BTreeSet<&str> = orphans.iter().map(String::as_str).collect();

    let entrypoints = rank::entrypoints(graph, patterns);
    let entry_set: BTreeSet<&str> = entrypoints.iter().map(|i| i.file.as_str()).collect();

    let public_api = rank::public_api(graph, patterns);
    let hubs_fan_in = rank::hubs(graph, HubDirection::FanIn);
    let hubs_fan_out = rank::hubs(graph, HubDirection::FanOut);

    let top_m = config.budgets.hubs_top_m;
    let hub_in: BTreeSet<&str> = hubs_fan_in
        .iter()
        .take(top_m.take(hubs_fan_in.len()))
        .map(|i| i.file.as_str())
        .collect();
    let hub_out: BTreeSet<&str> = hubs_fan_out
        .iter()
        .take(top_m.take(hubs_fan_out.len()))
        .map(|i| i.file.as_str())
        .collect();

    let mut warnings = contract::unmatched_rules(graph, &patterns.boundaries);
    let mut contract_signals = std::collections::BTreeMap::new();
    let mut files = Vec::with_capacity(graph.node_count());

    for node in graph.nodes.values() {
        let id = node.id.as_str();
        let (contract, warning) = contract::evaluate(node, &patterns.boundaries);
        warnings.extend(warning);

        let mut inline = Vec::new();
        if in_cycle.contains(id) {
            inline.push(Signal::new(SignalKind::Risk, codes::CYCLE));
        }
        if orphan_set.contains(id) {
            inline.push(Signal::new(SignalKind::Hint, codes::ORPHAN));
        }
        if entry_set.contains(id) {
            inline.push(Signal::new(SignalKind::Nav, codes::ENTRYPOINT));
        }
        if rank::is_public_api(patterns, id) {
            inline.push(Signal::new(SignalKind::Nav, codes::PUBLIC_API));
        }
        if hub_in.contains(id) {
            inline.push(Signal::new(SignalKind::Context, codes::HUB_IN));
        }
        if hub_out.contains(id) {
            inline.push(Signal::new(SignalKind::Context, codes::HUB_OUT));
        }
        match contract.status {
            ContractStatus::Uncertain => {
                inline.push(Signal::new(SignalKind::Risk, contract.status.code()));
            }
            ContractStatus::Confirmed | ContractStatus::Partial => {
                inline.push(Signal::new(SignalKind::Context, contract.status.code()));
            }
            ContractStatus::None => {}
        }
        // Stable: keeps the push order within a kind.
        inline.sort_by_key(|signal| signal.kind);

        files.push(FileSignals {
            file: node.id.clone(),
            inline,
        });
        contract_signals.insert(node.id.clone(), contract);
    }

    debug!(
        entrypoints = entrypoints.len(),
        public_api = public_api.len(),
        orphans = orphans.len(),
        suppressed_orphans = suppressed.len(),
        warnings = warnings.len(),
        "signals computed"
    );

    SignalsResult {
        files,
        entrypoints,
        public_api,
        hubs_fan_in,
        hubs_fan_out,
        orphans,
        warnings,
        contract_signals,
    }
}
