//! Ranked summary lists: orphans, entrypoints, public API and hubs.
//!
//! Every ranking breaks ties by byte order of the file id, so list order is a
//! function of the graph alone.

use crate::graph::{DependencyGraph, GraphNode};
use crate::model::SummaryItem;
use crate::patterns::CompiledPatterns;

/// Hub ranking direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubDirection {
    FanIn,
    FanOut,
}

impl HubDirection {
    fn degree(self, node: &GraphNode) -> usize {
        match self {
            Self::FanIn => node.incoming.len(),
            Self::FanOut => node.outgoing.len(),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::FanIn => "fan-in",
            Self::FanOut => "fan-out",
        }
    }
}

/// Files with no importers, split into `(visible, suppressed)`.
///
/// Orphans matching the noise patterns are suppressed unless `show_all`.
#[must_use]
pub fn orphans(
    graph: &DependencyGraph,
    patterns: &CompiledPatterns,
    show_all: bool,
) -> (Vec<String>, Vec<String>) {
    graph
        .nodes
        .values()
        .filter(|node| node.incoming.is_empty())
        .map(|node| node.id.clone())
        .partition(|id| show_all || !patterns.orphan_noise.is_match(id))
}

/// Files with no importers, at least one import, and a source location.
///
/// Ranked by the index of the first matching priority pattern, then by id.
#[must_use]
pub fn entrypoints(graph: &DependencyGraph, patterns: &CompiledPatterns) -> Vec<SummaryItem> {
    let mut items: Vec<SummaryItem> = graph
        .nodes
        .values()
        .filter(|node| node.incoming.is_empty() && !node.outgoing.is_empty())
        .filter(|node| !patterns.entrypoint_exclude.is_match(&node.id))
        .filter_map(|node| {
            let priority = patterns.entrypoint_priority(&node.id)?;
            let pattern = patterns
                .entrypoint_priority_src
                .get(priority)
                .map_or("?", String::as_str);
            Some(SummaryItem {
                file: node.id.clone(),
                reason: format!(
                    "no importers, imports {}, matches `{pattern}`",
                    node.outgoing.len()
                ),
                score: priority,
            })
        })
        .collect();

    items.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.file.cmp(&b.file)));
    items
}

/// Whether `id` sits on a public-API boundary.
#[must_use]
pub fn is_public_api(patterns: &CompiledPatterns, id: &str) -> bool {
    patterns.public_api_include.is_match(id) && !patterns.public_api_exclude.is_match(id)
}

/// Public-API files ranked by fan-in (descending), then id.
#[must_use]
pub fn public_api(graph: &DependencyGraph, patterns: &CompiledPatterns) -> Vec<SummaryItem> {
    let mut items: Vec<SummaryItem> = graph
        .nodes
        .values()
        .filter(|node| is_public_api(patterns, &node.id))
        .map(|node| SummaryItem {
            file: node.id.clone(),
            reason: format!("public boundary, fan-in {}", node.incoming.len()),
            score: node.incoming.len(),
        })
        .collect();

    sort_descending(&mut items);
    items
}

/// Every file with a nonzero degree in `direction`, strictly descending by
/// degree, ties by id.
#[must_use]
pub fn hubs(graph: &DependencyGraph, direction: HubDirection) -> Vec<SummaryItem> {
    let mut items: Vec<SummaryItem> = graph
        .nodes
        .values()
        .filter_map(|node| {
            let degree = direction.degree(node);
            (degree > 0).then(|| SummaryItem {
                file: node.id.clone(),
                reason: format!("{} {degree}", direction.label()),
                score: degree,
            })
        })
        .collect();

    sort_descending(&mut items);
    items
}

fn sort_descending(items: &mut [SummaryItem]) {
    items.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.file.cmp(&b.file)));
}
