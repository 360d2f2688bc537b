//! Impact path: the shortest import chain from a focus file to public surface.
//!
//! # Algorithm
//!
//! 1. Breadth-first search over outgoing edges from the focus file gives the
//!    distance `D` to the nearest PUBLIC-API node.
//! 2. Among all paths of length `D` ending at a PUBLIC-API node, pick the one
//!    whose rendered form (`a -> b -> c`) is smallest as a string. The search
//!    walks the shortest-path DAG in lexicographic successor order and prunes
//!    any prefix that can no longer beat the best path found so far.
//!
//! A focus file that is itself PUBLIC-API has the one-node path `[focus]`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use atlas_core::DependencyGraph;
use atlas_core::model::{SignalsResult, codes};

/// Separator between ids in a rendered path.
pub const ARROW: &str = " -> ";

/// Render a path as ids joined by [`ARROW`].
#[must_use]
pub fn render_path(path: &[String]) -> String {
    path.join(ARROW)
}

/// The canonical impact path from `focus`, or `None` when no PUBLIC-API node
/// is reachable.
#[must_use]
pub fn impact_path(
    graph: &DependencyGraph,
    signals: &SignalsResult,
    focus: &str,
) -> Option<Vec<String>> {
    if !graph.contains(focus) {
        return None;
    }
    let is_target = |id: &str| signals.has_signal(id, codes::PUBLIC_API);

    // Step 1: BFS distances; stop expanding past the first target level.
    let mut dist: BTreeMap<&str, usize> = BTreeMap::from([(focus, 0)]);
    let mut queue: VecDeque<&str> = VecDeque::from([focus]);
    let mut target_dist: Option<usize> = None;
    while let Some(id) = queue.pop_front() {
        let d = dist[id];
        if target_dist.is_some_and(|td| d >= td) {
            continue;
        }
        if is_target(id) {
            target_dist = Some(d);
            continue;
        }
        let Some(node) = graph.node(id) else {
            continue;
        };
        for next in &node.outgoing {
            if !dist.contains_key(next.as_str()) {
                dist.insert(next.as_str(), d + 1);
                queue.push_back(next.as_str());
            }
        }
    }
    let depth = target_dist?;

    // Step 2: nodes on some shortest path to a target at distance `depth`.
    let mut useful: BTreeSet<&str> = dist
        .iter()
        .filter(|&(id, &d)| d == depth && is_target(*id))
        .map(|(id, _)| *id)
        .collect();
    for level in (0..depth).rev() {
        let layer: Vec<&str> = dist
            .iter()
            .filter(|&(_, &d)| d == level)
            .map(|(id, _)| *id)
            .filter(|id| {
                graph.node(id).is_some_and(|node| {
                    node.outgoing
                        .iter()
                        .any(|next| {
                            dist.get(next.as_str()) == Some(&(level + 1))
                                && useful.contains(next.as_str())
                        })
                })
            })
            .collect();
        useful.extend(layer);
    }

    // Step 3: smallest rendered path over the DAG.
    let mut search = Search {
        graph,
        dist: &dist,
        useful: &useful,
        depth,
        best: None,
    };
    let mut path = vec![focus];
    search.walk(&mut path, focus.to_string());
    search
        .best
        .map(|(path, _)| path.into_iter().map(str::to_string).collect())
}

struct Search<'g> {
    graph: &'g DependencyGraph,
    dist: &'g BTreeMap<&'g str, usize>,
    useful: &'g BTreeSet<&'g str>,
    depth: usize,
    best: Option<(Vec<&'g str>, String)>,
}

impl<'g> Search<'g> {
    fn walk(&mut self, path: &mut Vec<&'g str>, rendered: String) {
        if let Some((_, best)) = &self.best
            && !can_beat(&rendered, best)
        {
            return;
        }

        let level = path.len() - 1;
        if level == self.depth {
            let better = self.best.as_ref().is_none_or(|(_, best)| rendered < *best);
            if better {
                self.best = Some((path.clone(), rendered));
            }
            return;
        }

        let Some(current) = path.last().copied() else {
            return;
        };
        let Some(node) = self.graph.node(current) else {
            return;
        };
        for next in &node.outgoing {
            let next = next.as_str();
            if self.dist.get(next) != Some(&(level + 1)) || !self.useful.contains(next) {
                continue;
            }
            path.push(next);
            self.walk(path, format!("{rendered}{ARROW}{next}"));
            path.pop();
        }
    }
}

/// Whether some extension of `prefix` can still sort before `best`.
fn can_beat(prefix: &str, best: &str) -> bool {
    let n = prefix.len().min(best.len());
    match prefix.as_bytes()[..n].cmp(&best.as_bytes()[..n]) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => prefix.len() < best.len(),
    }
}

#[cfg(test)]
mod tests {
    use atlas_core::graph::{ParsedFile, ResolvedTarget};
    use atlas_core::{SignalConfig, compute_signals};

    use super::*;

    fn setup(nodes: &[&str], edges: &[(&str, &str)]) -> (DependencyGraph, SignalsResult) {
        let files: Vec<String> = nodes.iter().map(|s| (*s).to_string()).collect();
        let mut parsed: BTreeMap<String, ParsedFile> = BTreeMap::new();
        for (from, to) in edges {
            parsed
                .entry((*from).to_string())
                .or_default()
                .specifiers
                .push((*to).to_string());
        }
        let graph = DependencyGraph::build(&files, &parsed, &|_: &str, spec: &str| {
            ResolvedTarget::Internal(spec.to_string())
        })
        .expect("build");
        let signals = compute_signals(&graph, &SignalConfig::default());
        (graph, signals)
    }

    #[test]
    fn equal_length_paths_pick_smallest_rendering() {
        let (g, s) = setup(
            &["src/focus.ts", "src/x.ts", "src/y.ts", "src/a/index.ts", "src/b/index.ts"],
            &[
                ("src/focus.ts", "src/y.ts"),
                ("src/focus.ts", "src/x.ts"),
                ("src/x.ts", "src/b/index.ts"),
                ("src/y.ts", "src/a/index.ts"),
            ],
        );
        let path = impact_path(&g, &s, "src/focus.ts").expect("reachable");
        assert_eq!(
            render_path(&path),
            "src/focus.ts -> src/x.ts -> src/b/index.ts"
        );
    }

    #[test]
    fn shortest_wins_over_smaller_longer_path() {
        let (g, s) = setup(
            &["f.ts", "a.ts", "b.ts", "z/index.ts"],
            &[("f.ts", "a.ts"), ("a.ts", "b.ts"), ("b.ts", "z/index.ts"), ("f.ts", "z/index.ts")],
        );
        let path = impact_path(&g, &s, "f.ts").expect("reachable");
        assert_eq!(path, vec!["f.ts", "z/index.ts"]);
    }

    #[test]
    fn dead_end_branch_is_skipped() {
        // `a.ts` sorts first but its two-hop continuation is not public.
        let (g, s) = setup(
            &["f.ts", "a.ts", "a2.ts", "m.ts", "api/index.ts"],
            &[("f.ts", "a.ts"), ("a.ts", "a2.ts"), ("f.ts", "m.ts"), ("m.ts", "api/index.ts")],
        );
        let path = impact_path(&g, &s, "f.ts").expect("reachable");
        assert_eq!(render_path(&path), "f.ts -> m.ts -> api/index.ts");
    }

    #[test]
    fn public_focus_is_its_own_path() {
        let (g, s) = setup(&["src/index.ts", "src/a.ts"], &[("src/index.ts", "src/a.ts")]);
        assert_eq!(
            impact_path(&g, &s, "src/index.ts"),
            Some(vec!["src/index.ts".to_string()])
        );
    }

    #[test]
    fn unreachable_surface_is_none() {
        let (g, s) = setup(&["a.ts", "b.ts", "lib/index.ts"], &[("a.ts", "b.ts")]);
        assert_eq!(impact_path(&g, &s, "a.ts"), None);
        assert_eq!(impact_path(&g, &s, "missing.ts"), None);
    }

    #[test]
    fn prefix_pruning_compares_bytes() {
        assert!(can_beat("a -> b", "a -> c -> d"));
        assert!(!can_beat("a -> d", "a -> c -> d"));
        assert!(can_beat("a -> c", "a -> c -> d"));
        assert!(!can_beat("a -> c -> d", "a -> c -> d"));
    }
}
