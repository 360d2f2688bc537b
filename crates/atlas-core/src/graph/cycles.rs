//! Cycle detection with a canonical ordering of each cycle.
//!
//! # Algorithm
//!
//! 1. Tarjan's SCC (via petgraph) over the import graph.
//! 2. Keep components with more than one member, plus single nodes with a
//!    self-edge.
//! 3. Canonicalize each component into one closed walk: start at the
//!    lexicographically smallest member and walk depth-first, trying
//!    in-component successors in ascending order, until an edge leads back
//!    to the start. The start is the smallest member, so whenever it is a
//!    direct successor it is taken first and the walk closes immediately;
//!    successors already on the walk are skipped, so the result is always a
//!    simple cycle.
//! 4. Sort cycles by their starting id.
//!
//! One walk per component can miss members that only sit on other loops of
//! the same component. [`cyclic_files`] returns every member of every
//! cyclic component, and that set is what receives the CYCLE tag.
//!
//! The output depends only on the edge structure, never on the order in
//! which files or edges were supplied.
//!
//! A cycle is reported without repeating the start: `[a, b, c]` stands for
//! `a → b → c → a`, and `[a]` for the self-edge `a → a`.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::graph::build::DependencyGraph;

/// Find every import cycle in `graph`, canonically ordered.
#[must_use]
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = cyclic_components(graph)
        .iter()
        .filter_map(|members| canonical_walk(graph, members))
        .collect();

    cycles.sort_unstable();
    cycles
}

/// Every file that belongs to a cyclic component, whether or not the
/// component's canonical walk passes through it.
#[must_use]
pub fn cyclic_files(graph: &DependencyGraph) -> BTreeSet<String> {
    cyclic_components(graph)
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect()
}

/// Components with more than one member, plus single nodes with a self-edge.
fn cyclic_components(graph: &DependencyGraph) -> Vec<BTreeSet<&str>> {
    let mut pg = DiGraph::<&str, ()>::with_capacity(graph.node_count(), graph.edge_count());
    let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(graph.node_count());
    for id in graph.file_ids() {
        index.insert(id, pg.add_node(id));
    }
    for (from, to) in graph.edges() {
        pg.add_edge(index[from], index[to], ());
    }

    tarjan_scc(&pg)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|&node| pg.find_edge(node, node).is_some())
        })
        .map(|component| component.iter().map(|&idx| pg[idx]).collect())
        .collect()
}

/// Depth-first closed walk from the smallest member of `members`.
///
/// Returns `None` only if `members` is not strongly connected, which cannot
/// happen for a Tarjan component.
fn canonical_walk(graph: &DependencyGraph, members: &BTreeSet<&str>) -> Option<Vec<String>> {
    let start = *members.first()?;

    let mut visited: BTreeSet<&str> = BTreeSet::from([start]);
    // Each frame: (node, its sorted in-component successors, next index to try).
    let mut stack: Vec<(&str, Vec<&str>, usize)> =
        vec![(start, successors(graph, members, start), 0)];

    while let Some(frame) = stack.last_mut() {
        let Some(&next) = frame.1.get(frame.2) else {
            stack.pop();
            continue;
        };
        frame.2 += 1;

        if next == start {
            return Some(stack.iter().map(|(id, _, _)| (*id).to_string()).collect());
        }
        if visited.insert(next) {
            stack.push((next, successors(graph, members, next), 0));
        }
    }

    None
}

fn successors<'g>(graph: &'g DependencyGraph, members: &BTreeSet<&str>, id: &str) -> Vec<&'g str> {
    graph.node(id).map_or_else(Vec::new, |node| {
        node.outgoing
            .iter()
            .map(String::as_str)
            .filter(|next| members.contains(*next))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::graph::build::{ParsedFile, ResolvedTarget};

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
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
            ResolvedTarget::Internal(spec.to_string())
        })
        .expect("build")
    }

    fn ids(cycle: &[&str]) -> Vec<String> {
        cycle.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
        assert!(g.cycles.is_empty());
    }

    #[test]
    fn two_node_cycle_starts_at_smallest() {
        let g = graph(&["b.ts", "a.ts"], &[("b.ts", "a.ts"), ("a.ts", "b.ts")]);
        assert_eq!(g.cycles, vec![ids(&["a.ts", "b.ts"])]);
    }

    #[test]
    fn walk_prefers_smallest_successor() {
        // a -> c -> a and a -> b -> c: from a, b is tried before c.
        let g = graph(
            &["a", "b", "c"],
            &[("a", "b"), ("a", "c"), ("b", "c"), ("c", "a")],
        );
        assert_eq!(g.cycles, vec![ids(&["a", "b", "c"])]);
    }

    #[test]
    fn walk_backtracks_out_of_inner_loops() {
        // Greedy smallest-edge walk would spin in b <-> c forever.
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "b"), ("c", "d"), ("d", "a")],
        );
        assert_eq!(g.cycles, vec![ids(&["a", "b", "c", "d"])]);
    }

    #[test]
    fn multiple_components_sorted_by_start() {
        let g = graph(
            &["x", "y", "m", "n", "self"],
            &[("x", "y"), ("y", "x"), ("n", "m"), ("m", "n"), ("self", "self")],
        );
        assert_eq!(
            g.cycles,
            vec![ids(&["m", "n"]), ids(&["self"]), ids(&["x", "y"])]
        );
    }

    #[test]
    fn cyclic_files_cover_members_off_the_walk() {
        // a <-> b is the walk; c and d only loop back through b.
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "a"), ("b", "c"), ("c", "d"), ("d", "b")],
        );
        assert_eq!(g.cycles, vec![ids(&["a", "b"])]);
        let files = cyclic_files(&g);
        let members: Vec<&str> = files.iter().map(String::as_str).collect();
        assert_eq!(members, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn cyclic_files_skip_acyclic_nodes() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "a"), ("b", "c")]);
        let members = cyclic_files(&g);
        assert!(!members.contains("c"));
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn cycles_close_over_real_edges() {
        let g = graph(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("d", "e"), ("e", "c")],
        );
        assert_eq!(g.cycles.len(), 1);
        let cycle = &g.cycles[0];
        for (i, from) in cycle.iter().enumerate() {
            let to = &cycle[(i + 1) % cycle.len()];
            assert!(g.has_edge(from, to), "{from} -> {to} must be an edge");
        }
    }
}
