//! Graph construction from parsed import specifiers.
//!
//! # Overview
//!
//! The builder receives the full set of internal file ids, each file's parsed
//! specifier list and a [`Resolver`]. Every file becomes exactly one
//! [`GraphNode`], including files that import nothing and are imported by
//! nothing.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A imports B". Edges are recorded on both ends at
//! insertion time: `B ∈ A.outgoing` iff `A ∈ B.incoming`.
//!
//! ## Determinism
//!
//! All node-keyed data lives in `BTreeMap`/`BTreeSet`, so every enumeration
//! is in byte order of the id regardless of input order.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::AtlasError;
use crate::graph::cycles::find_cycles;

// ---------------------------------------------------------------------------
// Resolver seam
// ---------------------------------------------------------------------------

/// Where an import specifier points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum ResolvedTarget {
    /// A file id inside the analyzed repository.
    Internal(String),
    /// A module outside the repository (package name).
    External(String),
}

/// Maps `(from_file, specifier)` to a target.
///
/// Resolvers are total: every pair yields a target. Resolution failures are
/// the resolver's concern and should surface as [`ResolvedTarget::External`].
pub trait Resolver {
    fn resolve(&self, from: &str, specifier: &str) -> ResolvedTarget;
}

impl<F> Resolver for F
where
    F: Fn(&str, &str) -> ResolvedTarget,
{
    fn resolve(&self, from: &str, specifier: &str) -> ResolvedTarget {
        self(from, specifier)
    }
}

/// Parser output for one file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedFile {
    pub specifiers: Vec<String>,
}

// ---------------------------------------------------------------------------
// Graph types
// ---------------------------------------------------------------------------

/// One analyzed file and its import relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Files this file imports.
    pub outgoing: BTreeSet<String>,
    /// Files importing this file.
    pub incoming: BTreeSet<String>,
    /// Non-repository modules this file imports.
    pub externals: BTreeSet<String>,
}

impl GraphNode {
    fn new(id: String) -> Self {
        Self {
            id,
            outgoing: BTreeSet::new(),
            incoming: BTreeSet::new(),
            externals: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn fan_in(&self) -> usize {
        self.incoming.len()
    }

    #[must_use]
    pub fn fan_out(&self) -> usize {
        self.outgoing.len()
    }
}

/// The import graph of one repository snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: BTreeMap<String, GraphNode>,
    /// Canonical cycles, sorted by starting id. See [`find_cycles`].
    pub cycles: Vec<Vec<String>>,
}

impl DependencyGraph {
    /// Build the graph and detect cycles.
    ///
    /// `parsed` is keyed by canonical file id. Files missing from `parsed`
    /// are treated as having no imports.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidFileId`] for ids that cannot be
    /// normalized and [`AtlasError::DuplicateFileId`] when two inputs
    /// normalize to the same id.
    #[instrument(skip_all, fields(files = files.len()))]
    pub fn build<R>(
        files: &[String],
        parsed: &BTreeMap<String, ParsedFile>,
        resolver: &R,
    ) -> Result<Self, AtlasError>
    where
        R: Resolver + ?Sized,
    {
        // Step 1: one node per file, rejecting duplicates.
        let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
        for raw in files {
            let id = normalize_id(raw)?;
            if nodes.contains_key(&id) {
                return Err(AtlasError::DuplicateFileId(id));
            }
            nodes.insert(id.clone(), GraphNode::new(id));
        }

        // Step 2: resolve every specifier in id order.
        let ids: Vec<String> = nodes.keys().cloned().collect();
        let mut edges: BTreeSet<(String, String)> = BTreeSet::new();
        let mut externals: Vec<(String, String)> = Vec::new();

        for from in &ids {
            let Some(file) = parsed.get(from) else {
                continue;
            };
            for specifier in &file.specifiers {
                match resolver.resolve(from, specifier) {
                    ResolvedTarget::Internal(target) => match normalize_id(&target) {
                        Ok(target) if nodes.contains_key(&target) => {
                            edges.insert((from.clone(), target));
                        }
                        _ => {
                            debug!(from = %from, specifier = %specifier, target = %target,
                                "internal target outside file set; recording as external");
                            externals.push((from.clone(), target));
                        }
                    },
                    ResolvedTarget::External(name) => externals.push((from.clone(), name)),
                }
            }
        }

        // Step 3: record edges symmetrically.
        for (from, to) in &edges {
            if let Some(node) = nodes.get_mut(from) {
                node.outgoing.insert(to.clone());
            }
            if let Some(node) = nodes.get_mut(to) {
                node.incoming.insert(from.clone());
            }
        }
        for (from, name) in externals {
            if let Some(node) = nodes.get_mut(&from) {
                node.externals.insert(name);
            }
        }

        let mut graph = Self {
            nodes,
            cycles: Vec::new(),
        };
        graph.cycles = find_cycles(&graph);

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            cycles = graph.cycles.len(),
            "dependency graph built"
        );
        Ok(graph)
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(GraphNode::fan_out).sum()
    }

    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.node(from).is_some_and(|node| node.outgoing.contains(to))
    }

    /// All edges `(from, to)` in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.values().flat_map(|node| {
            node.outgoing
                .iter()
                .map(move |to| (node.id.as_str(), to.as_str()))
        })
    }

    /// File ids in lexicographic order.
    pub fn file_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// External module names with the number of files importing each.
    #[must_use]
    pub fn external_usage(&self) -> BTreeMap<&str, usize> {
        let mut usage: BTreeMap<&str, usize> = BTreeMap::new();
        for node in self.nodes.values() {
            for name in &node.externals {
                *usage.entry(name.as_str()).or_default() += 1;
            }
        }
        usage
    }

    /// BLAKE3 fingerprint of the node and edge sets.
    ///
    /// Two graphs with the same files and edges hash identically no matter
    /// what order their inputs arrived in.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for id in self.file_ids() {
            hasher.update(b"n\x00");
            hasher.update(id.as_bytes());
            hasher.update(b"\x00");
        }
        for (from, to) in self.edges() {
            hasher.update(b"e\x00");
            hasher.update(from.as_bytes());
            hasher.update(b"\x00");
            hasher.update(to.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }
}

// ---------------------------------------------------------------------------
// Id normalization
// ---------------------------------------------------------------------------

/// Canonicalize a repo-relative path: POSIX separators, no leading `./`,
/// no empty or `.` segments.
///
/// # Errors
///
/// Returns [`AtlasError::InvalidFileId`] for empty ids, absolute paths and
/// ids containing `..` segments.
pub fn normalize_id(raw: &str) -> Result<String, AtlasError> {
    let invalid = |reason| AtlasError::InvalidFileId {
        id: raw.to_string(),
        reason,
    };

    let posix = raw.replace('\\', "/");
    if posix.starts_with('/') {
        return Err(invalid("absolute paths are not repo-relative"));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in posix.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(invalid("`..` segments escape the repository")),
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(invalid("empty path"));
    }
    Ok(segments.join("/"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
