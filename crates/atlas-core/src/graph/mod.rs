//! Import graph module.
//!
//! # Overview
//!
//! Builds a [`DependencyGraph`] from the file set, the parser's specifier
//! lists and an injected [`Resolver`], then detects import cycles.
//!
//! ## Pipeline
//!
//! ```text
//! files + ParsedFile per file + Resolver
//!        ↓  build::DependencyGraph::build()
//! DependencyGraph
//!   ├─ nodes:  BTreeMap<id, GraphNode> (symmetric incoming/outgoing)
//!   └─ cycles: canonical closed walks (cycles::find_cycles)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use atlas_core::graph::{DependencyGraph, ParsedFile, ResolvedTarget};
//!
//! let files = vec!["a.ts".to_string(), "b.ts".to_string()];
//! let parsed = BTreeMap::from([(
//!     "a.ts".to_string(),
//!     ParsedFile { specifiers: vec!["b.ts".to_string()] },
//! )]);
//! let resolve = |_: &str, spec: &str| ResolvedTarget::Internal(spec.to_string());
//!
//! let graph = DependencyGraph::build(&files, &parsed, &resolve).unwrap();
//! assert!(graph.has_edge("a.ts", "b.ts"));
//! ```

pub mod build;
pub mod cycles;

pub use build::{DependencyGraph, GraphNode, ParsedFile, ResolvedTarget, Resolver, normalize_id};
pub use cycles::{cyclic_files, find_cycles};
