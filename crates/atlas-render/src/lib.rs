//! atlas-render library.
//!
//! Turns a [`DependencyGraph`] and its [`SignalsResult`] into the repository
//! map:
//!
//! - [`tree`]: the flat file set as a canonical directory tree.
//! - [`collapse`]: depth-limited collapsing that keeps risk counts visible.
//! - [`impact`]: the shortest import chain from a focus file to public API.
//! - [`render`]: section assembly and list budgets.

pub mod collapse;
pub mod impact;
pub mod render;
pub mod tree;

use atlas_core::{AtlasError, DependencyGraph, SignalsResult};

pub use render::{
    EMPTY_LIST, EMPTY_TREE, HUB_HINT, NO_PUBLIC_SURFACE, RenderOptions, render_report,
    truncation_notice,
};
pub use tree::{TreeNode, build_tree};

/// Build the tree from the graph's files and render the report.
///
/// # Errors
///
/// Propagates configuration errors from [`render_report`].
pub fn render_map(
    graph: &DependencyGraph,
    signals: &SignalsResult,
    options: &RenderOptions,
) -> Result<String, AtlasError> {
    let tree = build_tree(graph.file_ids());
    render_report(&tree, graph, signals, options)
}
