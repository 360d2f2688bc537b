//! Depth-limited tree collapsing that never hides risk silently.
//!
//! # Algorithm
//!
//! A post-order fold over the tree. Every subtree yields a [`Subtree`]:
//! its rendered lines plus file, directory and risk-file counts. A parent
//! composes its children's results; no state is shared between branches.
//!
//! Top-level entries sit at level 1. A directory at a level greater than the
//! depth limit is replaced by a stub line carrying its aggregates, unless it
//! is on the ancestor chain of the focus path. Stubs report the hidden risk
//! count whenever it is nonzero, so a cycle buried under a collapsed
//! directory still shows up.
//!
//! The stub's subdirectory count includes the collapsed directory itself:
//! `a/b/c/file1.ts` at depth 2 collapses `c` to `c/ ... (1 file, 1 subdir)`.

use crate::tree::TreeNode;

/// Per-file rendering hooks supplied by the renderer.
pub trait FileAnnotator {
    /// The full line for a file (name plus annotations), without indent.
    fn file_line(&self, rel_path: &str, name: &str) -> String;

    /// Whether the file carries a risk-kind inline signal.
    fn has_risk(&self, rel_path: &str) -> bool;
}

/// Collapse parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollapseOptions<'a> {
    /// Deepest directory level rendered in full; `None` renders everything.
    pub depth: Option<usize>,
    /// Files or directories whose ancestor chains are always expanded.
    pub focus: &'a [&'a str],
}

/// Result of folding one subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subtree {
    pub lines: Vec<String>,
    pub files: usize,
    /// Directories in the subtree, the subtree root included.
    pub dirs: usize,
    /// Files carrying a risk signal.
    pub risks: usize,
    /// Whether any directory in the subtree was replaced by a stub.
    pub collapsed: bool,
}

const INDENT: &str = "  ";

/// Fold `tree` into rendered lines.
///
/// `tree` is normally the unnamed root from [`crate::tree::build_tree`],
/// whose children render at level 1 without a header line.
#[must_use]
pub fn collapse_tree<A>(tree: &TreeNode, options: &CollapseOptions<'_>, annotator: &A) -> Subtree
where
    A: FileAnnotator + ?Sized,
{
    fold(tree, 0, options, annotator)
}

fn fold<A>(node: &TreeNode, level: usize, options: &CollapseOptions<'_>, annotator: &A) -> Subtree
where
    A: FileAnnotator + ?Sized,
{
    match node {
        TreeNode::File { name, rel_path, .. } => Subtree {
            lines: vec![annotator.file_line(rel_path, name)],
            files: 1,
            dirs: 0,
            risks: usize::from(annotator.has_risk(rel_path)),
            collapsed: false,
        },
        TreeNode::Directory {
            name,
            rel_path,
            children,
        } => {
            let mut acc = Subtree {
                dirs: usize::from(level > 0),
                ..Subtree::default()
            };
            let mut child_lines = Vec::new();
            for child in children {
                let sub = fold(child, level + 1, options, annotator);
                acc.files += sub.files;
                acc.dirs += sub.dirs;
                acc.risks += sub.risks;
                acc.collapsed |= sub.collapsed;
                child_lines.extend(sub.lines);
            }

            if level == 0 {
                acc.lines = child_lines;
                return acc;
            }

            let too_deep = options.depth.is_some_and(|limit| level > limit);
            if too_deep && !on_focus_chain(rel_path, options.focus) {
                acc.lines = vec![stub_line(name, acc.files, acc.dirs, acc.risks)];
                acc.collapsed = true;
                return acc;
            }

            acc.lines = std::iter::once(format!("{name}/"))
                .chain(child_lines.into_iter().map(|line| format!("{INDENT}{line}")))
                .collect();
            acc
        }
    }
}

/// Whether the directory at `rel_path` is a focus path or an ancestor of one.
#[must_use]
pub fn on_focus_chain(rel_path: &str, focus: &[&str]) -> bool {
    focus.iter().any(|focus| {
        *focus == rel_path
            || focus
                .strip_prefix(rel_path)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// `{name}/ ... ({F} file[s], {D} subdir[s])` plus ` ({R} hidden risk[s])`
/// when `risks > 0`.
#[must_use]
pub fn stub_line(name: &str, files: usize, dirs: usize, risks: usize) -> String {
    let mut line = format!(
        "{name}/ ... ({files} {}, {dirs} {})",
        plural(files, "file", "files"),
        plural(dirs, "subdir", "subdirs"),
    );
    if risks > 0 {
        line.push_str(&format!(
            " ({risks} {})",
            plural(risks, "hidden risk", "hidden risks")
        ));
    }
    line
}

const fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
