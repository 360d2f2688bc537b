//! Hierarchical view of the flat file set.
//!
//! Children of every directory are kept in one canonical order: directories
//! and files interleaved, sorted by name in byte order. A directory sorts
//! before a file of the same name. Collapse and truncation downstream rely on
//! this order.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// One node of the file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Directory {
        name: String,
        rel_path: String,
        children: Vec<TreeNode>,
    },
    File {
        name: String,
        rel_path: String,
        extension: Option<String>,
    },
}

impl TreeNode {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => name,
        }
    }

    #[must_use]
    pub fn rel_path(&self) -> &str {
        match self {
            Self::Directory { rel_path, .. } | Self::File { rel_path, .. } => rel_path,
        }
    }

    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// Number of files anywhere beneath (or 1 for a file).
    #[must_use]
    pub fn file_count(&self) -> usize {
        match self {
            Self::File { .. } => 1,
            Self::Directory { children, .. } => children.iter().map(Self::file_count).sum(),
        }
    }

    /// Every file path beneath, in canonical order.
    #[must_use]
    pub fn file_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::File { rel_path, .. } => out.push(rel_path),
            Self::Directory { children, .. } => {
                for child in children {
                    child.collect_files(out);
                }
            }
        }
    }
}

#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeSet<String>,
}

impl DirBuilder {
    fn insert(&mut self, segments: &[&str]) {
        match segments {
            [] => {}
            [file] => {
                self.files.insert((*file).to_string());
            }
            [dir, rest @ ..] => self.dirs.entry((*dir).to_string()).or_default().insert(rest),
        }
    }

    fn finish(self, name: String, rel_path: String) -> TreeNode {
        let join = |child: &str| {
            if rel_path.is_empty() {
                child.to_string()
            } else {
                format!("{rel_path}/{child}")
            }
        };

        // (name, is_file) keys give byte order with directories first on ties.
        let mut children: Vec<((String, bool), TreeNode)> =
            Vec::with_capacity(self.dirs.len() + self.files.len());
        for (dir, builder) in self.dirs {
            let path = join(&dir);
            children.push(((dir.clone(), false), builder.finish(dir, path)));
        }
        for file in self.files {
            let node = TreeNode::File {
                rel_path: join(&file),
                extension: extension(&file),
                name: file.clone(),
            };
            children.push(((file, true), node));
        }
        children.sort_by(|a, b| a.0.cmp(&b.0));

        TreeNode::Directory {
            name,
            rel_path,
            children: children.into_iter().map(|(_, node)| node).collect(),
        }
    }
}

fn extension(name: &str) -> Option<String> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_string()),
        _ => None,
    }
}

/// Build the tree for `files` (canonical ids). The root is an unnamed
/// directory with an empty `rel_path`.
#[must_use]
pub fn build_tree<'a, I>(files: I) -> TreeNode
where
    I: IntoIterator<Item = &'a str>,
{
    let mut root = DirBuilder::default();
    for file in files {
        let segments: Vec<&str> = file.split('/').filter(|s| !s.is_empty()).collect();
        root.insert(&segments);
    }
    root.finish(String::new(), String::new())
}
