//! Default specifier resolver for manifest input.
//!
//! Resolution order for `(from, specifier)`:
//!
//! 1. Relative specifiers (`./x`, `../x`, `.`, `..`) are joined onto the
//!    importing file's directory.
//! 2. Rooted specifiers (`/x`) and bare specifiers that name a repo path are
//!    looked up from the repository root.
//! 3. Candidates are probed against the file set: the path itself, the path
//!    plus each known extension, then index files inside the path.
//! 4. Anything left is external, named by its package: `@scope/name` for
//!    scoped packages, otherwise the first path segment.
//!
//! A relative specifier that finds no file stays internal with its joined
//! path, which the graph builder records as an external. One that escapes
//! the root is external verbatim.

use std::collections::BTreeSet;

use atlas_core::graph::{ResolvedTarget, Resolver};

/// Extensions appended when probing, in priority order.
pub const PROBE_EXTENSIONS: &[&str] = &[
    ".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".mts", ".cts", ".py", ".rs",
];

/// Index files probed inside a directory specifier, in priority order.
pub const INDEX_FILES: &[&str] = &[
    "index.ts",
    "index.tsx",
    "index.js",
    "index.jsx",
    "index.mjs",
    "index.cjs",
    "__init__.py",
    "mod.rs",
    "lib.rs",
];

/// Resolves specifiers against a fixed set of canonical file ids.
#[derive(Debug, Clone, Default)]
pub struct FileSetResolver {
    files: BTreeSet<String>,
}

impl FileSetResolver {
    #[must_use]
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// First file in the set matching `base`, its extensions or its index
    /// files.
    fn probe(&self, base: &str) -> Option<String> {
        if base.is_empty() {
            return INDEX_FILES
                .iter()
                .find(|index| self.files.contains(**index))
                .map(|index| (*index).to_string());
        }
        if self.files.contains(base) {
            return Some(base.to_string());
        }
        PROBE_EXTENSIONS
            .iter()
            .map(|ext| format!("{base}{ext}"))
            .chain(INDEX_FILES.iter().map(|index| format!("{base}/{index}")))
            .find(|candidate| self.files.contains(candidate))
    }
}

impl Resolver for FileSetResolver {
    fn resolve(&self, from: &str, specifier: &str) -> ResolvedTarget {
        let specifier = specifier.trim();
        if is_relative(specifier) {
            let dir = from.rsplit_once('/').map_or("", |(dir, _)| dir);
            return match join(dir, specifier) {
                Some(joined) => match self.probe(&joined) {
                    Some(id) => ResolvedTarget::Internal(id),
                    None if joined.is_empty() => ResolvedTarget::External(specifier.to_string()),
                    None => ResolvedTarget::Internal(joined),
                },
                None => ResolvedTarget::External(specifier.to_string()),
            };
        }

        if let Some(rooted) = specifier.strip_prefix('/') {
            return match join("", rooted) {
                Some(joined) => ResolvedTarget::Internal(self.probe(&joined).unwrap_or(joined)),
                None => ResolvedTarget::External(specifier.to_string()),
            };
        }

        if !specifier.is_empty()
            && let Some(id) = join("", specifier).and_then(|joined| self.probe(&joined))
        {
            return ResolvedTarget::Internal(id);
        }
        ResolvedTarget::External(package_name(specifier))
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Join `rel` onto `dir`, resolving `.` and `..`. `None` when the result
/// would escape the repository root.
fn join(dir: &str, rel: &str) -> Option<String> {
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in rel.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

/// Package name of a bare specifier: `@scope/name` or the first segment.
#[must_use]
pub fn package_name(specifier: &str) -> String {
    let mut parts = specifier.split('/');
    match (parts.next(), parts.next()) {
        (Some(scope), Some(name)) if scope.starts_with('@') && !name.is_empty() => {
            format!("{scope}/{name}")
        }
        (Some(first), _) if !first.is_empty() => first.to_string(),
        _ => specifier.to_string(),
    }
}
