//! Parser manifest input.
//!
//! atlas does not parse source code itself. Any parser can feed it a JSON
//! manifest listing the analyzed files and each file's raw import
//! specifiers:
//!
//! ```json
//! {
//!   "files": ["src/index.ts", "src/util.ts"],
//!   "imports": { "src/index.ts": ["./util", "react"] }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use atlas_core::graph::{ParsedFile, normalize_id};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub files: Vec<String>,
    #[serde(default)]
    pub imports: BTreeMap<String, Vec<String>>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or a missing `files` array.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Manifest is not valid JSON")
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Specifier lists keyed by canonical file id.
    ///
    /// Keys are normalized the same way the graph normalizes file ids, and
    /// lists for keys that collapse together are concatenated. Blank
    /// specifiers name nothing and are dropped.
    ///
    /// # Errors
    ///
    /// Returns the [`atlas_core::AtlasError::InvalidFileId`] of the first
    /// key that cannot be normalized.
    pub fn parsed_files(&self) -> Result<BTreeMap<String, ParsedFile>> {
        let mut parsed: BTreeMap<String, ParsedFile> = BTreeMap::new();
        for (file, specifiers) in &self.imports {
            let id = normalize_id(file)?;
            let (kept, blank): (Vec<&String>, Vec<&String>) =
                specifiers.iter().partition(|spec| !spec.trim().is_empty());
            if !blank.is_empty() {
                debug!(file = %id, skipped = blank.len(), "dropping blank import specifiers");
            }
            parsed
                .entry(id)
                .or_default()
                .specifiers
                .extend(kept.into_iter().cloned());
        }
        Ok(parsed)
    }
}
