//! Path-pattern configuration for orphan filtering, entrypoint priority,
//! public-API boundaries and contract rules.
//!
//! [`PatternConfig`] is the serializable form (strings, as written in
//! `.atlas/config.toml`). [`CompiledPatterns`] is the immutable compiled
//! form handed to the signal computer. Globs are compiled with
//! `literal_separator`, so `*` never crosses a `/`; use `**` for that.

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::AtlasError;

// ---------------------------------------------------------------------------
// Serializable configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Orphans matching these are hidden unless orphans are explicitly shown.
    #[serde(default = "default_orphan_noise")]
    pub orphan_noise: Vec<String>,
    /// Entrypoint locations, highest priority first.
    #[serde(default = "default_entrypoint_priority")]
    pub entrypoint_priority: Vec<String>,
    #[serde(default = "default_entrypoint_exclude")]
    pub entrypoint_exclude: Vec<String>,
    #[serde(default = "default_public_api_include")]
    pub public_api_include: Vec<String>,
    #[serde(default = "default_public_api_exclude")]
    pub public_api_exclude: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            orphan_noise: default_orphan_noise(),
            entrypoint_priority: default_entrypoint_priority(),
            entrypoint_exclude: default_entrypoint_exclude(),
            public_api_include: default_public_api_include(),
            public_api_exclude: default_public_api_exclude(),
        }
    }
}

/// A named architectural boundary with the edges it is expected to have.
///
/// A file inside the boundary (matches `include`, not `exclude`) is checked
/// for inbound edges from files matching each `expect_inbound` anchor and
/// outbound edges to files matching each `expect_outbound` anchor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundaryRule {
    pub name: String,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub expect_inbound: Vec<String>,
    #[serde(default)]
    pub expect_outbound: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_orphan_noise() -> Vec<String> {
    strings(&[
        "**/test/**",
        "**/tests/**",
        "**/__tests__/**",
        "**/*.test.*",
        "**/*.spec.*",
        "**/*_test.*",
        "**/test_*.py",
        "**/docs/**",
        "**/*.md",
        "**/*.lock",
        "**/package-lock.json",
        "**/dist/**",
        "**/build/**",
        "**/target/**",
        "**/node_modules/**",
        "**/vendor/**",
        "**/.venv/**",
    ])
}

fn default_entrypoint_priority() -> Vec<String> {
    strings(&[
        "src/main.*",
        "main.*",
        "src/index.*",
        "index.*",
        "src/bin/**",
        "bin/**",
        "cmd/**",
        "src/cli.*",
        "cli.*",
        "src/app.*",
        "app.*",
        "src/server.*",
        "server.*",
        "**/__main__.py",
        "scripts/**",
        "src/**",
    ])
}

fn default_entrypoint_exclude() -> Vec<String> {
    strings(&[
        "**/test/**",
        "**/tests/**",
        "**/__tests__/**",
        "**/*.test.*",
        "**/*.spec.*",
        "**/docs/**",
        "**/examples/**",
        "**/example/**",
        "**/dist/**",
        "**/build/**",
        "**/target/**",
    ])
}

fn default_public_api_include() -> Vec<String> {
    strings(&[
        "src/lib.*",
        "**/index.ts",
        "**/index.tsx",
        "**/index.js",
        "**/index.mjs",
        "**/lib.rs",
        "**/__init__.py",
        "**/api/**",
        "**/public/**",
    ])
}

fn default_public_api_exclude() -> Vec<String> {
    strings(&[
        "**/test/**",
        "**/tests/**",
        "**/__tests__/**",
        "**/examples/**",
        "**/internal/**",
        "**/private/**",
    ])
}

// ---------------------------------------------------------------------------
// Compiled form
// ---------------------------------------------------------------------------

/// A compiled boundary rule.
#[derive(Debug, Clone)]
pub struct CompiledBoundary {
    pub name: String,
    pub include: GlobSet,
    pub exclude: GlobSet,
    /// `(pattern, matcher)` per expected inbound anchor, in config order.
    pub inbound: Vec<(String, GlobMatcher)>,
    /// `(pattern, matcher)` per expected outbound anchor, in config order.
    pub outbound: Vec<(String, GlobMatcher)>,
}

/// Immutable, compiled pattern configuration.
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    pub orphan_noise: GlobSet,
    pub entrypoint_priority: GlobSet,
    /// Source text of `entrypoint_priority`, index-aligned with the set.
    pub entrypoint_priority_src: Vec<String>,
    pub entrypoint_exclude: GlobSet,
    pub public_api_include: GlobSet,
    pub public_api_exclude: GlobSet,
    pub boundaries: Vec<CompiledBoundary>,
}

impl CompiledPatterns {
    /// Compile pattern strings and boundary rules.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidPattern`] for the first glob that fails
    /// to parse.
    pub fn compile(config: &PatternConfig, rules: &[BoundaryRule]) -> Result<Self, AtlasError> {
        let boundaries = rules
            .iter()
            .map(|rule| {
                Ok(CompiledBoundary {
                    name: rule.name.clone(),
                    include: build_set(&rule.include)?,
                    exclude: build_set(&rule.exclude)?,
                    inbound: build_matchers(&rule.expect_inbound)?,
                    outbound: build_matchers(&rule.expect_outbound)?,
                })
            })
            .collect::<Result<Vec<_>, AtlasError>>()?;

        Ok(Self {
            orphan_noise: build_set(&config.orphan_noise)?,
            entrypoint_priority: build_set(&config.entrypoint_priority)?,
            entrypoint_priority_src: config.entrypoint_priority.clone(),
            entrypoint_exclude: build_set(&config.entrypoint_exclude)?,
            public_api_include: build_set(&config.public_api_include)?,
            public_api_exclude: build_set(&config.public_api_exclude)?,
            boundaries,
        })
    }

    /// Index of the highest-priority entrypoint pattern matching `path`.
    #[must_use]
    pub fn entrypoint_priority(&self, path: &str) -> Option<usize> {
        self.entrypoint_priority.matches(path).into_iter().min()
    }
}

impl Default for CompiledPatterns {
    fn default() -> Self {
        // The built-in defaults are static and known to compile.
        Self::compile(&PatternConfig::default(), &[]).unwrap_or_else(|err| {
            unreachable!("built-in patterns must compile: {err}")
        })
    }
}

fn glob(pattern: &str) -> Result<Glob, AtlasError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| AtlasError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn build_set(patterns: &[String]) -> Result<GlobSet, AtlasError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(glob(pattern)?);
    }
    builder.build().map_err(|source| AtlasError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}

fn build_matchers(patterns: &[String]) -> Result<Vec<(String, GlobMatcher)>, AtlasError> {
    patterns
        .iter()
        .map(|pattern| Ok((pattern.clone(), glob(pattern)?.compile_matcher())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_compile() {
        let compiled = CompiledPatterns::default();
        assert!(compiled.boundaries.is_empty());
        assert_eq!(
            compiled.entrypoint_priority_src.len(),
            PatternConfig::default().entrypoint_priority.len()
        );
    }

    #[test]
    fn single_star_does_not_cross_directories() {
        let compiled = CompiledPatterns::default();
        // `src/main.*` only matches directly under src/.
        assert_eq!(compiled.entrypoint_priority("src/main.ts"), Some(0));
        assert_ne!(compiled.entrypoint_priority("src/nested/main.ts"), Some(0));
    }

    #[test]
    fn earliest_matching_priority_wins() {
        let compiled = CompiledPatterns::default();
        // Matches both `src/index.*` and the catch-all `src/**`.
        let idx = compiled.entrypoint_priority("src/index.ts").expect("matches");
        assert_eq!(compiled.entrypoint_priority_src[idx], "src/index.*");
    }

    #[test]
    fn double_star_matches_zero_directories() {
        let compiled = CompiledPatterns::default();
        assert!(compiled.orphan_noise.is_match("tests/helpers.ts"));
        assert!(compiled.orphan_noise.is_match("pkg/a/tests/helpers.ts"));
        assert!(compiled.orphan_noise.is_match("README.md"));
        assert!(!compiled.orphan_noise.is_match("src/util.ts"));
    }

    #[test]
    fn invalid_glob_is_reported() {
        let config = PatternConfig {
            orphan_noise: vec!["src/[unclosed".to_string()],
            ..PatternConfig::default()
        };
        let err = CompiledPatterns::compile(&config, &[]).expect_err("bad glob");
        assert!(matches!(err, AtlasError::InvalidPattern { .. }));
        assert!(err.to_string().contains("src/[unclosed"));
    }

    #[test]
    fn boundary_rules_compile_anchors_in_order() {
        let rule = BoundaryRule {
            name: "services".to_string(),
            include: vec!["src/services/**".to_string()],
            exclude: vec![],
            expect_inbound: vec!["src/routes/**".to_string(), "src/jobs/**".to_string()],
            expect_outbound: vec!["src/db/**".to_string()],
        };
        let compiled =
            CompiledPatterns::compile(&PatternConfig::default(), &[rule]).expect("compile");
        let boundary = &compiled.boundaries[0];
        assert_eq!(boundary.inbound[0].0, "src/routes/**");
        assert_eq!(boundary.inbound[1].0, "src/jobs/**");
        assert!(boundary.outbound[0].1.is_match("src/db/pool.ts"));
    }
}
