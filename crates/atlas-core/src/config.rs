use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::budget::{BudgetProfile, Budgets, Limit};
use crate::error::{AtlasError, ErrorCode};
use crate::patterns::{BoundaryRule, CompiledPatterns, PatternConfig};

/// Relative location of the project config file.
pub const CONFIG_PATH: &str = ".atlas/config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub patterns: PatternConfig,
    #[serde(default)]
    pub boundary: Vec<BoundaryRule>,
    #[serde(default)]
    pub budgets: BudgetConfig,
}

impl ProjectConfig {
    /// Compile `[patterns]` and every `[[boundary]]` rule.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidPattern`] for the first bad glob.
    pub fn compile_patterns(&self) -> Result<CompiledPatterns, AtlasError> {
        CompiledPatterns::compile(&self.patterns, &self.boundary)
    }
}

/// `[budgets]`: a profile plus optional per-field overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetConfig {
    #[serde(default)]
    pub profile: BudgetProfile,
    #[serde(default)]
    pub entrypoints_top_n: Option<usize>,
    #[serde(default)]
    pub public_api_top_n: Option<usize>,
    #[serde(default)]
    pub hubs_top_n: Option<usize>,
    #[serde(default)]
    pub inline_per_file_max: Option<usize>,
    #[serde(default)]
    pub hubs_top_m: Option<usize>,
    #[serde(default)]
    pub list_budget: Option<usize>,
    #[serde(default)]
    pub deep_dive_budget: Option<usize>,
}

impl BudgetConfig {
    /// Effective budgets for `profile` (or the configured profile when
    /// `None`), with overrides applied.
    ///
    /// Overrides apply on top of whichever profile wins, so a CLI
    /// `--profile` keeps project-level tweaks.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidBudget`] when any resulting budget is 0.
    pub fn resolve(&self, profile: Option<BudgetProfile>) -> Result<Budgets, AtlasError> {
        let mut budgets = profile.unwrap_or(self.profile).budgets();
        let overrides = [
            (&mut budgets.entrypoints_top_n, self.entrypoints_top_n),
            (&mut budgets.public_api_top_n, self.public_api_top_n),
            (&mut budgets.hubs_top_n, self.hubs_top_n),
            (&mut budgets.inline_per_file_max, self.inline_per_file_max),
            (&mut budgets.hubs_top_m, self.hubs_top_m),
            (&mut budgets.list_budget, self.list_budget),
            (&mut budgets.deep_dive_budget, self.deep_dive_budget),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value {
                *slot = Limit::Bounded(value);
            }
        }
        budgets.validate()?;
        Ok(budgets)
    }
}

/// Load `.atlas/config.toml` under `project_root`, or defaults when absent.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(CONFIG_PATH);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content).with_context(|| {
        format!(
            "{}: Failed to parse {}",
            ErrorCode::ConfigParseError.code(),
            path.display()
        )
    })
}
