//! Output budgets and named budget profiles.
//!
//! Every list the renderer emits is capped by one field of [`Budgets`].
//! Full-signal mode swaps every field for [`Limit::Unbounded`], so nothing is
//! truncated and no truncation notices are produced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AtlasError;

/// A single budget: either a positive cap or unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    Bounded(usize),
    Unbounded,
}

impl Limit {
    /// Number of entries out of `total` that fit within this limit.
    #[must_use]
    pub fn take(self, total: usize) -> usize {
        match self {
            Self::Bounded(cap) => total.min(cap),
            Self::Unbounded => total,
        }
    }

    /// Number of entries out of `total` hidden by this limit.
    #[must_use]
    pub fn hidden(self, total: usize) -> usize {
        total - self.take(total)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(cap) => write!(f, "{cap}"),
            Self::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Caps for the summary lists, the tree and the local-dependency section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budgets {
    pub entrypoints_top_n: Limit,
    pub public_api_top_n: Limit,
    pub hubs_top_n: Limit,
    pub inline_per_file_max: Limit,
    /// How many nodes per direction are tagged as hubs.
    pub hubs_top_m: Limit,
    pub list_budget: Limit,
    pub deep_dive_budget: Limit,
}

impl Budgets {
    /// Every budget unbounded (full-signal mode).
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            entrypoints_top_n: Limit::Unbounded,
            public_api_top_n: Limit::Unbounded,
            hubs_top_n: Limit::Unbounded,
            inline_per_file_max: Limit::Unbounded,
            hubs_top_m: Limit::Unbounded,
            list_budget: Limit::Unbounded,
            deep_dive_budget: Limit::Unbounded,
        }
    }

    /// Reject zero-valued bounded budgets.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidBudget`] naming the first offending field.
    pub fn validate(&self) -> Result<(), AtlasError> {
        let fields = [
            ("entrypoints_top_n", self.entrypoints_top_n),
            ("public_api_top_n", self.public_api_top_n),
            ("hubs_top_n", self.hubs_top_n),
            ("inline_per_file_max", self.inline_per_file_max),
            ("hubs_top_m", self.hubs_top_m),
            ("list_budget", self.list_budget),
            ("deep_dive_budget", self.deep_dive_budget),
        ];
        for (field, limit) in fields {
            if limit == Limit::Bounded(0) {
                return Err(AtlasError::InvalidBudget { field, value: 0 });
            }
        }
        Ok(())
    }

    /// Whether no budget caps anything (full-signal mode).
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        *self == Self::unbounded()
    }
}

impl Default for Budgets {
    fn default() -> Self {
        BudgetProfile::Default.budgets()
    }
}

/// Named budget presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetProfile {
    Compact,
    #[default]
    Default,
    Wide,
}

impl BudgetProfile {
    #[must_use]
    pub const fn budgets(self) -> Budgets {
        let (top_n, inline, hubs_m, list, deep_dive) = match self {
            Self::Compact => (5, 3, 5, 5, 3),
            Self::Default => (10, 4, 10, 10, 5),
            Self::Wide => (25, 8, 20, 25, 10),
        };
        Budgets {
            entrypoints_top_n: Limit::Bounded(top_n),
            public_api_top_n: Limit::Bounded(top_n),
            hubs_top_n: Limit::Bounded(top_n),
            inline_per_file_max: Limit::Bounded(inline),
            hubs_top_m: Limit::Bounded(hubs_m),
            list_budget: Limit::Bounded(list),
            deep_dive_budget: Limit::Bounded(deep_dive),
        }
    }

    /// Tree depth used when the caller does not pass one.
    #[must_use]
    pub const fn default_depth(self) -> usize {
        match self {
            Self::Compact => 2,
            Self::Default => 3,
            Self::Wide => 5,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Default => "default",
            Self::Wide => "wide",
        }
    }
}

impl fmt::Display for BudgetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetProfile {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "default" => Ok(Self::Default),
            "wide" => Ok(Self::Wide),
            other => Err(AtlasError::UnknownProfile(other.to_string())),
        }
    }
}
