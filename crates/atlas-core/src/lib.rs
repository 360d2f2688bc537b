//! atlas-core library.
//!
//! The dependency graph engine and signal computer behind `atlas`:
//!
//! - [`graph`]: builds the import graph from parsed specifiers and detects
//!   cycles.
//! - [`signals`]: derives inline tags, ranked summary lists and contract
//!   evidence.
//! - [`budget`], [`patterns`], [`config`]: the immutable configuration the
//!   stages consume.
//!
//! # Conventions
//!
//! - **Errors**: configuration errors are [`error::AtlasError`]; loaders
//!   return `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod budget;
pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod patterns;
pub mod signals;

pub use budget::{BudgetProfile, Budgets, Limit};
pub use error::{AtlasError, ErrorCode};
pub use graph::{DependencyGraph, GraphNode, ParsedFile, ResolvedTarget, Resolver};
pub use model::{
    ContractEvidence, ContractSignal, ContractStatus, FileSignals, Signal, SignalKind,
    SignalsResult, SummaryItem,
};
pub use signals::{SignalConfig, compute_signals};
