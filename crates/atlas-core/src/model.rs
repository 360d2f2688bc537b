//! Signal data model shared by the signal computer and the renderer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity class of an inline signal. Declaration order is render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Risk,
    Hint,
    Nav,
    Context,
}

impl SignalKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Risk => "risk",
            Self::Hint => "hint",
            Self::Nav => "nav",
            Self::Context => "context",
        }
    }
}

/// Inline signal codes.
pub mod codes {
    pub const CYCLE: &str = "CYCLE";
    pub const ORPHAN: &str = "ORPHAN";
    pub const ENTRYPOINT: &str = "ENTRYPOINT";
    pub const PUBLIC_API: &str = "PUBLIC-API";
    pub const HUB_IN: &str = "HUB-IN";
    pub const HUB_OUT: &str = "HUB-OUT";
}

/// A tag attached inline to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub code: String,
}

impl Signal {
    #[must_use]
    pub fn new(kind: SignalKind, code: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
        }
    }

    #[must_use]
    pub fn is_risk(&self) -> bool {
        self.kind == SignalKind::Risk
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.code)
    }
}

/// All inline signals of one file, in render order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSignals {
    pub file: String,
    pub inline: Vec<Signal>,
}

impl FileSignals {
    #[must_use]
    pub fn has_risk(&self) -> bool {
        self.inline.iter().any(Signal::is_risk)
    }

    #[must_use]
    pub fn has(&self, code: &str) -> bool {
        self.inline.iter().any(|s| s.code == code)
    }
}

/// One entry of a ranked summary list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub file: String,
    pub reason: String,
    pub score: usize,
}

/// Contract evidence status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    /// Every expected anchor was found.
    #[serde(rename = "C+")]
    Confirmed,
    /// The file matches both an inclusion and an exclusion pattern.
    #[serde(rename = "C?")]
    Uncertain,
    /// No evidence either way.
    #[serde(rename = "C0")]
    None,
    /// Some but not all expected anchors were found.
    #[serde(rename = "C~")]
    Partial,
}

impl ContractStatus {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Confirmed => "C+",
            Self::Uncertain => "C?",
            Self::None => "C0",
            Self::Partial => "C~",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which anchors were found or missing for one file, and which rules matched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContractEvidence {
    pub inbound_found: Vec<String>,
    pub inbound_missing: Vec<String>,
    pub outbound_found: Vec<String>,
    pub outbound_missing: Vec<String>,
    /// Boundary rule whose inclusion pattern matched.
    pub included_by: Option<String>,
    /// Boundary rule whose exclusion pattern matched.
    pub excluded_by: Option<String>,
}

impl ContractEvidence {
    #[must_use]
    pub fn found(&self) -> usize {
        self.inbound_found.len() + self.outbound_found.len()
    }

    #[must_use]
    pub fn expected(&self) -> usize {
        self.found() + self.inbound_missing.len() + self.outbound_missing.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSignal {
    pub status: ContractStatus,
    pub evidence: ContractEvidence,
}

/// Everything the signal computer derives from a dependency graph.
///
/// `files` is sorted by file id; every ranked list is in rank order and holds
/// every qualifying file. Truncation is the renderer's job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalsResult {
    pub files: Vec<FileSignals>,
    pub entrypoints: Vec<SummaryItem>,
    pub public_api: Vec<SummaryItem>,
    pub hubs_fan_in: Vec<SummaryItem>,
    pub hubs_fan_out: Vec<SummaryItem>,
    /// Orphans after noise filtering (or all orphans when shown explicitly).
    pub orphans: Vec<String>,
    pub warnings: Vec<String>,
    pub contract_signals: BTreeMap<String, ContractSignal>,
}

impl SignalsResult {
    /// Inline signals for `file`, if it was analyzed.
    #[must_use]
    pub fn file(&self, file: &str) -> Option<&FileSignals> {
        self.files
            .binary_search_by(|fs| fs.file.as_str().cmp(file))
            .ok()
            .map(|idx| &self.files[idx])
    }

    #[must_use]
    pub fn has_signal(&self, file: &str, code: &str) -> bool {
        self.file(file).is_some_and(|fs| fs.has(code))
    }

    /// Whether `file` is tagged as a hub in either direction.
    #[must_use]
    pub fn is_hub(&self, file: &str) -> bool {
        self.file(file)
            .is_some_and(|fs| fs.has(codes::HUB_IN) || fs.has(codes::HUB_OUT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_order_risk_first() {
        let mut kinds = vec![
            SignalKind::Context,
            SignalKind::Nav,
            SignalKind::Risk,
            SignalKind::Hint,
        ];
        kinds.sort();
        assert_eq!(
            kinds,
            vec![SignalKind::Risk, SignalKind::Hint, SignalKind::Nav, SignalKind::Context]
        );
    }

    #[test]
    fn contract_status_serializes_as_code() {
        let json = serde_json::to_string(&ContractStatus::Partial).expect("serialize");
        assert_eq!(json, "\"C~\"");
        assert_eq!(ContractStatus::Uncertain.to_string(), "C?");
    }

    #[test]
    fn file_lookup_uses_sorted_files() {
        let result = SignalsResult {
            files: vec![
                FileSignals {
                    file: "a.ts".to_string(),
                    inline: vec![Signal::new(SignalKind::Risk, codes::CYCLE)],
                },
                FileSignals {
                    file: "b.ts".to_string(),
                    inline: vec![Signal::new(SignalKind::Context, codes::HUB_IN)],
                },
            ],
            ..SignalsResult::default()
        };
        assert!(result.has_signal("a.ts", codes::CYCLE));
        assert!(result.file("a.ts").is_some_and(FileSignals::has_risk));
        assert!(result.is_hub("b.ts"));
        assert!(!result.is_hub("a.ts"));
        assert!(result.file("c.ts").is_none());
    }

    #[test]
    fn evidence_counts_both_directions() {
        let evidence = ContractEvidence {
            inbound_found: vec!["src/routes/**".to_string()],
            outbound_missing: vec!["src/db/**".to_string()],
            ..ContractEvidence::default()
        };
        assert_eq!(evidence.found(), 1);
        assert_eq!(evidence.expected(), 2);
    }
}
