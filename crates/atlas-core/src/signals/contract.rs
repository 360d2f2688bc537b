//! Contract evidence: does a file inside a configured boundary actually have
//! the inbound and outbound edges its boundary expects?
//!
//! Status rules, first match wins:
//!
//! | condition                                              | status |
//! |--------------------------------------------------------|--------|
//! | one rule matches the file by both include and exclude  | `C?`   |
//! | any rule excludes the file                             | `C0`   |
//! | no rule includes the file                              | `C0`   |
//! | included, no anchor configured or none found           | `C0`   |
//! | included, every anchor found                           | `C+`   |
//! | included, some anchors found                           | `C~`   |
//!
//! The including rule is the first matching rule in config order.

use crate::graph::{DependencyGraph, GraphNode};
use crate::model::{ContractEvidence, ContractSignal, ContractStatus};
use crate::patterns::CompiledBoundary;

/// Evaluate one node against the boundary rules.
///
/// Returns the signal and, for ambiguous matches, an advisory warning.
#[must_use]
pub fn evaluate(
    node: &GraphNode,
    boundaries: &[CompiledBoundary],
) -> (ContractSignal, Option<String>) {
    let id = node.id.as_str();

    if let Some(rule) = boundaries
        .iter()
        .find(|rule| rule.include.is_match(id) && rule.exclude.is_match(id))
    {
        let warning = format!(
            "ambiguous boundary rule `{}`: {id} matches both an inclusion and an exclusion pattern",
            rule.name
        );
        let signal = ContractSignal {
            status: ContractStatus::Uncertain,
            evidence: ContractEvidence {
                included_by: Some(rule.name.clone()),
                excluded_by: Some(rule.name.clone()),
                ..ContractEvidence::default()
            },
        };
        return (signal, Some(warning));
    }

    let included = boundaries.iter().find(|rule| rule.include.is_match(id));
    let excluded = boundaries.iter().find(|rule| rule.exclude.is_match(id));

    let mut evidence = ContractEvidence {
        included_by: included.map(|rule| rule.name.clone()),
        excluded_by: excluded.map(|rule| rule.name.clone()),
        ..ContractEvidence::default()
    };

    let Some(rule) = included.filter(|_| excluded.is_none()) else {
        return (
            ContractSignal {
                status: ContractStatus::None,
                evidence,
            },
            None,
        );
    };

    for (pattern, matcher) in &rule.inbound {
        if node.incoming.iter().any(|from| matcher.is_match(from)) {
            evidence.inbound_found.push(pattern.clone());
        } else {
            evidence.inbound_missing.push(pattern.clone());
        }
    }
    for (pattern, matcher) in &rule.outbound {
        if node.outgoing.iter().any(|to| matcher.is_match(to)) {
            evidence.outbound_found.push(pattern.clone());
        } else {
            evidence.outbound_missing.push(pattern.clone());
        }
    }

    let status = match (evidence.found(), evidence.expected()) {
        (0, _) => ContractStatus::None,
        (found, expected) if found == expected => ContractStatus::Confirmed,
        _ => ContractStatus::Partial,
    };
    (ContractSignal { status, evidence }, None)
}

/// Warnings for boundary rules whose inclusion patterns match no file.
#[must_use]
pub fn unmatched_rules(graph: &DependencyGraph, boundaries: &[CompiledBoundary]) -> Vec<String> {
    boundaries
        .iter()
        .filter(|rule| !graph.file_ids().any(|id| rule.include.is_match(id)))
        .map(|rule| format!("boundary rule `{}` matched no files", rule.name))
        .collect()
}
