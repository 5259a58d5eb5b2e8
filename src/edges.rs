//! Edge expansion.
//!
//! The graph has no edge properties, so a rule fans out into one edge per
//! combination of its label-bearing values, starts and ends.

use itertools::iproduct;
use tracing::debug;

use crate::config::OutputFormat;
use crate::types::{Edge, RelationRule, RuleKind};

/// Expand every resolved rule into edges, in rule order.
///
/// Legacy output carries membership in the per-group `Members` lists, so
/// membership rules produce no edges there.
pub fn expand_edges(rules: &[RelationRule], format: OutputFormat) -> Vec<Edge> {
    let edges: Vec<Edge> = rules
        .iter()
        .filter(|rule| {
            format == OutputFormat::Unified || !matches!(rule.kind(), RuleKind::Membership)
        })
        .flat_map(expand_rule)
        .collect();

    debug!(event = "Expand", phase = "Done", rules = rules.len(), edges = edges.len());
    edges
}

/// Expand one rule. A rule with no resolved starts or ends yields nothing.
pub fn expand_rule(rule: &RelationRule) -> Vec<Edge> {
    let resolution = rule.resolution();
    let (starts, ends) = (&resolution.starts, &resolution.ends);

    match rule.kind() {
        RuleKind::Membership => iproduct!(starts, ends)
            .map(|(start, end)| Edge::member_of(start, end))
            .collect(),
        RuleKind::Hbac {
            resolved_services, ..
        } => iproduct!(resolved_services, starts, ends)
            .map(|(service, start, end)| Edge::hbac(service, start, end))
            .collect(),
        RuleKind::Sudoer { commands, run_as } => iproduct!(commands, starts, ends, run_as)
            .map(|(command, start, end, user)| Edge::sudoer(command, user, start, end))
            .collect(),
    }
}
