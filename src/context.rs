//! Per-run state handed between pipeline stages and returned to the caller.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::realm::Realm;
use crate::types::{EntityKind, RuleCategory};

/// Conditions worth surfacing to the operator that do not stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunWarning {
    /// The realm SID was derived from the `admins` group, not read directly.
    DegradedRealmSid { source_dn: String },
    /// A second entry with an already registered DN was ignored.
    DuplicateDn { dn: String },
    /// An entry whose object id was already taken was ignored.
    DuplicateObjectId { id: String, dn: String },
}

/// Counters collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Entities registered per kind.
    pub entities: BTreeMap<EntityKind, usize>,
    pub membership_rules: usize,
    pub hbac_rules: usize,
    pub sudoer_rules: usize,
    /// Entries that matched no classification rule.
    pub unrecognized_entries: usize,
    /// HBAC rules skipped because `ipaEnabledFlag` was not `TRUE`.
    pub disabled_hbac_rules: usize,
    pub duplicate_entries: usize,
    /// Entities dropped because their object id was already taken.
    pub duplicate_object_ids: usize,
    pub synthetic_ids: usize,
    pub service_principals_joined: usize,
    pub service_principals_unmatched: usize,
    /// Explicit references that matched no candidate entity.
    pub unresolved_references: usize,
    pub edges: usize,
}

impl RunStats {
    pub fn entity_count(&self, kind: EntityKind) -> usize {
        self.entities.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_entities(&self) -> usize {
        self.entities.values().sum()
    }

    pub fn rule_count(&self, category: RuleCategory) -> usize {
        match category {
            RuleCategory::Membership => self.membership_rules,
            RuleCategory::Hbac => self.hbac_rules,
            RuleCategory::Sudoer => self.sudoer_rules,
        }
    }

    pub(crate) fn count_rule(&mut self, category: RuleCategory) {
        match category {
            RuleCategory::Membership => self.membership_rules += 1,
            RuleCategory::Hbac => self.hbac_rules += 1,
            RuleCategory::Sudoer => self.sudoer_rules += 1,
        }
    }
}

/// Wall-clock time per pipeline phase, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelinePhases {
    pub classify_ms: f64,
    pub resolve_ms: f64,
    pub expand_ms: f64,
    pub serialize_ms: f64,
    pub total_ms: f64,
}

impl PipelinePhases {
    /// Time not accounted for by the measured phases.
    pub fn overhead_ms(&self) -> f64 {
        self.total_ms - (self.classify_ms + self.resolve_ms + self.expand_ms + self.serialize_ms)
    }
}

/// Raw durations filled in by [`crate::timers::PhaseTimer`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PhaseDurations {
    pub classify: Duration,
    pub resolve: Duration,
    pub expand: Duration,
    pub serialize: Duration,
    pub total: Duration,
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

impl From<PhaseDurations> for PipelinePhases {
    fn from(durations: PhaseDurations) -> Self {
        PipelinePhases {
            classify_ms: millis(durations.classify),
            resolve_ms: millis(durations.resolve),
            expand_ms: millis(durations.expand),
            serialize_ms: millis(durations.serialize),
            total_ms: millis(durations.total),
        }
    }
}

/// Everything a caller may want to know about a run besides the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunContext {
    pub realm: Realm,
    /// Number of raw entries handed to the run.
    pub entry_count: usize,
    pub warnings: Vec<RunWarning>,
    pub stats: RunStats,
    pub phases: PipelinePhases,
}

impl RunContext {
    pub fn new(realm: Realm, entry_count: usize) -> Self {
        RunContext {
            realm,
            entry_count,
            warnings: Vec::new(),
            stats: RunStats::default(),
            phases: PipelinePhases::default(),
        }
    }

    pub fn warn(&mut self, warning: RunWarning) {
        self.warnings.push(warning);
    }

    /// The realm SID every entity is stamped with.
    pub fn realm_sid(&self) -> &str {
        &self.realm.sid
    }
}
