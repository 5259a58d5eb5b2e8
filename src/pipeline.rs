use std::time::Duration;

use serde_json::Value;
use tracing::info;

use crate::classify::Classifier;
use crate::config::IngestConfig;
use crate::context::{PhaseDurations, RunContext, RunWarning};
use crate::edges::expand_edges;
use crate::error::GraphError;
use crate::realm::{SidConfidence, identify_realm_sid};
use crate::resolve::resolve_relations;
use crate::serialize::serialize_graph;
use crate::timers::PhaseTimer;
use crate::types::{DirectoryEntry, EntityKind, GraphOutput};

/// The graph produced by a run, together with its run context.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub graph: GraphOutput,
    pub context: RunContext,
}

impl RunOutput {
    /// Named JSON documents for the configured format.
    pub fn documents(&self) -> Result<Vec<(String, Value)>, GraphError> {
        self.graph.documents()
    }
}

/// Turns one directory export into a graph.
///
/// Stages run strictly in order: realm identification, classification (with
/// service principal binding), resolution, edge expansion, serialization.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: IngestConfig,
}

impl Pipeline {
    pub fn new(config: IngestConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Run every stage over `entries`.
    ///
    /// Fails only when the realm name is invalid or the realm SID cannot be
    /// found; everything else is counted in the returned context.
    pub fn run(&self, entries: &[DirectoryEntry]) -> Result<RunOutput, GraphError> {
        let mut durations = PhaseDurations::default();
        let mut total = Duration::ZERO;

        let (graph, mut context) = {
            let _timer = PhaseTimer::new(&mut total);
            self.run_stages(entries, &mut durations)?
        };

        durations.total = total;
        context.phases = durations.into();

        info!(
            event = "Pipeline",
            phase = "Summary",
            realm = context.realm.name.as_str(),
            entries = context.entry_count,
            domains = context.stats.entity_count(EntityKind::Domain),
            users = context.stats.entity_count(EntityKind::User),
            computers = context.stats.entity_count(EntityKind::Computer),
            groups = context.stats.entity_count(EntityKind::Group),
            hbac_services = context.stats.entity_count(EntityKind::HbacService),
            membership_rules = context.stats.membership_rules,
            hbac_rules = context.stats.hbac_rules,
            sudoer_rules = context.stats.sudoer_rules,
            unrecognized = context.stats.unrecognized_entries,
            unresolved = context.stats.unresolved_references,
            edges = context.stats.edges,
            warnings = context.warnings.len(),
            total_ms = context.phases.total_ms
        );

        Ok(RunOutput { graph, context })
    }

    fn run_stages(
        &self,
        entries: &[DirectoryEntry],
        durations: &mut PhaseDurations,
    ) -> Result<(GraphOutput, RunContext), GraphError> {
        let format = self.config.format;
        let realm = identify_realm_sid(&self.config.realm, entries, self.config.anonymous_fallback)?;

        let mut context = RunContext::new(realm, entries.len());
        if context.realm.confidence == SidConfidence::Degraded {
            let source_dn = context.realm.source_dn.clone();
            context.warn(RunWarning::DegradedRealmSid { source_dn });
        }

        let mut classification = {
            let _timer = PhaseTimer::new(&mut durations.classify);
            let classifier = Classifier::new(&context.realm, entries.len())?;
            classifier.classify(entries, &mut context)
        };

        let report = {
            let _timer = PhaseTimer::new(&mut durations.resolve);
            resolve_relations(
                &mut classification.registry,
                &mut classification.rules,
                format,
            )
        };
        context.stats.unresolved_references = report.unresolved_references;

        let edges = {
            let _timer = PhaseTimer::new(&mut durations.expand);
            expand_edges(&classification.rules, format)
        };
        context.stats.edges = edges.len();

        let graph = {
            let _timer = PhaseTimer::new(&mut durations.serialize);
            serialize_graph(&classification.registry, edges, &self.config)
        };

        Ok((graph, context))
    }
}
