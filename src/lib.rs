// src/lib.rs
pub use classify::{
    Classification, Classifier, EntryClass, ServicePrincipalFact, hbac_rule,
    join_service_principals, service_principal_facts, sudo_rule,
};
pub use config::{IngestConfig, OutputFormat};
pub use context::{PipelinePhases, RunContext, RunStats, RunWarning};
pub use edges::{expand_edges, expand_rule};
pub use error::GraphError;
pub use identity::{IdentityAssigner, SYNTHETIC_RID_OFFSET};
pub use pipeline::{Pipeline, RunOutput};
pub use realm::{Realm, SidConfidence, identify_realm_sid, realm_suffix};
pub use registry::{EntityRegistry, InsertError};
pub use resolve::{ResolveReport, resolve_group_members, resolve_relations, resolve_rule};
pub use serialize::{legacy_bundle, serialize_graph, unified_document};
pub use traits::GraphNode;
pub use types::*;

mod classify;
mod config;
mod context;
mod edges;
mod error;
mod identity;
mod pipeline;
mod realm;
mod registry;
mod resolve;
mod serialize;
mod timers;
mod traits;
pub mod types;

#[cfg(test)]
mod tests;
