//! Rendering the registry and edges as graph documents.

use strum::IntoEnumIterator;
use tracing::debug;

use crate::config::IngestConfig;
use crate::config::OutputFormat;
use crate::registry::EntityRegistry;
use crate::types::{
    Edge, Entity, EntityKind, Graph, GraphDocument, GraphMetadata, GraphOutput, LegacyBundle,
    LegacyDocument, LegacyEdgeDocument, LegacyObject, Node,
};

/// Render the graph in the configured format.
pub fn serialize_graph(registry: &EntityRegistry, edges: Vec<Edge>, config: &IngestConfig) -> GraphOutput {
    debug!(
        event = "Serialize",
        phase = "Start",
        format = %config.format,
        nodes = registry.len(),
        edges = edges.len()
    );

    match config.format {
        OutputFormat::Unified => GraphOutput::Unified(unified_document(registry, edges, &config.source_kind)),
        OutputFormat::Legacy => GraphOutput::Legacy(legacy_bundle(registry, edges)),
    }
}

/// Nodes grouped by kind, each kind in input order.
pub fn unified_document(registry: &EntityRegistry, edges: Vec<Edge>, source_kind: &str) -> GraphDocument {
    let nodes = EntityKind::iter()
        .flat_map(|kind| registry.of_kind(kind))
        .map(node)
        .collect();

    GraphDocument {
        metadata: GraphMetadata {
            source_kind: source_kind.to_string(),
        },
        graph: Graph { nodes, edges },
    }
}

fn node(entity: &Entity) -> Node {
    Node {
        id: entity.object_id().to_string(),
        kinds: vec![entity.kind().to_string()],
        properties: entity.properties(),
    }
}

/// One document per account kind; HBAC services have no legacy shape.
pub fn legacy_bundle(registry: &EntityRegistry, edges: Vec<Edge>) -> LegacyBundle {
    let document = |kind: EntityKind, name: &str| {
        LegacyDocument::new(name, registry.of_kind(kind).map(legacy_object).collect())
    };

    LegacyBundle {
        domains: document(EntityKind::Domain, "domains"),
        users: document(EntityKind::User, "users"),
        groups: document(EntityKind::Group, "groups"),
        computers: document(EntityKind::Computer, "computers"),
        edges: LegacyEdgeDocument {
            graph: Graph {
                nodes: Vec::new(),
                edges,
            },
        },
    }
}

fn legacy_object(entity: &Entity) -> LegacyObject {
    LegacyObject {
        object_identifier: entity.object_id().to_string(),
        properties: entity.properties(),
        members: match entity {
            Entity::Group(group) => Some(group.members().to_vec()),
            _ => None,
        },
        aces: entity.base().aces().to_vec(),
    }
}
