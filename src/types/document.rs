//! Output documents in both supported shapes.
//!
//! The unified shape is a single `{metadata, graph: {nodes, edges}}` document.
//! The legacy shape is one `{data, meta}` document per account kind plus an
//! edge-only graph document.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::GraphError;

use super::ace::Ace;
use super::edge::Edge;
use super::group::ResolvedMember;
use super::property_value::Properties;

/// Version tag of the legacy per-kind documents.
pub const LEGACY_VERSION: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GraphMetadata {
    pub source_kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub kinds: Vec<String>,
    pub properties: Properties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The unified nodes + edges document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GraphDocument {
    pub metadata: GraphMetadata,
    pub graph: Graph,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LegacyMeta {
    pub methods: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
    pub version: u32,
}

/// One entity in a legacy per-kind document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyObject {
    pub object_identifier: String,
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<ResolvedMember>>,
    pub aces: Vec<Ace>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LegacyDocument {
    pub data: Vec<LegacyObject>,
    pub meta: LegacyMeta,
}

impl LegacyDocument {
    /// Wrap `data` with its `meta` block; `kind` is the plural document type.
    pub fn new(kind: &str, data: Vec<LegacyObject>) -> Self {
        let count = data.len();
        LegacyDocument {
            data,
            meta: LegacyMeta {
                methods: 0,
                kind: kind.to_string(),
                count,
                version: LEGACY_VERSION,
            },
        }
    }
}

/// Edges that the legacy per-kind documents cannot carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LegacyEdgeDocument {
    pub graph: Graph,
}

/// The full set of legacy documents for one run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LegacyBundle {
    pub domains: LegacyDocument,
    pub users: LegacyDocument,
    pub groups: LegacyDocument,
    pub computers: LegacyDocument,
    pub edges: LegacyEdgeDocument,
}

/// A rendered graph in the configured shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GraphOutput {
    Unified(GraphDocument),
    Legacy(LegacyBundle),
}

impl GraphOutput {
    /// Named JSON documents, ready for a caller to write out.
    ///
    /// Unified output yields a single `graph` document; legacy output yields
    /// `domains`, `users`, `groups`, `computers` and `edges`.
    pub fn documents(&self) -> Result<Vec<(String, serde_json::Value)>, GraphError> {
        match self {
            GraphOutput::Unified(document) => {
                Ok(vec![("graph".to_string(), serde_json::to_value(document)?)])
            }
            GraphOutput::Legacy(bundle) => Ok(vec![
                ("domains".to_string(), serde_json::to_value(&bundle.domains)?),
                ("users".to_string(), serde_json::to_value(&bundle.users)?),
                ("groups".to_string(), serde_json::to_value(&bundle.groups)?),
                ("computers".to_string(), serde_json::to_value(&bundle.computers)?),
                ("edges".to_string(), serde_json::to_value(&bundle.edges)?),
            ]),
        }
    }

    pub fn edges(&self) -> &[Edge] {
        match self {
            GraphOutput::Unified(document) => &document.graph.edges,
            GraphOutput::Legacy(bundle) => &bundle.edges.graph.edges,
        }
    }
}
