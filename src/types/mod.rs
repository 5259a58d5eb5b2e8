//! Data model types: directory entries in, typed entities and rules in the
//! middle, graph documents out.
//!
//! Entity kinds and their node labels:
//! - Domain: realm metadata from `cn=<realm>,cn=ad,cn=etc,...`
//! - User, Computer, Group: accounts under `cn=accounts,...`
//! - HBACService, HBACServiceGroup: services under `cn=hbac,...`
//!
//! Relation rules (membership, HBAC, sudo) are not nodes; they expand into edges.

mod ace;
mod computer;
mod document;
mod domain;
mod edge;
mod entity;
mod entity_kind;
mod entry;
mod group;
mod hbac_service;
mod object_id;
mod property_value;
mod reference;
mod relation;
mod user;

pub use ace::Ace;
pub use computer::Computer;
pub use document::{
    Graph, GraphDocument, GraphMetadata, GraphOutput, LEGACY_VERSION, LegacyBundle,
    LegacyDocument, LegacyEdgeDocument, LegacyMeta, LegacyObject, Node,
};
pub use domain::Domain;
pub use edge::{Edge, EdgeEndpoint, MATCH_BY_ID};
pub use entity::{Entity, EntityBase};
pub use entity_kind::EntityKind;
pub use entry::DirectoryEntry;
pub use group::{Group, ResolvedMember};
pub use hbac_service::{HbacService, HbacServiceGroup};
pub use object_id::{IdOrigin, ObjectId};
pub use property_value::{Properties, PropertyValue};
pub use reference::{Reference, Role, WILDCARD, is_wildcard};
pub use relation::{
    MEMBER_OF, RelationRule, Resolution, RuleCategory, RuleKind, ServiceRef, service_label,
};
pub use user::User;
