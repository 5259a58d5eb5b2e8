//! User groups and host groups.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::traits::GraphNode;

use super::entity::EntityBase;
use super::entity_kind::EntityKind;

/// A member reference after resolution: the member's graph id and its kind.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct ResolvedMember {
    pub object_identifier: String,
    pub object_type: EntityKind,
}

impl ResolvedMember {
    pub fn new(object_identifier: impl Into<String>, object_type: EntityKind) -> Self {
        ResolvedMember {
            object_identifier: object_identifier.into(),
            object_type,
        }
    }
}

/// A group from `cn=<name>,cn=groups,...` or `cn=<name>,cn=hostgroups,...`.
///
/// Both subtrees share one kind; host groups simply list hosts as members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    base: EntityBase,
    member_dns: Vec<String>,
    members: Vec<ResolvedMember>,
}

impl Group {
    pub fn new(base: EntityBase, member_dns: Vec<String>) -> Self {
        Group {
            base,
            member_dns,
            members: Vec::new(),
        }
    }

    /// Raw `member` values, as DNs.
    pub fn member_dns(&self) -> &[String] {
        &self.member_dns
    }

    /// Members resolved against the registry, empty until resolution ran.
    pub fn members(&self) -> &[ResolvedMember] {
        &self.members
    }

    pub(crate) fn set_members(&mut self, members: Vec<ResolvedMember>) {
        self.members = members;
    }
}

impl GraphNode for Group {
    fn node_kind() -> EntityKind {
        EntityKind::Group
    }

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }
}
