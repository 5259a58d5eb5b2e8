//! Entity kind labels shared by the registry, the resolver and both output formats.
//!
//! The label strings are part of the graph contract: they become node `kinds`
//! in the unified document and `ObjectType` values in legacy group members.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// The kinds of realm object that become graph nodes.
///
/// Declaration order is the order in which node partitions are emitted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
pub enum EntityKind {
    /// Realm metadata (`cn=<realm>,cn=ad,cn=etc,...`)
    Domain,
    /// A user account
    User,
    /// A host enrolled in the realm
    Computer,
    /// A user group or a host group
    Group,
    /// A service usable in host-based access control rules
    #[strum(serialize = "HBACService")]
    #[serde(rename = "HBACService")]
    HbacService,
    /// A named set of HBAC services
    #[strum(serialize = "HBACServiceGroup")]
    #[serde(rename = "HBACServiceGroup")]
    HbacServiceGroup,
}

impl EntityKind {
    /// Kinds that act as principals in privilege relationships.
    pub fn is_account(&self) -> bool {
        matches!(self, Self::User | Self::Computer | Self::Group)
    }
}
