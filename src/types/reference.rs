//! Raw references held by relation rules before resolution.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity_kind::EntityKind;

/// The marker value meaning "every principal of the expected kind".
pub const WILDCARD: &str = "all";

/// Whether a raw attribute value is the wildcard marker (`all`, or sudo's `ALL`).
pub fn is_wildcard(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(WILDCARD)
}

/// The side of a relation a reference sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Principals granted or affected by the rule.
    Subject,
    /// Hosts the rule applies to.
    Target,
}

impl Role {
    /// The kind a wildcard on this side stands for.
    pub fn wildcard_kind(&self) -> EntityKind {
        match self {
            Role::Subject => EntityKind::User,
            Role::Target => EntityKind::Computer,
        }
    }
}

/// One raw reference: either a DN / name, or "everything of the role's kind".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Reference {
    Explicit(String),
    Wildcard(Role),
}

impl Reference {
    pub fn parse(raw: &str, role: Role) -> Self {
        if is_wildcard(raw) {
            Reference::Wildcard(role)
        } else {
            Reference::Explicit(raw.to_string())
        }
    }

    pub fn parse_all<S: AsRef<str>>(raw: &[S], role: Role) -> Vec<Self> {
        raw.iter().map(|value| Reference::parse(value.as_ref(), role)).collect()
    }

    pub fn as_explicit(&self) -> Option<&str> {
        match self {
            Reference::Explicit(value) => Some(value),
            Reference::Wildcard(_) => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Reference::Wildcard(_))
    }
}
