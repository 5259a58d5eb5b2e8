//! The realm itself.

use serde::{Deserialize, Serialize};

use crate::traits::GraphNode;

use super::entity::EntityBase;
use super::entity_kind::EntityKind;
use super::property_value::Properties;

/// Realm metadata, read from `cn=<realm>,cn=ad,cn=etc,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    base: EntityBase,
    flat_name: String,
}

impl Domain {
    /// The base's `unique_id` is expected to hold the `ipaNTDomainGUID`.
    pub fn new(base: EntityBase, flat_name: impl Into<String>) -> Self {
        Domain {
            base,
            flat_name: flat_name.into(),
        }
    }

    /// NetBIOS-style flat name, e.g. `EXAMPLE`.
    pub fn flat_name(&self) -> &str {
        &self.flat_name
    }
}

impl GraphNode for Domain {
    fn node_kind() -> EntityKind {
        EntityKind::Domain
    }

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn properties(&self) -> Properties {
        Properties::new()
            .with("name", self.flat_name.as_str())
            .with("domain", self.base.cn())
            .with("domainsid", self.base.domain_sid())
            .with("distinguishedname", self.base.dn())
            .with("highvalue", true)
            .with("description", self.base.description().unwrap_or_default())
    }
}
