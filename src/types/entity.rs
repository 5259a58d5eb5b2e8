//! The closed set of realm entities and the fields they share.

use serde::{Deserialize, Serialize};

use crate::traits::GraphNode;

use super::ace::Ace;
use super::computer::Computer;
use super::domain::Domain;
use super::entity_kind::EntityKind;
use super::entry::DirectoryEntry;
use super::group::Group;
use super::hbac_service::{HbacService, HbacServiceGroup};
use super::object_id::ObjectId;
use super::property_value::Properties;
use super::user::User;

/// Fields shared by every node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBase {
    pub(crate) dn: String,
    pub(crate) cn: String,
    pub(crate) unique_id: String,
    pub(crate) domain_sid: String,
    pub(crate) object_id: ObjectId,
    pub(crate) description: Option<String>,
    pub(crate) aces: Vec<Ace>,
}

impl EntityBase {
    pub fn new(
        dn: impl Into<String>,
        cn: impl Into<String>,
        unique_id: impl Into<String>,
        domain_sid: impl Into<String>,
        object_id: ObjectId,
    ) -> Self {
        EntityBase {
            dn: dn.into(),
            cn: cn.into(),
            unique_id: unique_id.into(),
            domain_sid: domain_sid.into(),
            object_id,
            description: None,
            aces: Vec::new(),
        }
    }

    /// Read `cn` and `ipaUniqueID` off an entry.
    pub fn from_entry(entry: &DirectoryEntry, domain_sid: &str, object_id: ObjectId) -> Self {
        EntityBase::new(
            entry.dn(),
            entry.first("cn").unwrap_or_default(),
            entry.first("ipaUniqueID").unwrap_or_default(),
            domain_sid,
            object_id,
        )
    }

    pub fn dn(&self) -> &str {
        &self.dn
    }

    pub fn cn(&self) -> &str {
        &self.cn
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn domain_sid(&self) -> &str {
        &self.domain_sid
    }

    pub fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn aces(&self) -> &[Ace] {
        &self.aces
    }
}

/// A typed realm object that becomes a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    Domain(Domain),
    User(User),
    Computer(Computer),
    Group(Group),
    HbacService(HbacService),
    HbacServiceGroup(HbacServiceGroup),
}

macro_rules! dispatch {
    ($self:expr, $node:ident => $body:expr) => {
        match $self {
            Entity::Domain($node) => $body,
            Entity::User($node) => $body,
            Entity::Computer($node) => $body,
            Entity::Group($node) => $body,
            Entity::HbacService($node) => $body,
            Entity::HbacServiceGroup($node) => $body,
        }
    };
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Domain(_) => EntityKind::Domain,
            Entity::User(_) => EntityKind::User,
            Entity::Computer(_) => EntityKind::Computer,
            Entity::Group(_) => EntityKind::Group,
            Entity::HbacService(_) => EntityKind::HbacService,
            Entity::HbacServiceGroup(_) => EntityKind::HbacServiceGroup,
        }
    }

    pub fn base(&self) -> &EntityBase {
        dispatch!(self, node => node.base())
    }

    pub fn base_mut(&mut self) -> &mut EntityBase {
        dispatch!(self, node => node.base_mut())
    }

    pub fn dn(&self) -> &str {
        dispatch!(self, node => node.dn())
    }

    pub fn object_id(&self) -> &ObjectId {
        dispatch!(self, node => node.object_id())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        dispatch!(self, node => node.set_description(description))
    }

    pub fn properties(&self) -> Properties {
        dispatch!(self, node => node.properties())
    }

    /// Whether this entity answers to `name` in a sudo rule.
    ///
    /// Sudo rules name hosts and groups by `cn`, and users by login.
    pub fn answers_to(&self, name: &str) -> bool {
        match self {
            Entity::User(user) => user.uid() == name || user.base().cn() == name,
            other => other.base().cn() == name,
        }
    }
}
