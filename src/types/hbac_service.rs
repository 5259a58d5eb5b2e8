//! Services and service groups referenced by HBAC rules.

use serde::{Deserialize, Serialize};

use crate::traits::GraphNode;

use super::entity::EntityBase;
use super::entity_kind::EntityKind;
use super::group::ResolvedMember;
use super::property_value::Properties;

/// Service names drop every `-` (`sudo-i` becomes `sudoi`).
pub(crate) fn strip_dashes(name: &str) -> String {
    name.replace('-', "")
}

/// A PAM service from `cn=<name>,cn=hbacservices,cn=hbac,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HbacService {
    base: EntityBase,
    name: String,
}

impl HbacService {
    pub fn new(base: EntityBase) -> Self {
        let name = strip_dashes(base.cn());
        HbacService { base, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl GraphNode for HbacService {
    fn node_kind() -> EntityKind {
        EntityKind::HbacService
    }

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn properties(&self) -> Properties {
        Properties::new()
            .with("name", self.name.as_str())
            .with("distinguishedname", self.base.dn())
            .with("domainsid", self.base.domain_sid())
            .with("description", self.base.description().unwrap_or_default())
    }
}

/// A named set of services from `cn=<name>,cn=hbacservicegroups,cn=hbac,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HbacServiceGroup {
    base: EntityBase,
    name: String,
    member_dns: Vec<String>,
    members: Vec<ResolvedMember>,
}

impl HbacServiceGroup {
    pub fn new(base: EntityBase, member_dns: Vec<String>) -> Self {
        let name = strip_dashes(base.cn());
        HbacServiceGroup {
            base,
            name,
            member_dns,
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_dns(&self) -> &[String] {
        &self.member_dns
    }

    pub fn members(&self) -> &[ResolvedMember] {
        &self.members
    }

    pub(crate) fn set_members(&mut self, members: Vec<ResolvedMember>) {
        self.members = members;
    }
}

impl GraphNode for HbacServiceGroup {
    fn node_kind() -> EntityKind {
        EntityKind::HbacServiceGroup
    }

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn properties(&self) -> Properties {
        Properties::new()
            .with("name", self.name.as_str())
            .with("distinguishedname", self.base.dn())
            .with("domainsid", self.base.domain_sid())
            .with("description", self.base.description().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectId, PropertyValue};
    use yare::parameterized;

    fn base(dn: &str, cn: &str) -> EntityBase {
        EntityBase::new(dn, cn, "s1", "S-1-5-21-1-2-3", ObjectId::synthetic("S-1-5-21-1-2-3-1020"))
    }

    #[parameterized(
        plain = { "sshd", "sshd" },
        one_dash = { "sudo-i", "sudoi" },
        many_dashes = { "gdm-smartcard-x", "gdmsmartcardx" },
    )]
    fn test_service_names_drop_dashes(cn: &str, expected: &str) {
        let service = HbacService::new(base("cn=x,cn=hbacservices,cn=hbac,dc=example,dc=com", cn));
        assert_eq!(service.name(), expected);
        assert_eq!(
            service.properties().get("name"),
            Some(&PropertyValue::from(expected))
        );
    }

    #[test]
    fn test_service_group_members() {
        let mut group = HbacServiceGroup::new(
            base("cn=Sudo,cn=hbacservicegroups,cn=hbac,dc=example,dc=com", "Sudo"),
            vec!["cn=sudo,cn=hbacservices,cn=hbac,dc=example,dc=com".to_string()],
        );
        assert_eq!(group.member_dns().len(), 1);
        assert!(group.members().is_empty());
        group.set_members(vec![ResolvedMember::new("S-1-5-21-1-2-3-1021", EntityKind::HbacService)]);
        assert_eq!(group.members().len(), 1);
        assert_eq!(HbacServiceGroup::node_kind(), EntityKind::HbacServiceGroup);
    }
}
