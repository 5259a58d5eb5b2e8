//! Hosts enrolled in the realm.

use serde::{Deserialize, Serialize};

use crate::traits::GraphNode;

use super::entity::EntityBase;
use super::entity_kind::EntityKind;
use super::entry::DirectoryEntry;
use super::property_value::Properties;

/// A host from `fqdn=<name>,cn=computers,cn=accounts,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Computer {
    base: EntityBase,
    fqdn: String,
    principal_names: Vec<String>,
    canonical_name: Option<String>,
    service_principal_names: Vec<String>,
}

impl Computer {
    pub fn new(base: EntityBase, fqdn: impl Into<String>, principal_names: Vec<String>) -> Self {
        Computer {
            base,
            fqdn: fqdn.into(),
            principal_names,
            canonical_name: None,
            service_principal_names: Vec::new(),
        }
    }

    pub fn from_entry(entry: &DirectoryEntry, base: EntityBase) -> Self {
        let mut computer = Computer::new(
            base,
            entry.first("fqdn").unwrap_or_default(),
            entry.values("krbPrincipalName").to_vec(),
        );
        computer.canonical_name = entry.first("krbCanonicalName").map(str::to_string);
        computer
    }

    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    pub fn principal_names(&self) -> &[String] {
        &self.principal_names
    }

    pub fn canonical_name(&self) -> Option<&str> {
        self.canonical_name.as_deref()
    }

    /// Record a service principal bound to this host.
    pub fn add_service_principal(&mut self, name: impl Into<String>) {
        self.service_principal_names.push(name.into());
    }

    pub fn service_principal_names(&self) -> &[String] {
        &self.service_principal_names
    }

    pub fn has_spn(&self) -> bool {
        !self.service_principal_names.is_empty()
    }
}

impl GraphNode for Computer {
    fn node_kind() -> EntityKind {
        EntityKind::Computer
    }

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn properties(&self) -> Properties {
        let mut properties = Properties::new()
            .with("name", self.fqdn.as_str())
            .with("distinguishedname", self.base.dn())
            .with("domainsid", self.base.domain_sid())
            .with("description", self.base.description().unwrap_or_default())
            .with("hasspn", self.has_spn());
        if self.has_spn() {
            properties.insert(
                "serviceprincipalnames",
                self.service_principal_names.join("\n"),
            );
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ObjectId, PropertyValue};

    fn computer() -> Computer {
        let entry = DirectoryEntry::default()
            .with_attr("cn", "web01.example.com")
            .with_attr("fqdn", "web01.example.com")
            .with_attr("krbPrincipalName", "host/web01.example.com@EXAMPLE.COM")
            .with_attr("krbCanonicalName", "host/web01.example.com@EXAMPLE.COM");
        let base = EntityBase::new(
            "fqdn=web01.example.com,cn=computers,cn=accounts,dc=example,dc=com",
            "web01.example.com",
            "c1",
            "S-1-5-21-1-2-3",
            ObjectId::synthetic("S-1-5-21-1-2-3-1007"),
        );
        Computer::from_entry(&entry, base)
    }

    #[test]
    fn test_from_entry() {
        let computer = computer();
        assert_eq!(computer.fqdn(), "web01.example.com");
        assert_eq!(computer.principal_names().len(), 1);
        assert_eq!(
            computer.canonical_name(),
            Some("host/web01.example.com@EXAMPLE.COM")
        );
        assert!(!computer.has_spn());
    }

    #[test]
    fn test_without_spn() {
        let properties = computer().properties();
        assert_eq!(properties.get("hasspn"), Some(&PropertyValue::Bool(false)));
        assert!(properties.get("serviceprincipalnames").is_none());
    }

    #[test]
    fn test_spns_joined_in_order() {
        let mut computer = computer();
        computer.add_service_principal("HTTP/web01.example.com@EXAMPLE.COM");
        computer.add_service_principal("ldap/web01.example.com@EXAMPLE.COM");

        insta::assert_json_snapshot!(computer.properties(), @r#"
        {
          "description": "",
          "distinguishedname": "fqdn=web01.example.com,cn=computers,cn=accounts,dc=example,dc=com",
          "domainsid": "S-1-5-21-1-2-3",
          "hasspn": true,
          "name": "web01.example.com",
          "serviceprincipalnames": "HTTP/web01.example.com@EXAMPLE.COM\nldap/web01.example.com@EXAMPLE.COM"
        }
        "#);
    }
}
