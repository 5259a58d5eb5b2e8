//! Directory entries as handed over by the collector.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One materialized directory entry: a distinguished name and its attributes.
///
/// LDAP attribute names are case-insensitive, so keys are lower-cased on the
/// way in and every accessor accepts any casing. An attribute whose value list
/// is empty is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDirectoryEntry")]
pub struct DirectoryEntry {
    dn: String,
    attributes: HashMap<String, Vec<String>>,
}

/// Wire shape of an entry before attribute names are normalized.
#[derive(Deserialize)]
struct RawDirectoryEntry {
    dn: String,
    #[serde(default)]
    attributes: HashMap<String, Vec<String>>,
}

impl From<RawDirectoryEntry> for DirectoryEntry {
    fn from(raw: RawDirectoryEntry) -> Self {
        DirectoryEntry::new(raw.dn, raw.attributes)
    }
}

impl DirectoryEntry {
    pub fn new<I, K>(dn: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<String>)>,
        K: AsRef<str>,
    {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in attributes {
            normalized
                .entry(name.as_ref().to_ascii_lowercase())
                .or_default()
                .extend(values);
        }
        DirectoryEntry {
            dn: dn.into(),
            attributes: normalized,
        }
    }

    /// Add one attribute value, returning the updated entry.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
        self
    }

    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// All values of an attribute, empty when absent.
    pub fn values(&self, name: &str) -> &[String] {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The first value of an attribute.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    pub fn has(&self, name: &str) -> bool {
        !self.values(name).is_empty()
    }

    pub fn has_all(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.has(name))
    }

    /// True when the first value of `name` is the LDAP boolean `TRUE`.
    pub fn is_true(&self, name: &str) -> bool {
        self.first(name)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DirectoryEntry {
        DirectoryEntry::new(
            "uid=alice,cn=users,cn=accounts,dc=example,dc=com",
            [
                ("ipaUniqueID", vec!["a1".to_string()]),
                ("krbPrincipalName", vec!["alice@EXAMPLE.COM".to_string()]),
                ("memberOf", vec![]),
            ],
        )
    }

    #[test]
    fn test_attribute_names_are_case_insensitive() {
        let entry = entry();
        assert_eq!(entry.first("ipauniqueid"), Some("a1"));
        assert_eq!(entry.first("IPAUNIQUEID"), Some("a1"));
        assert!(entry.has("KrbPrincipalName"));
    }

    #[test]
    fn test_empty_value_list_counts_as_absent() {
        let entry = entry();
        assert!(!entry.has("memberOf"));
        assert!(entry.values("memberOf").is_empty());
        assert_eq!(entry.first("memberOf"), None);
    }

    #[test]
    fn test_has_all() {
        let entry = entry();
        assert!(entry.has_all(&["ipaUniqueID", "krbPrincipalName"]));
        assert!(!entry.has_all(&["ipaUniqueID", "uid"]));
        assert!(entry.has_all(&[]));
    }

    #[test]
    fn test_mixed_case_duplicates_are_merged() {
        let entry = DirectoryEntry::new(
            "cn=x",
            [
                ("member", vec!["a".to_string()]),
                ("Member", vec!["b".to_string()]),
            ],
        );
        assert_eq!(entry.values("member"), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_with_attr_appends() {
        let entry = DirectoryEntry::default()
            .with_attr("sudoCommand", "/usr/bin/less")
            .with_attr("SUDOCOMMAND", "/usr/bin/vim");
        assert_eq!(entry.values("sudocommand").len(), 2);
    }

    #[test]
    fn test_is_true() {
        let entry = DirectoryEntry::default().with_attr("ipaEnabledFlag", "TRUE");
        assert!(entry.is_true("ipaenabledflag"));
        let entry = DirectoryEntry::default().with_attr("ipaEnabledFlag", "FALSE");
        assert!(!entry.is_true("ipaenabledflag"));
        assert!(!DirectoryEntry::default().is_true("ipaenabledflag"));
    }

    #[test]
    fn test_deserialize_normalizes_keys() {
        let entry: DirectoryEntry = serde_json::from_value(serde_json::json!({
            "dn": "cn=admins,cn=groups,cn=accounts,dc=example,dc=com",
            "attributes": { "ipaNTSecurityIdentifier": ["S-1-5-21-1-2-3-512"] }
        }))
        .unwrap();
        assert_eq!(
            entry.first("ipantsecurityidentifier"),
            Some("S-1-5-21-1-2-3-512")
        );
    }

    #[test]
    fn test_deserialize_without_attributes() {
        let entry: DirectoryEntry =
            serde_json::from_value(serde_json::json!({ "dn": "dc=example,dc=com" })).unwrap();
        assert_eq!(entry.dn(), "dc=example,dc=com");
        assert!(!entry.has("cn"));
    }
}
