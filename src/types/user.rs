//! User accounts.

use serde::{Deserialize, Serialize};

use crate::traits::GraphNode;

use super::entity::EntityBase;
use super::entity_kind::EntityKind;
use super::entry::DirectoryEntry;
use super::property_value::Properties;

/// A user account from `uid=<login>,cn=users,cn=accounts,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    base: EntityBase,
    uid: String,
    principal_names: Vec<String>,
    canonical_name: Option<String>,
    gecos: Option<String>,
    home_directory: Option<String>,
    login_shell: Option<String>,
    surname: Option<String>,
    uid_number: Option<String>,
    enabled: bool,
}

impl User {
    /// Create an enabled user with only its login and Kerberos principals set.
    pub fn new(base: EntityBase, uid: impl Into<String>, principal_names: Vec<String>) -> Self {
        User {
            base,
            uid: uid.into(),
            principal_names,
            canonical_name: None,
            gecos: None,
            home_directory: None,
            login_shell: None,
            surname: None,
            uid_number: None,
            enabled: true,
        }
    }

    /// Build a user from its directory entry.
    ///
    /// The account counts as disabled when it has never had a Kerberos
    /// password (neither `krbLastPwdChange` nor `krbPasswordExpiration` is
    /// set) or when `nsAccountLock` is `TRUE`.
    pub fn from_entry(entry: &DirectoryEntry, base: EntityBase) -> Self {
        let owned = |name: &str| entry.first(name).map(str::to_string);

        let has_password = entry.has("krbLastPwdChange") || entry.has("krbPasswordExpiration");
        let locked = entry.is_true("nsAccountLock");

        User {
            base,
            uid: entry.first("uid").unwrap_or_default().to_string(),
            principal_names: entry.values("krbPrincipalName").to_vec(),
            canonical_name: owned("krbCanonicalName"),
            gecos: owned("gecos"),
            home_directory: owned("homeDirectory"),
            login_shell: owned("loginShell"),
            surname: owned("sn"),
            uid_number: owned("uidNumber"),
            enabled: has_password && !locked,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn principal_names(&self) -> &[String] {
        &self.principal_names
    }

    /// The canonical Kerberos principal, falling back to the first alias.
    pub fn principal_name(&self) -> Option<&str> {
        self.canonical_name
            .as_deref()
            .or_else(|| self.principal_names.first().map(String::as_str))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl GraphNode for User {
    fn node_kind() -> EntityKind {
        EntityKind::User
    }

    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn properties(&self) -> Properties {
        Properties::new()
            .with("name", self.principal_name().unwrap_or(&self.uid))
            .with("distinguishedname", self.base.dn())
            .with("cn", self.base.cn())
            .with("domainsid", self.base.domain_sid())
            .with("uid", self.uid.as_str())
            .with("enabled", self.enabled)
            .with("description", self.base.description().unwrap_or_default())
            .with_opt("gecos", self.gecos.as_deref())
            .with_opt("homedirectory", self.home_directory.as_deref())
            .with_opt("loginshell", self.login_shell.as_deref())
            .with_opt("sn", self.surname.as_deref())
            .with_opt("uidNumber", self.uid_number.as_deref())
    }
}
