//! Realm naming and security identifier discovery.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GraphError;
use crate::types::DirectoryEntry;

const SID_ATTRIBUTE: &str = "ipaNTSecurityIdentifier";

/// How much the realm SID can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidConfidence {
    /// Read from the realm's trust metadata entry.
    Authoritative,
    /// Derived from the built-in `admins` group by dropping its RID.
    Degraded,
}

/// A realm with its naming suffix and resolved SID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
    pub name: String,
    /// `,dc=<label>` for every dotted label of the name.
    pub suffix: String,
    pub sid: String,
    pub confidence: SidConfidence,
    /// DN of the entry the SID was read from.
    pub source_dn: String,
}

/// Turn `example.com` into `,dc=example,dc=com`.
pub fn realm_suffix(realm: &str) -> Result<String, GraphError> {
    if realm.trim().is_empty() {
        return Err(GraphError::InvalidRealm("realm name is empty".to_string()));
    }

    let mut suffix = String::new();
    for label in realm.split('.') {
        if label.is_empty() {
            return Err(GraphError::InvalidRealm(format!(
                "'{realm}' contains an empty label"
            )));
        }
        suffix.push_str(",dc=");
        suffix.push_str(label);
    }
    Ok(suffix)
}

pub(crate) fn anchored(pattern: &str) -> Result<Regex, GraphError> {
    Ok(RegexBuilder::new(&format!("^{pattern}$"))
        .case_insensitive(true)
        .build()?)
}

/// Find the realm SID among `entries`.
///
/// The trust metadata entry `cn=<realm>,cn=ad,cn=etc,<suffix>` is authoritative.
/// Anonymous binds cannot read it; with `anonymous_fallback` the SID of
/// `cn=admins,cn=groups,cn=accounts,<suffix>` minus its trailing RID is used
/// instead and flagged as [`SidConfidence::Degraded`].
pub fn identify_realm_sid(
    realm: &str,
    entries: &[DirectoryEntry],
    anonymous_fallback: bool,
) -> Result<Realm, GraphError> {
    let suffix = realm_suffix(realm)?;
    let escaped_suffix = regex::escape(&suffix);

    let metadata = anchored(&format!(
        "cn={},cn=ad,cn=etc{escaped_suffix}",
        regex::escape(realm)
    ))?;

    let found = entries.iter().find_map(|entry| {
        let sid = entry.first(SID_ATTRIBUTE).filter(|sid| !sid.is_empty())?;
        metadata.is_match(entry.dn()).then(|| (entry.dn(), sid))
    });

    if let Some((dn, sid)) = found {
        debug!(event = "Realm", phase = "Identified", realm = realm, sid = sid, dn = dn);
        return Ok(Realm {
            name: realm.to_string(),
            suffix,
            sid: sid.to_string(),
            confidence: SidConfidence::Authoritative,
            source_dn: dn.to_string(),
        });
    }

    if anonymous_fallback {
        let admins = anchored(&format!("cn=admins,cn=groups,cn=accounts{escaped_suffix}"))?;
        let derived = entries.iter().find_map(|entry| {
            if !admins.is_match(entry.dn()) {
                return None;
            }
            let (domain_sid, _rid) = entry.first(SID_ATTRIBUTE)?.rsplit_once('-')?;
            Some((entry.dn(), domain_sid))
        });

        if let Some((dn, sid)) = derived {
            warn!(
                event = "Realm",
                phase = "Degraded",
                realm = realm,
                sid = sid,
                dn = dn,
                "realm SID derived from the admins group, identifiers may be inaccurate"
            );
            return Ok(Realm {
                name: realm.to_string(),
                suffix,
                sid: sid.to_string(),
                confidence: SidConfidence::Degraded,
                source_dn: dn.to_string(),
            });
        }
    }

    Err(GraphError::RealmSidNotFound(realm.to_string()))
}
