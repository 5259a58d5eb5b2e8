//! Entry classification.
//!
//! Each directory entry is tested against an ordered rule table. A rule
//! applies when the DN matches its realm-scoped pattern and every required
//! attribute is present; the first applicable rule wins. Entries no rule
//! applies to are counted and dropped.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use tracing::{debug, warn};

use crate::context::{RunContext, RunStats, RunWarning};
use crate::error::GraphError;
use crate::identity::IdentityAssigner;
use crate::realm::{Realm, anchored};
use crate::registry::{EntityRegistry, InsertError};
use crate::types::{
    Computer, DirectoryEntry, Domain, Entity, EntityBase, Group, HbacService, HbacServiceGroup,
    Reference, RelationRule, Role, ServiceRef, User, is_wildcard,
};

const SID: &str = "ipaNTSecurityIdentifier";

/// What an entry was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
pub enum EntryClass {
    Domain,
    User,
    /// A user group carrying its own SID.
    Group,
    /// A host group, or a user group without a SID.
    HostGroup,
    Computer,
    HbacRule,
    SudoRule,
    /// Binds a Kerberos service principal to the hosts managing it.
    ServicePrincipal,
    HbacServiceGroup,
    HbacService,
}

struct ClassRule {
    class: EntryClass,
    /// DN pattern without the realm suffix.
    pattern: &'static str,
    required: &'static [&'static str],
}

/// Rule precedence is table order.
const CLASS_RULES: &[ClassRule] = &[
    ClassRule {
        class: EntryClass::Domain,
        pattern: "cn=.+,cn=ad,cn=etc",
        required: &["cn", "ipaNTDomainGUID", "ipaNTFlatName", SID],
    },
    ClassRule {
        class: EntryClass::User,
        pattern: "uid=.+,cn=users,cn=accounts",
        required: &["cn", "uid", "ipaUniqueID", "krbPrincipalName"],
    },
    ClassRule {
        class: EntryClass::Group,
        pattern: "cn=.+,cn=groups,cn=accounts",
        required: &["cn", "ipaUniqueID", SID, "member"],
    },
    ClassRule {
        class: EntryClass::HostGroup,
        pattern: "cn=.+,cn=(hostgroups|groups),cn=accounts",
        required: &["cn", "ipaUniqueID", "member"],
    },
    ClassRule {
        class: EntryClass::Computer,
        pattern: "fqdn=.+,cn=computers,cn=accounts",
        required: &["cn", "ipaUniqueID", "krbCanonicalName", "krbPrincipalName", "fqdn"],
    },
    ClassRule {
        class: EntryClass::HbacRule,
        pattern: "ipaUniqueID=.+,cn=hbac",
        required: &["ipaUniqueID", "ipaEnabledFlag"],
    },
    ClassRule {
        class: EntryClass::SudoRule,
        pattern: "cn=.+,ou=sudoers",
        required: &["cn", "sudoUser", "sudoHost", "sudoCommand"],
    },
    ClassRule {
        class: EntryClass::ServicePrincipal,
        pattern: "krbprincipalname=.+,cn=services,cn=accounts",
        required: &["krbPrincipalName", "managedBy"],
    },
    ClassRule {
        class: EntryClass::HbacServiceGroup,
        pattern: "cn=.+,cn=hbacservicegroups,cn=hbac",
        required: &["cn", "ipaUniqueID", "member"],
    },
    ClassRule {
        class: EntryClass::HbacService,
        pattern: "cn=.+,cn=hbacservices,cn=hbac",
        required: &["cn", "ipaUniqueID"],
    },
];

struct CompiledRule {
    class: EntryClass,
    pattern: Regex,
    required: &'static [&'static str],
}

/// A service principal owned by the host at `owner_dn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePrincipalFact {
    pub principal_name: String,
    pub owner_dn: String,
}

/// The outcome of classifying a whole export.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub registry: EntityRegistry,
    pub rules: Vec<RelationRule>,
    pub service_principals: Vec<ServicePrincipalFact>,
}

/// Classifies the entries of one realm.
pub struct Classifier {
    rules: Vec<CompiledRule>,
    domain_sid: String,
    assigner: IdentityAssigner,
}

impl Classifier {
    /// Compile the rule table for `realm`. `entry_count` is the size of the
    /// export, which seeds synthetic identifiers.
    pub fn new(realm: &Realm, entry_count: usize) -> Result<Self, GraphError> {
        let suffix = regex::escape(&realm.suffix);
        let rules = CLASS_RULES
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    class: rule.class,
                    pattern: anchored(&format!("{}{suffix}", rule.pattern))?,
                    required: rule.required,
                })
            })
            .collect::<Result<Vec<_>, GraphError>>()?;

        Ok(Classifier {
            rules,
            domain_sid: realm.sid.clone(),
            assigner: IdentityAssigner::new(realm.sid.clone(), entry_count),
        })
    }

    /// The class of the first rule whose pattern and required attributes both fit.
    pub fn class_of(&self, entry: &DirectoryEntry) -> Option<EntryClass> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(entry.dn()) && entry.has_all(rule.required))
            .map(|rule| rule.class)
    }

    /// Classify every entry, then bind service principals to their hosts.
    ///
    /// Object ids stay unique: an entity whose id is already taken, or whose
    /// synthetic id equals a SID carried anywhere in the export, is dropped
    /// with a [`RunWarning::DuplicateObjectId`].
    pub fn classify(&self, entries: &[DirectoryEntry], context: &mut RunContext) -> Classification {
        let mut out = Classification::default();
        let source_sids = source_sids(entries);

        for (index, entry) in entries.iter().enumerate() {
            let Some(class) = self.class_of(entry) else {
                debug!(event = "Classify", phase = "Unrecognized", dn = entry.dn());
                context.stats.unrecognized_entries += 1;
                continue;
            };
            debug!(event = "Classify", phase = "Matched", class = %class, dn = entry.dn());

            match class {
                EntryClass::HbacRule => match hbac_rule(entry) {
                    Some(rule) => push_rule(&mut out.rules, rule, entry, &mut context.stats),
                    None => {
                        debug!(event = "Classify", phase = "Disabled", dn = entry.dn());
                        context.stats.disabled_hbac_rules += 1;
                    }
                },
                EntryClass::SudoRule => {
                    push_rule(&mut out.rules, sudo_rule(entry), entry, &mut context.stats)
                }
                EntryClass::ServicePrincipal => {
                    out.service_principals.extend(service_principal_facts(entry))
                }
                _ => {
                    if let Some(entity) = self.build_entity(class, index, entry) {
                        register(entity, entry, &source_sids, &mut out, context);
                    }
                }
            }
        }

        join_service_principals(&mut out.registry, &out.service_principals, &mut context.stats);
        context.stats.entities = out.registry.count_by_kind();
        out
    }

    fn build_entity(&self, class: EntryClass, index: usize, entry: &DirectoryEntry) -> Option<Entity> {
        let base = || {
            let object_id = self.assigner.assign(entry.first(SID), index);
            EntityBase::from_entry(entry, &self.domain_sid, object_id)
        };

        let entity = match class {
            EntryClass::Domain => {
                let object_id = self.assigner.assign(entry.first(SID), index);
                let domain_sid = if object_id.is_synthetic() {
                    self.domain_sid.clone()
                } else {
                    object_id.to_string()
                };
                let base = EntityBase::new(
                    entry.dn(),
                    entry.first("cn").unwrap_or_default(),
                    entry.first("ipaNTDomainGUID").unwrap_or_default(),
                    domain_sid,
                    object_id,
                );
                Entity::Domain(Domain::new(base, entry.first("ipaNTFlatName").unwrap_or_default()))
            }
            EntryClass::User => Entity::User(User::from_entry(entry, base())),
            EntryClass::Group | EntryClass::HostGroup => {
                Entity::Group(Group::new(base(), entry.values("member").to_vec()))
            }
            EntryClass::Computer => Entity::Computer(Computer::from_entry(entry, base())),
            EntryClass::HbacServiceGroup => Entity::HbacServiceGroup(HbacServiceGroup::new(
                base(),
                entry.values("member").to_vec(),
            )),
            EntryClass::HbacService => Entity::HbacService(HbacService::new(base())),
            EntryClass::HbacRule | EntryClass::SudoRule | EntryClass::ServicePrincipal => {
                return None;
            }
        };
        Some(entity)
    }
}

/// Every non-blank SID carried by the export.
fn source_sids(entries: &[DirectoryEntry]) -> HashSet<&str> {
    entries
        .iter()
        .filter_map(|entry| entry.first(SID))
        .map(str::trim)
        .filter(|sid| !sid.is_empty())
        .collect()
}

fn register(
    mut entity: Entity,
    entry: &DirectoryEntry,
    source_sids: &HashSet<&str>,
    out: &mut Classification,
    context: &mut RunContext,
) {
    if let Some(description) = entry.first("description") {
        entity.set_description(description);
    }

    let membership = match &entity {
        Entity::Group(group) => Some(RelationRule::membership(entity.dn(), group.member_dns())),
        _ => None,
    };
    let synthetic = entity.object_id().is_synthetic();

    let inserted = if synthetic && source_sids.contains(entity.object_id().as_str()) {
        Err(InsertError::DuplicateObjectId(entity))
    } else {
        out.registry.insert(entity)
    };

    match inserted {
        Ok(()) => {}
        Err(InsertError::DuplicateDn(duplicate)) => {
            debug!(event = "Classify", phase = "Duplicate", dn = duplicate.dn());
            context.stats.duplicate_entries += 1;
            context.warn(RunWarning::DuplicateDn {
                dn: duplicate.dn().to_string(),
            });
            return;
        }
        Err(InsertError::DuplicateObjectId(duplicate)) => {
            warn!(
                event = "Classify",
                phase = "DuplicateObjectId",
                id = duplicate.object_id().as_str(),
                dn = duplicate.dn(),
                "object id already taken, entry dropped"
            );
            context.stats.duplicate_object_ids += 1;
            context.warn(RunWarning::DuplicateObjectId {
                id: duplicate.object_id().to_string(),
                dn: duplicate.dn().to_string(),
            });
            return;
        }
    }

    if synthetic {
        context.stats.synthetic_ids += 1;
    }
    if let Some(rule) = membership {
        push_rule(&mut out.rules, rule, entry, &mut context.stats);
    }
}

fn push_rule(
    rules: &mut Vec<RelationRule>,
    mut rule: RelationRule,
    entry: &DirectoryEntry,
    stats: &mut RunStats,
) {
    if let Some(description) = entry.first("description") {
        rule.set_description(description);
    }
    stats.count_rule(rule.category());
    rules.push(rule);
}

/// Build an HBAC rule, or `None` when the rule is not enabled.
///
/// A `*Category: all` attribute takes precedence over the matching explicit
/// member attribute.
pub fn hbac_rule(entry: &DirectoryEntry) -> Option<RelationRule> {
    if !entry.is_true("ipaEnabledFlag") {
        return None;
    }

    let category = |name: &str| entry.first(name).is_some_and(is_wildcard);

    let starts = if category("userCategory") {
        vec![Reference::Wildcard(Role::Subject)]
    } else {
        Reference::parse_all(entry.values("memberUser"), Role::Subject)
    };
    let ends = if category("hostCategory") {
        vec![Reference::Wildcard(Role::Target)]
    } else {
        Reference::parse_all(entry.values("memberHost"), Role::Target)
    };
    let services = if category("serviceCategory") {
        vec![ServiceRef::All]
    } else {
        entry
            .values("memberService")
            .iter()
            .filter_map(|raw| ServiceRef::parse(raw))
            .collect()
    };

    Some(RelationRule::hbac(
        entry.first("ipaUniqueID").unwrap_or_default(),
        starts,
        ends,
        services,
    ))
}

/// Build a sudo rule. Rules without `sudoRunAsUser` run as `root`.
pub fn sudo_rule(entry: &DirectoryEntry) -> RelationRule {
    let run_as = match entry.values("sudoRunAsUser") {
        [] => vec!["root".to_string()],
        values => values.to_vec(),
    };

    RelationRule::sudoer(
        entry.values("sudoUser"),
        entry.values("sudoHost"),
        entry.values("sudoCommand"),
        run_as.as_slice(),
    )
    .with_id(entry.first("cn").unwrap_or_default())
}

/// One fact per `managedBy` value of a service entry.
pub fn service_principal_facts(entry: &DirectoryEntry) -> Vec<ServicePrincipalFact> {
    let principal_name = entry.first("krbPrincipalName").unwrap_or_default();
    entry
        .values("managedBy")
        .iter()
        .map(|owner| ServicePrincipalFact {
            principal_name: principal_name.to_string(),
            owner_dn: owner.clone(),
        })
        .collect()
}

/// Append each fact's principal to the computer at its owner DN, in fact order.
pub fn join_service_principals(
    registry: &mut EntityRegistry,
    facts: &[ServicePrincipalFact],
    stats: &mut RunStats,
) {
    for fact in facts {
        match registry.computer_mut(&fact.owner_dn) {
            Some(computer) => {
                computer.add_service_principal(fact.principal_name.as_str());
                stats.service_principals_joined += 1;
            }
            None => {
                debug!(
                    event = "Classify",
                    phase = "ServicePrincipalUnmatched",
                    principal = fact.principal_name.as_str(),
                    owner = fact.owner_dn.as_str()
                );
                stats.service_principals_unmatched += 1;
            }
        }
    }
}
