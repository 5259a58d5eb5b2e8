//! Reference resolution.
//!
//! Rules and groups reference other objects by DN, or by name for sudo rules.
//! Once the registry is complete those references are replaced by graph ids.
//! Candidates are visited in registry order and references matching nothing
//! are dropped. Resolution overwrites earlier results, so running it twice
//! against the same registry gives the same lists.

use std::collections::HashSet;

use itertools::Itertools;
use tracing::debug;

use crate::config::OutputFormat;
use crate::registry::{EntityRegistry, dn_key};
use crate::types::{
    Entity, EntityKind, Reference, RelationRule, Resolution, ResolvedMember, RuleCategory,
    RuleKind, ServiceRef, WILDCARD, service_label,
};

use EntityKind::{Computer, Group, HbacService, User};

/// How an explicit reference is compared with a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchKey {
    Dn,
    /// `cn`, or the login for users.
    Name,
}

/// Which entities one side of a relation may resolve to.
#[derive(Debug, Clone, Copy)]
struct RoleSpec {
    key: MatchKey,
    kinds: &'static [EntityKind],
}

const MEMBERS: RoleSpec = RoleSpec {
    key: MatchKey::Dn,
    kinds: &[User, Computer],
};
const LEGACY_MEMBERS: RoleSpec = RoleSpec {
    key: MatchKey::Dn,
    kinds: &[User, Computer, Group],
};
const GROUPS: RoleSpec = RoleSpec {
    key: MatchKey::Dn,
    kinds: &[Group],
};
const SERVICES: RoleSpec = RoleSpec {
    key: MatchKey::Dn,
    kinds: &[HbacService],
};

fn role_specs(category: RuleCategory, format: OutputFormat) -> (RoleSpec, RoleSpec) {
    match category {
        RuleCategory::Membership => (member_spec(format), GROUPS),
        RuleCategory::Hbac => (
            RoleSpec {
                key: MatchKey::Dn,
                kinds: &[User, Computer, Group],
            },
            RoleSpec {
                key: MatchKey::Dn,
                kinds: &[Computer, Group],
            },
        ),
        RuleCategory::Sudoer => (
            RoleSpec {
                key: MatchKey::Name,
                kinds: &[User, Computer, Group],
            },
            RoleSpec {
                key: MatchKey::Name,
                kinds: &[Computer, Group],
            },
        ),
    }
}

fn member_spec(format: OutputFormat) -> RoleSpec {
    match format {
        OutputFormat::Unified => MEMBERS,
        OutputFormat::Legacy => LEGACY_MEMBERS,
    }
}

/// Totals from one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub rules: usize,
    /// Explicit references that matched no candidate.
    pub unresolved_references: usize,
}

/// Resolve group members, service-group members and every rule.
pub fn resolve_relations(
    registry: &mut EntityRegistry,
    rules: &mut [RelationRule],
    format: OutputFormat,
) -> ResolveReport {
    resolve_group_members(registry, format);

    let mut report = ResolveReport::default();
    for rule in rules.iter_mut() {
        report.unresolved_references += resolve_rule(registry, rule, format);
        report.rules += 1;
    }
    report
}

/// Fill in the resolved member lists of groups and HBAC service groups.
pub fn resolve_group_members(registry: &mut EntityRegistry, format: OutputFormat) {
    let updates: Vec<(String, Vec<ResolvedMember>)> = registry
        .iter()
        .filter_map(|entity| {
            let members = match entity {
                Entity::Group(group) => {
                    resolve_members(registry, group.member_dns(), member_spec(format))
                }
                Entity::HbacServiceGroup(group) => {
                    resolve_members(registry, group.member_dns(), SERVICES)
                }
                _ => return None,
            };
            Some((entity.dn().to_string(), members))
        })
        .collect();

    for (dn, members) in updates {
        match registry.get_mut(&dn) {
            Some(Entity::Group(group)) => group.set_members(members),
            Some(Entity::HbacServiceGroup(group)) => group.set_members(members),
            _ => {}
        }
    }
}

/// Resolve one rule in place, returning how many explicit references stayed
/// unresolved.
pub fn resolve_rule(registry: &EntityRegistry, rule: &mut RelationRule, format: OutputFormat) -> usize {
    let (start_spec, end_spec) = role_specs(rule.category(), format);
    let (starts, unresolved_starts) = resolve_references(registry, rule.starts(), start_spec);
    let (ends, unresolved_ends) = resolve_references(registry, rule.ends(), end_spec);
    let mut unresolved = unresolved_starts + unresolved_ends;

    if let RuleKind::Hbac { services, .. } = rule.kind() {
        let (labels, unresolved_services) = service_labels(registry, services);
        unresolved += unresolved_services;
        rule.set_resolved_services(labels);
    }

    debug!(
        event = "Resolve",
        phase = "Rule",
        category = %rule.category(),
        id = rule.id().unwrap_or_default(),
        starts = starts.len(),
        ends = ends.len(),
        unresolved = unresolved
    );

    rule.set_resolution(Resolution { starts, ends });
    unresolved
}

fn resolve_members(registry: &EntityRegistry, member_dns: &[String], spec: RoleSpec) -> Vec<ResolvedMember> {
    let wanted: HashSet<String> = member_dns.iter().map(|dn| dn_key(dn)).collect();
    registry
        .iter()
        .filter(|entity| spec.kinds.contains(&entity.kind()) && wanted.contains(&dn_key(entity.dn())))
        .map(|entity| ResolvedMember::new(entity.object_id().as_str(), entity.kind()))
        .collect()
}

/// Resolve one side of a rule to graph ids.
///
/// A wildcard adds every candidate of the role's wildcard kind. Returns the
/// ids and the number of distinct explicit references that matched nothing.
fn resolve_references(
    registry: &EntityRegistry,
    references: &[Reference],
    spec: RoleSpec,
) -> (Vec<String>, usize) {
    let wildcard = references.iter().find_map(|reference| match reference {
        Reference::Wildcard(role) => Some(role.wildcard_kind()),
        Reference::Explicit(_) => None,
    });
    let wanted: HashSet<String> = references
        .iter()
        .filter_map(Reference::as_explicit)
        .map(|raw| match spec.key {
            MatchKey::Dn => dn_key(raw),
            MatchKey::Name => raw.to_string(),
        })
        .collect();

    let mut matched: HashSet<&str> = HashSet::new();
    let mut resolved = Vec::new();

    for entity in registry
        .iter()
        .filter(|entity| spec.kinds.contains(&entity.kind()))
    {
        let explicit_hit = match spec.key {
            MatchKey::Dn => {
                let key = dn_key(entity.dn());
                match wanted.get(&key) {
                    Some(found) => {
                        matched.insert(found.as_str());
                        true
                    }
                    None => false,
                }
            }
            MatchKey::Name => {
                let mut hit = false;
                for name in wanted.iter().filter(|name| entity.answers_to(name)) {
                    matched.insert(name.as_str());
                    hit = true;
                }
                hit
            }
        };

        if explicit_hit || wildcard == Some(entity.kind()) {
            resolved.push(entity.object_id().to_string());
        }
    }

    (resolved, wanted.len() - matched.len())
}

/// Edge labels for an HBAC rule's services, in rule order without repeats.
fn service_labels(registry: &EntityRegistry, services: &[ServiceRef]) -> (Vec<String>, usize) {
    let mut labels = Vec::new();
    let mut unresolved = 0;

    for service in services {
        match service {
            ServiceRef::All => labels.push(WILDCARD.to_string()),
            ServiceRef::Service(label) => labels.push(label.clone()),
            ServiceRef::Group(dn) => match registry.get(dn) {
                Some(Entity::HbacServiceGroup(group)) => {
                    let members: HashSet<String> =
                        group.member_dns().iter().map(|dn| dn_key(dn)).collect();
                    labels.extend(
                        registry
                            .of_kind(HbacService)
                            .filter(|service| members.contains(&dn_key(service.dn())))
                            .map(|service| service_label(service.base().cn())),
                    );
                }
                _ => unresolved += 1,
            },
        }
    }

    (labels.into_iter().unique().collect(), unresolved)
}
