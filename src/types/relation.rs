//! Relation rules: group membership, HBAC and sudo, before and after resolution.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use super::reference::{Reference, Role, is_wildcard};

/// Edge kind emitted for group membership.
pub const MEMBER_OF: &str = "MemberOf";

static HBAC_SERVICE_DN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^cn=([^,]+),cn=hbacservices,cn=hbac,").expect("static HBAC service pattern")
});

static HBAC_SERVICE_GROUP_DN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^cn=[^,]+,cn=hbacservicegroups,cn=hbac,")
        .expect("static HBAC service group pattern")
});

/// Turn a service name into the token used in `HBAC_<service>` edge kinds.
pub fn service_label(name: &str) -> String {
    name.replace('-', "_")
}

/// A service reference on an HBAC rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceRef {
    /// `serviceCategory: all`, labelled `all`.
    All,
    /// A single service, already reduced to its edge label.
    Service(String),
    /// A service group DN, expanded to its member services during resolution.
    Group(String),
}

impl ServiceRef {
    /// Reduce a raw `memberService` / `serviceCategory` value.
    ///
    /// Returns `None` for values that name neither a service nor a service group.
    pub fn parse(raw: &str) -> Option<Self> {
        if is_wildcard(raw) {
            return Some(ServiceRef::All);
        }
        if let Some(captures) = HBAC_SERVICE_DN.captures(raw) {
            return Some(ServiceRef::Service(service_label(&captures[1])));
        }
        if HBAC_SERVICE_GROUP_DN.is_match(raw) {
            return Some(ServiceRef::Group(raw.to_string()));
        }
        None
    }
}

/// Discriminates the three relation categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    /// Members of one group.
    Membership,
    /// Host-based access control: subjects may reach targets through services.
    Hbac {
        services: Vec<ServiceRef>,
        resolved_services: Vec<String>,
    },
    /// Sudo: subjects may run commands as run-as users on targets.
    Sudoer {
        commands: Vec<String>,
        run_as: Vec<String>,
    },
}

/// Short label of a rule category, used in logs and run statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
pub enum RuleCategory {
    Membership,
    #[strum(serialize = "HBAC")]
    Hbac,
    Sudoer,
}

/// Graph ids of the entities a rule's references resolved to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub starts: Vec<String>,
    pub ends: Vec<String>,
}

/// One relation rule as read from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRule {
    id: Option<String>,
    description: Option<String>,
    starts: Vec<Reference>,
    ends: Vec<Reference>,
    kind: RuleKind,
    resolution: Resolution,
}

impl RelationRule {
    fn new(starts: Vec<Reference>, ends: Vec<Reference>, kind: RuleKind) -> Self {
        RelationRule {
            id: None,
            description: None,
            starts,
            ends,
            kind,
            resolution: Resolution::default(),
        }
    }

    /// Membership of the group at `group_dn`.
    pub fn membership(group_dn: &str, member_dns: &[String]) -> Self {
        RelationRule::new(
            member_dns
                .iter()
                .map(|dn| Reference::Explicit(dn.clone()))
                .collect(),
            vec![Reference::Explicit(group_dn.to_string())],
            RuleKind::Membership,
        )
    }

    /// An HBAC rule; `services` are already reduced with [`ServiceRef::parse`].
    pub fn hbac(
        id: impl Into<String>,
        starts: Vec<Reference>,
        ends: Vec<Reference>,
        services: Vec<ServiceRef>,
    ) -> Self {
        let mut rule = RelationRule::new(
            starts,
            ends,
            RuleKind::Hbac {
                services,
                resolved_services: Vec::new(),
            },
        );
        rule.id = Some(id.into());
        rule
    }

    /// A sudo rule from raw compat-tree values.
    ///
    /// `%` group markers are removed from users, `+` host-group markers from
    /// hosts and `-` from commands. Run-as names are kept verbatim.
    pub fn sudoer<S: AsRef<str>>(users: &[S], hosts: &[S], commands: &[S], run_as: &[S]) -> Self {
        let strip = |values: &[S], marker: char| -> Vec<String> {
            values
                .iter()
                .map(|value| value.as_ref().replace(marker, ""))
                .collect()
        };

        RelationRule::new(
            Reference::parse_all(&strip(users, '%'), Role::Subject),
            Reference::parse_all(&strip(hosts, '+'), Role::Target),
            RuleKind::Sudoer {
                commands: strip(commands, '-'),
                run_as: run_as.iter().map(|value| value.as_ref().to_string()).collect(),
            },
        )
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn starts(&self) -> &[Reference] {
        &self.starts
    }

    pub fn ends(&self) -> &[Reference] {
        &self.ends
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn category(&self) -> RuleCategory {
        match self.kind {
            RuleKind::Membership => RuleCategory::Membership,
            RuleKind::Hbac { .. } => RuleCategory::Hbac,
            RuleKind::Sudoer { .. } => RuleCategory::Sudoer,
        }
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub(crate) fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    pub(crate) fn set_resolved_services(&mut self, labels: Vec<String>) {
        if let RuleKind::Hbac {
            resolved_services, ..
        } = &mut self.kind
        {
            *resolved_services = labels;
        }
    }
}
