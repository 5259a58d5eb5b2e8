use crate::types::{EntityBase, EntityKind, ObjectId, Properties};

/// Anything that becomes a node in the realm graph, e.g. a user, a host or
/// an HBAC service.
pub trait GraphNode {
    /// The node kind ("User", "Computer", "Group", etc)
    fn node_kind() -> EntityKind;

    /// The fields every node shares.
    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    fn dn(&self) -> &str {
        self.base().dn()
    }

    fn object_id(&self) -> &ObjectId {
        self.base().object_id()
    }

    fn set_description(&mut self, description: impl Into<String>)
    where
        Self: Sized,
    {
        self.base_mut().description = Some(description.into());
    }

    /// Build the property bag for this node, by default the shared naming fields.
    fn properties(&self) -> Properties {
        let base = self.base();
        Properties::new()
            .with("name", base.cn())
            .with("distinguishedname", base.dn())
            .with("domainsid", base.domain_sid())
            .with("description", base.description().unwrap_or_default())
    }
}
