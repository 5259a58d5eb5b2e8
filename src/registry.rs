//! The run's entity set, in input order and indexed by DN.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::types::{Computer, Entity, EntityKind};

/// DN lookups compare lower-cased names.
pub(crate) fn dn_key(dn: &str) -> String {
    dn.to_lowercase()
}

/// Why [`EntityRegistry::insert`] refused an entity. The entity is handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    DuplicateDn(Entity),
    DuplicateObjectId(Entity),
}

impl InsertError {
    pub fn entity(&self) -> &Entity {
        match self {
            InsertError::DuplicateDn(entity) | InsertError::DuplicateObjectId(entity) => entity,
        }
    }
}

/// Every classified entity of one run.
///
/// Iteration follows insertion (input) order. A DN and an object id are each
/// held at most once.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    by_dn: HashMap<String, usize>,
    object_ids: HashSet<String>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, handing it back if its DN or object id is already taken.
    pub fn insert(&mut self, entity: Entity) -> Result<(), InsertError> {
        let key = dn_key(entity.dn());
        if self.by_dn.contains_key(&key) {
            return Err(InsertError::DuplicateDn(entity));
        }
        if self.object_ids.contains(entity.object_id().as_str()) {
            return Err(InsertError::DuplicateObjectId(entity));
        }
        self.object_ids.insert(entity.object_id().to_string());
        self.by_dn.insert(key, self.entities.len());
        self.entities.push(entity);
        Ok(())
    }

    pub fn contains_object_id(&self, id: &str) -> bool {
        self.object_ids.contains(id)
    }

    pub fn get(&self, dn: &str) -> Option<&Entity> {
        self.by_dn.get(&dn_key(dn)).map(|&index| &self.entities[index])
    }

    pub fn get_mut(&mut self, dn: &str) -> Option<&mut Entity> {
        let index = *self.by_dn.get(&dn_key(dn))?;
        self.entities.get_mut(index)
    }

    pub fn contains(&self, dn: &str) -> bool {
        self.by_dn.contains_key(&dn_key(dn))
    }

    /// The computer registered under `dn`, if that DN names a computer.
    pub fn computer_mut(&mut self, dn: &str) -> Option<&mut Computer> {
        match self.get_mut(dn)? {
            Entity::Computer(computer) => Some(computer),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Entities of one kind, in input order.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |entity| entity.kind() == kind)
    }

    pub fn count_by_kind(&self) -> BTreeMap<EntityKind, usize> {
        let mut counts = BTreeMap::new();
        for entity in &self.entities {
            *counts.entry(entity.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
