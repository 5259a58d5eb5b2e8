//! Graph identifiers for entities.

use crate::types::ObjectId;

/// Offset keeping synthetic RIDs clear of the directory's well-known range.
pub const SYNTHETIC_RID_OFFSET: usize = 1000;

/// Hands out graph identifiers for one run.
///
/// Entities with a source SID keep it. Everything else gets
/// `<realm_sid>-<entry_count + 1000 + entry_index>`, which is unique across
/// kinds because the entry index is global to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityAssigner {
    realm_sid: String,
    entry_count: usize,
}

impl IdentityAssigner {
    pub fn new(realm_sid: impl Into<String>, entry_count: usize) -> Self {
        IdentityAssigner {
            realm_sid: realm_sid.into(),
            entry_count,
        }
    }

    pub fn assign(&self, source: Option<&str>, entry_index: usize) -> ObjectId {
        match source.map(str::trim).filter(|sid| !sid.is_empty()) {
            Some(sid) => ObjectId::source(sid),
            None => self.synthetic(entry_index),
        }
    }

    pub fn synthetic(&self, entry_index: usize) -> ObjectId {
        let rid = self.entry_count + SYNTHETIC_RID_OFFSET + entry_index;
        ObjectId::synthetic(format!("{}-{rid}", self.realm_sid))
    }
}
