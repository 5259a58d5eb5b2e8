//! Graph-stable object identifiers.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where an identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IdOrigin {
    /// Read from the entry's `ipaNTSecurityIdentifier`.
    Source,
    /// Derived from the realm SID and the entry position.
    Synthetic,
}

/// The identifier a node carries in the graph, e.g. `S-1-5-21-1-2-3-1105`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ObjectId {
    value: String,
    origin: IdOrigin,
}

impl ObjectId {
    pub fn source(value: impl Into<String>) -> Self {
        ObjectId {
            value: value.into(),
            origin: IdOrigin::Source,
        }
    }

    pub fn synthetic(value: impl Into<String>) -> Self {
        ObjectId {
            value: value.into(),
            origin: IdOrigin::Synthetic,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn origin(&self) -> IdOrigin {
        self.origin
    }

    pub fn is_synthetic(&self) -> bool {
        self.origin == IdOrigin::Synthetic
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.value)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id() {
        let id = ObjectId::source("S-1-5-21-1-2-3-1001");
        assert_eq!(id.as_str(), "S-1-5-21-1-2-3-1001");
        assert_eq!(id.origin(), IdOrigin::Source);
        assert!(!id.is_synthetic());
    }

    #[test]
    fn test_synthetic_id() {
        let id = ObjectId::synthetic("S-1-5-21-1-2-3-1105");
        assert!(id.is_synthetic());
        assert_eq!(id.to_string(), "S-1-5-21-1-2-3-1105");
    }

    #[test]
    fn test_same_value_different_origin_not_equal() {
        assert_ne!(ObjectId::source("S-1"), ObjectId::synthetic("S-1"));
    }

    #[test]
    fn test_object_id_serialization() {
        let id = ObjectId::synthetic("S-1-5-21-1-2-3-1105");
        let serialized = serde_json::to_value(&id).unwrap();
        assert_eq!(
            serialized,
            serde_json::json!({ "value": "S-1-5-21-1-2-3-1105", "origin": "synthetic" })
        );
        let deserialized: ObjectId = serde_json::from_value(serialized).unwrap();
        assert_eq!(id, deserialized);
    }
}
