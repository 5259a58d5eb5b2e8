//! Access-control entries attached to nodes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entity_kind::EntityKind;

/// One access-control entry, in the graph consumer's field naming.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct Ace {
    pub right_name: String,
    pub is_inherited: bool,
    #[serde(rename = "PrincipalSID")]
    pub principal_sid: String,
    pub principal_type: EntityKind,
}

impl Ace {
    /// A non-inherited entry granting `right` to the given principal.
    pub fn new(right: impl Into<String>, principal_sid: impl Into<String>, kind: EntityKind) -> Self {
        Ace {
            right_name: right.into(),
            is_inherited: false,
            principal_sid: principal_sid.into(),
            principal_type: kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ace_field_names() {
        let ace = Ace::new("GenericAll", "S-1-5-21-1-2-3-512", EntityKind::Group);
        assert_eq!(
            serde_json::to_value(&ace).unwrap(),
            serde_json::json!({
                "RightName": "GenericAll",
                "IsInherited": false,
                "PrincipalSID": "S-1-5-21-1-2-3-512",
                "PrincipalType": "Group"
            })
        );
    }
}
