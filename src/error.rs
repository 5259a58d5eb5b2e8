use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum GraphError {
    #[error("cannot identify the security identifier of realm '{0}'")]
    RealmSidNotFound(String),

    #[error("invalid realm name: {0}")]
    InvalidRealm(String),

    #[error("invalid classification pattern: {0}")]
    PatternError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<regex::Error> for GraphError {
    fn from(err: regex::Error) -> Self {
        GraphError::PatternError(err.to_string())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_realm_sid_not_found_message() {
        let err = GraphError::RealmSidNotFound("example.com".to_string());
        assert_eq!(
            err.to_string(),
            "cannot identify the security identifier of realm 'example.com'"
        );
    }

    #[test]
    fn test_from_regex_error() {
        let err: GraphError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, GraphError::PatternError(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err: GraphError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, GraphError::SerializationError(_)));
    }

    #[test]
    fn test_error_serialization() {
        let err = GraphError::InvalidRealm("empty label in 'example..com'".to_string());
        let serialized = serde_json::to_value(&err).unwrap();
        let deserialized: GraphError = serde_json::from_value(serialized).unwrap();
        assert_eq!(err, deserialized);
    }
}
