use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::relation::MEMBER_OF;

/// How an edge endpoint is matched against nodes. Always by id here.
pub const MATCH_BY_ID: &str = "id";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct EdgeEndpoint {
    pub value: String,
    pub match_by: String,
}

impl EdgeEndpoint {
    pub fn by_id(value: impl Into<String>) -> Self {
        EdgeEndpoint {
            value: value.into(),
            match_by: MATCH_BY_ID.to_string(),
        }
    }
}

/// A directed, labelled edge between two graph ids.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct Edge {
    pub kind: String,
    pub start: EdgeEndpoint,
    pub end: EdgeEndpoint,
}

impl Edge {
    pub fn new(kind: impl Into<String>, start: &str, end: &str) -> Self {
        Edge {
            kind: kind.into(),
            start: EdgeEndpoint::by_id(start),
            end: EdgeEndpoint::by_id(end),
        }
    }

    pub fn member_of(start: &str, end: &str) -> Self {
        Edge::new(MEMBER_OF, start, end)
    }

    pub fn hbac(service: &str, start: &str, end: &str) -> Self {
        Edge::new(format!("HBAC_{service}"), start, end)
    }

    pub fn sudoer(command: &str, run_as: &str, start: &str, end: &str) -> Self {
        Edge::new(format!("Sudoer_{command}_as_{run_as}"), start, end)
    }

    pub fn start_id(&self) -> &str {
        &self.start.value
    }

    pub fn end_id(&self) -> &str {
        &self.end.value
    }
}
