//! Run configuration.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Shape of the rendered graph.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// One nodes + edges document.
    #[default]
    Unified,
    /// One document per account kind plus an edge document.
    Legacy,
}

/// Configuration for one ingest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Dotted realm name, e.g. `example.com`.
    pub realm: String,

    /// Output document shape.
    pub format: OutputFormat,

    /// `metadata.source_kind` of the unified document.
    pub source_kind: String,

    /// Derive the realm SID from the built-in `admins` group when the realm
    /// metadata entry is not readable (anonymous bind).
    pub anonymous_fallback: bool,
}

fn default_source_kind() -> String {
    "IDMGraph".to_string()
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            realm: String::new(),
            format: OutputFormat::default(),
            source_kind: default_source_kind(),
            anonymous_fallback: true,
        }
    }
}

impl IngestConfig {
    pub fn new(realm: impl Into<String>) -> Self {
        IngestConfig {
            realm: realm.into(),
            ..IngestConfig::default()
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_source_kind(mut self, source_kind: impl Into<String>) -> Self {
        self.source_kind = source_kind.into();
        self
    }

    pub fn with_anonymous_fallback(mut self, enabled: bool) -> Self {
        self.anonymous_fallback = enabled;
        self
    }
}
