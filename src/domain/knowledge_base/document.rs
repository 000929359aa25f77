//! Knowledge base document entities

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Open metadata map attached to every document
pub type Metadata = HashMap<String, serde_json::Value>;

/// Metadata key naming where a document came from
pub const SOURCE_KEY: &str = "source";
/// Metadata key linking an updated version back to the superseded document
pub const PREVIOUS_ID_KEY: &str = "previous_id";
/// Metadata key holding the RFC 3339 timestamp of an update
pub const UPDATED_AT_KEY: &str = "updated_at";

/// A unit of ingestible knowledge, not yet stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document content text
    pub content: String,
    /// Metadata key-value pairs
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a new document with empty metadata
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Add metadata to the document
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Set all metadata
    pub fn with_all_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the source reference
    pub fn with_source(self, source: impl Into<String>) -> Self {
        self.with_metadata(SOURCE_KEY, serde_json::Value::String(source.into()))
    }

    /// Source reference, if the metadata carries a string `source`
    pub fn source(&self) -> Option<&str> {
        metadata_source(&self.metadata)
    }
}

/// A document as held by the index, with its assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl StoredDocument {
    pub fn source(&self) -> Option<&str> {
        metadata_source(&self.metadata)
    }

    pub fn previous_id(&self) -> Option<&str> {
        self.metadata.get(PREVIOUS_ID_KEY).and_then(|v| v.as_str())
    }
}

pub(crate) fn metadata_source(metadata: &Metadata) -> Option<&str> {
    metadata.get(SOURCE_KEY).and_then(|v| v.as_str())
}
