//! Retrieval result types

use serde::{Deserialize, Serialize};

use super::document::{Metadata, metadata_source};

/// A single match returned by a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedContext {
    /// Identifier assigned at ingestion
    pub id: String,
    /// Content text
    pub content: String,
    /// Document metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Raw index distance (lower is more similar), when the index reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    /// `1 - distance`, attached only by threshold filtering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f32>,
}

impl RetrievedContext {
    /// Create a new unscored context entry
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Metadata::new(),
            distance: None,
            similarity_score: None,
        }
    }

    /// Set the raw distance
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Set the similarity score
    pub fn with_similarity_score(mut self, score: f32) -> Self {
        self.similarity_score = Some(score);
        self
    }

    /// Set all metadata
    pub fn with_all_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn source(&self) -> Option<&str> {
        metadata_source(&self.metadata)
    }

    /// Similarity derived from the distance, if any
    pub fn similarity_from_distance(&self) -> Option<f32> {
        self.distance.map(|d| 1.0 - d)
    }
}

/// Result of an end-to-end RAG query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagQueryResult {
    pub query: String,
    pub prompt: String,
    pub context: Vec<RetrievedContext>,
    pub context_count: usize,
}

impl RagQueryResult {
    pub fn new(query: impl Into<String>, prompt: impl Into<String>, context: Vec<RetrievedContext>) -> Self {
        let context_count = context.len();
        Self {
            query: query.into(),
            prompt: prompt.into(),
            context,
            context_count,
        }
    }

    /// Top-ranked context entry
    pub fn top(&self) -> Option<&RetrievedContext> {
        self.context.first()
    }
}

/// Descriptive information about the backing collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub index_type: String,
    pub path: String,
    pub document_count: usize,
}

/// Pipeline configuration plus live collection info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub top_k: usize,
    pub similarity_threshold: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_store: Option<CollectionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineStats {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_similarity_from_distance() {
        let ctx = RetrievedContext::new("id-1", "content").with_distance(0.25);
        assert_eq!(ctx.similarity_from_distance(), Some(0.75));

        let unscored = RetrievedContext::new("id-2", "content");
        assert_eq!(unscored.similarity_from_distance(), None);
    }

    #[test]
    fn test_rag_query_result_counts_context() {
        let result = RagQueryResult::new(
            "q",
            "prompt",
            vec![
                RetrievedContext::new("a", "first"),
                RetrievedContext::new("b", "second"),
            ],
        );

        assert_eq!(result.context_count, 2);
        assert_eq!(result.top().map(|c| c.id.as_str()), Some("a"));
    }

    #[test]
    fn test_collection_info_serializes_type_field() {
        let info = CollectionInfo {
            name: "helpdesk_kb".to_string(),
            index_type: "in_memory".to_string(),
            path: "./data/vectors".to_string(),
            document_count: 3,
        };

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["type"], json!("in_memory"));
        assert_eq!(value["document_count"], json!(3));
    }
}
