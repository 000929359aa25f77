//! In-memory similarity index for development and testing

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::embedding::{cosine_distance, EmbeddingProvider};
use crate::domain::knowledge_base::{IndexGetResult, IndexQueryResult, Metadata, SimilarityIndex};
use crate::domain::DomainError;

const INDEX_TYPE: &str = "in_memory";

/// A row plus its index-internal embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredRow {
    pub(crate) id: String,
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) metadata: Metadata,
    pub(crate) embedding: Vec<f32>,
}

/// Linear-scan cosine index
///
/// Rows are kept in insertion order; queries rank by ascending cosine
/// distance and equal distances keep insertion order.
#[derive(Debug)]
pub struct InMemorySimilarityIndex {
    collection_name: String,
    embedder: Arc<dyn EmbeddingProvider>,
    rows: Arc<RwLock<Vec<StoredRow>>>,
}

impl InMemorySimilarityIndex {
    /// Create a new empty index
    pub fn new(collection_name: impl Into<String>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            collection_name: collection_name.into(),
            embedder,
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub(crate) async fn snapshot(&self) -> Vec<StoredRow> {
        self.rows.read().await.clone()
    }

    pub(crate) async fn restore(&self, rows: Vec<StoredRow>) {
        *self.rows.write().await = rows;
    }

    fn error(message: impl Into<String>) -> DomainError {
        DomainError::index(INDEX_TYPE, message)
    }
}

#[async_trait]
impl SimilarityIndex for InMemorySimilarityIndex {
    fn index_type(&self) -> &'static str {
        INDEX_TYPE
    }

    fn collection_name(&self) -> &str {
        &self.collection_name
    }

    async fn add(
        &self,
        contents: Vec<String>,
        metadatas: Vec<Metadata>,
        ids: Vec<String>,
    ) -> Result<(), DomainError> {
        if contents.len() != ids.len() || metadatas.len() != ids.len() {
            return Err(Self::error(format!(
                "Mismatched batch: {} ids, {} contents, {} metadatas",
                ids.len(),
                contents.len(),
                metadatas.len()
            )));
        }

        if ids.is_empty() {
            return Ok(());
        }

        let embeddings = self.embedder.embed(&contents).await?;
        if embeddings.len() != contents.len() {
            return Err(Self::error(format!(
                "Embedding provider '{}' returned {} vectors for {} inputs",
                self.embedder.provider_name(),
                embeddings.len(),
                contents.len()
            )));
        }

        let mut rows = self.rows.write().await;

        let mut seen: HashSet<&str> = rows.iter().map(|row| row.id.as_str()).collect();
        for id in &ids {
            if !seen.insert(id.as_str()) {
                return Err(Self::error(format!("Duplicate document id: {}", id)));
            }
        }

        let batch = ids
            .into_iter()
            .zip(contents)
            .zip(metadatas)
            .zip(embeddings)
            .map(|(((id, content), metadata), embedding)| StoredRow {
                id,
                content,
                metadata,
                embedding,
            });
        rows.extend(batch);

        Ok(())
    }

    async fn query(&self, query_text: &str, n_results: usize) -> Result<IndexQueryResult, DomainError> {
        if n_results == 0 || self.rows.read().await.is_empty() {
            return Ok(IndexQueryResult {
                distances: Some(Vec::new()),
                ..Default::default()
            });
        }

        let query_embedding = self
            .embedder
            .embed(&[query_text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Self::error("Embedding provider returned no vector for the query"))?;

        let rows = self.rows.read().await;
        let mut ranked: Vec<(f32, &StoredRow)> = rows
            .iter()
            .map(|row| (cosine_distance(&query_embedding, &row.embedding), row))
            .collect();

        // sort_by is stable, so ties keep insertion order
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.truncate(n_results);

        Ok(IndexQueryResult {
            ids: ranked.iter().map(|(_, row)| row.id.clone()).collect(),
            documents: ranked.iter().map(|(_, row)| row.content.clone()).collect(),
            metadatas: ranked.iter().map(|(_, row)| row.metadata.clone()).collect(),
            distances: Some(ranked.iter().map(|(distance, _)| *distance).collect()),
        })
    }

    async fn get(&self, limit: Option<usize>) -> Result<IndexGetResult, DomainError> {
        let rows = self.rows.read().await;
        let rows = rows.iter().take(limit.unwrap_or(usize::MAX));

        let mut result = IndexGetResult::default();
        for row in rows {
            result.ids.push(row.id.clone());
            result.documents.push(row.content.clone());
            result.metadatas.push(row.metadata.clone());
        }

        Ok(result)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.rows.read().await.len())
    }

    async fn create_collection(&self) -> Result<(), DomainError> {
        // Nothing to provision
        Ok(())
    }

    async fn delete_collection(&self) -> Result<(), DomainError> {
        self.rows.write().await.clear();
        Ok(())
    }

    async fn heartbeat(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::infrastructure::embedding::HashingEmbeddingProvider;

    fn create_index() -> InMemorySimilarityIndex {
        InMemorySimilarityIndex::new("test_kb", Arc::new(HashingEmbeddingProvider::default()))
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_add_and_query() {
        let index = create_index();

        index
            .add(
                texts(&[
                    "Rust is a systems programming language",
                    "Python is great for data science",
                    "Rust provides memory safety guarantees",
                ]),
                vec![Metadata::new(); 3],
                texts(&["doc1", "doc2", "doc3"]),
            )
            .await
            .unwrap();

        let result = index.query("rust memory safety", 2).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.ids[0], "doc3");
        assert_eq!(result.ids[1], "doc1");

        let distances = result.distances.unwrap();
        assert!(distances[0] <= distances[1]);
    }

    #[tokio::test]
    async fn test_query_orders_by_non_decreasing_distance() {
        let index = create_index();
        index
            .add(
                texts(&[
                    "billing invoices and payment",
                    "refund policy allows refunds",
                    "refund window is thirty days for refund requests",
                    "password reset steps",
                ]),
                vec![Metadata::new(); 4],
                texts(&["a", "b", "c", "d"]),
            )
            .await
            .unwrap();

        let distances = index
            .query("refund", 4)
            .await
            .unwrap()
            .distances
            .unwrap();

        assert_eq!(distances.len(), 4);
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_equal_distances_keep_insertion_order() {
        let index = create_index();
        index
            .add(
                texts(&["same text", "same text", "same text"]),
                vec![Metadata::new(); 3],
                texts(&["first", "second", "third"]),
            )
            .await
            .unwrap();

        let result = index.query("same text", 3).await.unwrap();
        assert_eq!(result.ids, texts(&["first", "second", "third"]));
    }

    #[tokio::test]
    async fn test_query_empty_collection() {
        let index = create_index();

        let result = index.query("anything", 5).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(result.distances, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_add_rejects_mismatched_batches() {
        let index = create_index();

        let result = index
            .add(texts(&["one", "two"]), vec![Metadata::new()], texts(&["a", "b"]))
            .await;

        assert!(matches!(result, Err(DomainError::Index { .. })));
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_ids() {
        let index = create_index();
        index
            .add(texts(&["one"]), vec![Metadata::new()], texts(&["a"]))
            .await
            .unwrap();

        let result = index
            .add(texts(&["two"]), vec![Metadata::new()], texts(&["a"]))
            .await;

        assert!(result.is_err());
        assert_eq!(index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let embedder = MockEmbeddingProvider::new(8).with_error("model offline");
        let index = InMemorySimilarityIndex::new("test_kb", Arc::new(embedder));

        let result = index
            .add(texts(&["one"]), vec![Metadata::new()], texts(&["a"]))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_with_limit_and_delete() {
        let index = create_index();
        index
            .add(
                texts(&["one", "two", "three"]),
                vec![Metadata::new(); 3],
                texts(&["a", "b", "c"]),
            )
            .await
            .unwrap();

        let listed = index.get(Some(2)).await.unwrap();
        assert_eq!(listed.ids, texts(&["a", "b"]));

        index.delete_collection().await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);
    }
}
