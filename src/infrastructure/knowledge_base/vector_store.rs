//! Vector store - owns one similarity index collection

use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::knowledge_base::{
    CollectionInfo, Document, Metadata, RetrievedContext, SimilarityIndex, StoredDocument,
    SOURCE_KEY,
};
use crate::domain::DomainError;

/// Document-level facade over a [`SimilarityIndex`]
///
/// Assigns ids, restructures the index's column-oriented results into
/// [`RetrievedContext`] entries and logs every failure before handing it
/// back to the caller.
#[derive(Debug, Clone)]
pub struct VectorStore {
    index: Arc<dyn SimilarityIndex>,
    path: String,
}

impl VectorStore {
    /// Wrap an index, creating its collection if needed
    pub async fn open(
        index: Arc<dyn SimilarityIndex>,
        path: impl Into<String>,
    ) -> Result<Self, DomainError> {
        index.create_collection().await.map_err(|e| {
            tracing::error!(
                collection = %index.collection_name(),
                error = %e,
                "Failed to initialize vector store"
            );
            e
        })?;

        tracing::info!(
            collection = %index.collection_name(),
            index_type = index.index_type(),
            "Vector store initialized"
        );

        Ok(Self {
            index,
            path: path.into(),
        })
    }

    pub fn collection_name(&self) -> &str {
        self.index.collection_name()
    }

    /// Store documents, returning one fresh id per document in input order
    pub async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>, DomainError> {
        if documents.is_empty() {
            tracing::warn!("No documents provided to add");
            return Ok(Vec::new());
        }

        let ids: Vec<String> = documents
            .iter()
            .map(|_| Uuid::new_v4().to_string())
            .collect();
        let (contents, metadatas): (Vec<String>, Vec<Metadata>) = documents
            .into_iter()
            .map(|doc| (doc.content, doc.metadata))
            .unzip();

        self.index
            .add(contents, metadatas, ids.clone())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, count = ids.len(), "Error adding documents");
                e
            })?;

        tracing::info!(count = ids.len(), "Added documents to vector store");
        Ok(ids)
    }

    /// Read a UTF-8 file and store it as a single document
    ///
    /// Metadata defaults to `{source: <file name>}`.
    pub async fn add_document_from_file(
        &self,
        path: impl AsRef<Path>,
        metadata: Option<Metadata>,
    ) -> Result<String, DomainError> {
        let document = read_file_document(path.as_ref(), metadata).await?;

        self.add_documents(vec![document])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::internal("Vector store returned no id for file document"))
    }

    /// Up to `n_results` matches, smallest distance first
    pub async fn similarity_search(
        &self,
        query: &str,
        n_results: usize,
    ) -> Result<Vec<RetrievedContext>, DomainError> {
        let result = self.index.query(query, n_results).await.map_err(|e| {
            tracing::error!(error = %e, query_length = query.len(), "Error searching vector store");
            e
        })?;

        let distances = result.distances;
        let contexts: Vec<RetrievedContext> = result
            .ids
            .into_iter()
            .zip(result.documents)
            .zip(result.metadatas)
            .enumerate()
            .map(|(i, ((id, content), metadata))| {
                let context = RetrievedContext::new(id, content).with_all_metadata(metadata);
                match distances.as_ref().and_then(|d| d.get(i)) {
                    Some(distance) => context.with_distance(*distance),
                    None => context,
                }
            })
            .collect();

        tracing::debug!(
            query_length = query.len(),
            results = contexts.len(),
            "Similarity search completed"
        );
        Ok(contexts)
    }

    /// Alias of [`VectorStore::similarity_search`]
    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedContext>, DomainError> {
        self.similarity_search(query, top_k).await
    }

    /// Drop the collection and recreate it empty under the same name
    pub async fn delete_collection(&self) -> Result<(), DomainError> {
        self.index.delete_collection().await.map_err(|e| {
            tracing::error!(error = %e, "Error deleting collection");
            e
        })?;
        self.index.create_collection().await.map_err(|e| {
            tracing::error!(error = %e, "Error recreating collection");
            e
        })?;

        tracing::info!(collection = %self.collection_name(), "Collection reset");
        Ok(())
    }

    /// Collection info; a failed live count is reported as zero
    pub async fn get_collection_info(&self) -> CollectionInfo {
        let document_count = match self.index.count().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Error counting documents, reporting 0");
                0
            }
        };

        self.collection_info(document_count)
    }

    /// Collection info that fails when the live count fails
    pub async fn try_collection_info(&self) -> Result<CollectionInfo, DomainError> {
        let document_count = self.document_count().await?;
        Ok(self.collection_info(document_count))
    }

    pub async fn document_count(&self) -> Result<usize, DomainError> {
        self.index.count().await
    }

    /// Index reachability check
    pub async fn heartbeat(&self) -> Result<(), DomainError> {
        self.index.heartbeat().await
    }

    /// Stored documents in insertion order; failures yield an empty list
    pub async fn list_documents(&self, limit: Option<usize>) -> Vec<StoredDocument> {
        match self.index.get(limit).await {
            Ok(result) => result
                .ids
                .into_iter()
                .zip(result.documents)
                .zip(result.metadatas)
                .map(|((id, content), metadata)| StoredDocument {
                    id,
                    content,
                    metadata,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Error listing documents");
                Vec::new()
            }
        }
    }

    fn collection_info(&self, document_count: usize) -> CollectionInfo {
        CollectionInfo {
            name: self.index.collection_name().to_string(),
            index_type: self.index.index_type().to_string(),
            path: self.path.clone(),
            document_count,
        }
    }
}

/// Load a UTF-8 file as one document, defaulting metadata to `{source: <file name>}`
pub(crate) async fn read_file_document(
    path: &Path,
    metadata: Option<Metadata>,
) -> Result<Document, DomainError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DomainError::not_found(format!("File not found: {}", path.display()))
        } else {
            DomainError::io(format!("Failed to read {}: {}", path.display(), e))
        }
    })?;

    let metadata = metadata.unwrap_or_else(|| default_file_metadata(path));
    Ok(Document::new(content).with_all_metadata(metadata))
}

fn default_file_metadata(path: &Path) -> Metadata {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let mut metadata = Metadata::new();
    metadata.insert(SOURCE_KEY.to_string(), serde_json::Value::String(name));
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::{MockRow, MockSimilarityIndex};
    use crate::infrastructure::embedding::HashingEmbeddingProvider;
    use crate::infrastructure::knowledge_base::InMemorySimilarityIndex;
    use serde_json::json;
    use tempfile::TempDir;

    async fn create_store() -> VectorStore {
        let index = InMemorySimilarityIndex::new(
            "test_kb",
            Arc::new(HashingEmbeddingProvider::default()),
        );
        VectorStore::open(Arc::new(index), "./data/vectors").await.unwrap()
    }

    async fn mock_store(index: Arc<MockSimilarityIndex>) -> VectorStore {
        VectorStore::open(index, "mock").await.unwrap()
    }

    #[tokio::test]
    async fn test_add_documents_assigns_unique_ids() {
        let store = create_store().await;

        let ids = store
            .add_documents(vec![
                Document::new("Refunds allowed within 30 days.").with_source("policy.txt"),
                Document::new("Reset your password from the login page."),
            ])
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(Uuid::parse_str(&ids[0]).is_ok());

        let listed = store.list_documents(None).await;
        assert_eq!(listed[0].id, ids[0]);
        assert_eq!(listed[0].source(), Some("policy.txt"));
        assert_eq!(listed[1].id, ids[1]);
    }

    #[tokio::test]
    async fn test_add_empty_batch_skips_index() {
        let index = Arc::new(MockSimilarityIndex::new());
        let store = mock_store(index.clone()).await;

        let ids = store.add_documents(Vec::new()).await.unwrap();

        assert!(ids.is_empty());
        assert_eq!(index.add_count(), 0);
    }

    #[tokio::test]
    async fn test_add_failure_propagates() {
        let index = Arc::new(MockSimilarityIndex::new());
        index.set_fail_add(true);
        let store = mock_store(index).await;

        let result = store.add_documents(vec![Document::new("content")]).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_similarity_search_passes_distances_through() {
        let index = Arc::new(MockSimilarityIndex::new().with_fixed_results(vec![
            MockRow::new("a", "first", Some(0.1)).with_source("a.txt"),
            MockRow::new("b", "second", Some(0.4)),
        ]));
        let store = mock_store(index).await;

        let results = store.similarity_search("question", 5).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "a");
        assert_eq!(results[0].distance, Some(0.1));
        assert_eq!(results[0].source(), Some("a.txt"));
        assert_eq!(results[0].similarity_score, None);
        assert_eq!(results[1].distance, Some(0.4));
    }

    #[tokio::test]
    async fn test_similarity_search_without_distances() {
        let index = Arc::new(
            MockSimilarityIndex::new().with_fixed_results(vec![MockRow::new("a", "first", None)]),
        );
        let store = mock_store(index).await;

        let results = store.search("question", 5).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance, None);
    }

    #[tokio::test]
    async fn test_search_empty_collection() {
        let store = create_store().await;

        let results = store.similarity_search("anything", 5).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_orders_by_distance() {
        let store = create_store().await;
        store
            .add_documents(vec![
                Document::new("Password reset instructions for your account."),
                Document::new("Refunds allowed within 30 days of purchase."),
                Document::new("Our refund policy covers refunds for damaged items."),
            ])
            .await
            .unwrap();

        let results = store.similarity_search("refund policy", 3).await.unwrap();
        let distances: Vec<f32> = results.iter().filter_map(|r| r.distance).collect();

        assert_eq!(distances.len(), 3);
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let index = Arc::new(MockSimilarityIndex::new());
        index.set_fail_query(true);
        let store = mock_store(index).await;

        assert!(store.similarity_search("question", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_collection_resets_contents() {
        let store = create_store().await;
        store
            .add_documents(vec![Document::new("one"), Document::new("two")])
            .await
            .unwrap();

        store.delete_collection().await.unwrap();

        let info = store.get_collection_info().await;
        assert_eq!(info.name, "test_kb");
        assert_eq!(info.document_count, 0);

        store.add_documents(vec![Document::new("three")]).await.unwrap();
        assert_eq!(store.document_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_collection_info_degrades_on_count_failure() {
        let index = Arc::new(MockSimilarityIndex::new());
        let store = mock_store(index.clone()).await;
        store.add_documents(vec![Document::new("one")]).await.unwrap();

        let info = store.get_collection_info().await;
        assert_eq!(info.document_count, 1);
        assert_eq!(info.index_type, "mock");
        assert_eq!(info.path, "mock");

        index.set_fail_count(true);
        assert_eq!(store.get_collection_info().await.document_count, 0);
        assert!(store.try_collection_info().await.is_err());
    }

    #[tokio::test]
    async fn test_list_documents_is_best_effort() {
        let index = Arc::new(MockSimilarityIndex::new());
        let store = mock_store(index.clone()).await;
        store
            .add_documents(vec![Document::new("one"), Document::new("two")])
            .await
            .unwrap();

        assert_eq!(store.list_documents(Some(1)).await.len(), 1);

        index.set_fail_get(true);
        assert!(store.list_documents(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_add_document_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refunds.txt");
        std::fs::write(&path, "Refunds allowed within 30 days.").unwrap();
        let store = create_store().await;

        let id = store.add_document_from_file(&path, None).await.unwrap();

        let listed = store.list_documents(None).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].source(), Some("refunds.txt"));
        assert_eq!(listed[0].content, "Refunds allowed within 30 days.");

        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), json!("custom"));
        store.add_document_from_file(&path, Some(metadata)).await.unwrap();
        assert_eq!(store.list_documents(None).await[1].source(), Some("custom"));
    }

    #[tokio::test]
    async fn test_add_document_from_missing_file() {
        let store = create_store().await;

        let result = store.add_document_from_file("/nonexistent/file.txt", None).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
