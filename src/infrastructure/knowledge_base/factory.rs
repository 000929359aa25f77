//! Similarity index factory

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::knowledge_base::SimilarityIndex;
use crate::domain::DomainError;

use super::in_memory::InMemorySimilarityIndex;
use super::json_file::JsonFileSimilarityIndex;

/// Bundled index backends, selected by `VECTOR_DB_TYPE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    InMemory,
    JsonFile,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InMemory => "in_memory",
            Self::JsonFile => "json_file",
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IndexType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in_memory" | "memory" => Ok(Self::InMemory),
            "json_file" | "json" => Ok(Self::JsonFile),
            other => Err(DomainError::configuration(format!(
                "Unsupported VECTOR_DB_TYPE: {}",
                other
            ))),
        }
    }
}

/// Factory for creating similarity indexes
#[derive(Debug)]
pub struct SimilarityIndexFactory;

impl SimilarityIndexFactory {
    /// Create an in-memory index
    pub fn create_in_memory(
        collection_name: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Arc<dyn SimilarityIndex> {
        Arc::new(InMemorySimilarityIndex::new(collection_name, embedder))
    }

    /// Open a JSON-snapshot index under `path`
    pub async fn create_json_file(
        path: &str,
        collection_name: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Arc<dyn SimilarityIndex>, DomainError> {
        let index = JsonFileSimilarityIndex::open(path, collection_name, embedder).await?;
        Ok(Arc::new(index))
    }

    /// Create an index from its configured type name
    pub async fn create(
        index_type: &str,
        path: &str,
        collection_name: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Arc<dyn SimilarityIndex>, DomainError> {
        match index_type.parse::<IndexType>()? {
            IndexType::InMemory => Ok(Self::create_in_memory(collection_name, embedder)),
            IndexType::JsonFile => Self::create_json_file(path, collection_name, embedder).await,
        }
    }
}
