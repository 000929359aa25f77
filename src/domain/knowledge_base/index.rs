//! Similarity index trait
//!
//! The index is the external collaborator that owns embeddings and the
//! nearest-neighbour structure. Upper layers only see documents, ids and
//! distances.

use std::fmt::Debug;

use async_trait::async_trait;

use super::document::Metadata;
use crate::domain::error::DomainError;

/// Column-oriented result of a similarity query, best match first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexQueryResult {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<Metadata>,
    /// One distance per row, lower is more similar; `None` when the index
    /// does not report distances
    pub distances: Option<Vec<f32>>,
}

impl IndexQueryResult {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Column-oriented result of a listing call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexGetResult {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<Metadata>,
}

/// Provider trait for similarity index backends
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait SimilarityIndex: Send + Sync + Debug {
    /// Get the index type name
    fn index_type(&self) -> &'static str;

    /// Name of the collection this index serves
    fn collection_name(&self) -> &str;

    /// Store rows; the three vectors are parallel
    async fn add(
        &self,
        contents: Vec<String>,
        metadatas: Vec<Metadata>,
        ids: Vec<String>,
    ) -> Result<(), DomainError>;

    /// Return up to `n_results` rows ordered by ascending distance
    async fn query(&self, query_text: &str, n_results: usize) -> Result<IndexQueryResult, DomainError>;

    /// List stored rows in insertion order
    async fn get(&self, limit: Option<usize>) -> Result<IndexGetResult, DomainError>;

    /// Number of stored rows
    async fn count(&self) -> Result<usize, DomainError>;

    /// Create the collection if it does not exist
    async fn create_collection(&self) -> Result<(), DomainError>;

    /// Drop the collection and everything in it
    async fn delete_collection(&self) -> Result<(), DomainError>;

    /// Reachability check
    async fn heartbeat(&self) -> Result<(), DomainError>;
}
