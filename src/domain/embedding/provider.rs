//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for turning text into dense vectors
///
/// The bundled similarity indexes call this once per batch on add and once
/// per query. Implementations must return exactly one vector per input, each
/// of `dimensions()` length.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate embeddings for the given inputs
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the embedding dimensions
    fn dimensions(&self) -> usize;
}
