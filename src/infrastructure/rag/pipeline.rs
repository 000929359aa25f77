//! RAG pipeline implementation
//!
//! Retrieves context from the vector store, filters it by similarity and
//! assembles the prompt handed to the answering layer.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::knowledge_base::{PipelineStats, RagQueryResult, RetrievedContext};
use crate::domain::DomainError;
use crate::infrastructure::knowledge_base::VectorStore;

use super::prompt::build_prompt;

/// Default number of documents retrieved per query
pub const DEFAULT_TOP_K: usize = 5;

/// Retrieval settings
#[derive(Debug, Clone, PartialEq)]
pub struct RagConfig {
    pub top_k: usize,
    /// Minimum `1 - distance` for a result to be kept; `0.0` disables filtering
    pub similarity_threshold: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            similarity_threshold: 0.0,
        }
    }
}

impl RagConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}

/// Retrieval-augmented generation pipeline
#[derive(Debug, Clone)]
pub struct RagPipeline {
    vector_store: Arc<VectorStore>,
    config: RagConfig,
}

impl RagPipeline {
    /// Create a new pipeline over a vector store
    pub fn new(vector_store: Arc<VectorStore>, config: RagConfig) -> Self {
        info!(
            top_k = config.top_k,
            similarity_threshold = config.similarity_threshold,
            "RAG pipeline initialized"
        );
        Self {
            vector_store,
            config,
        }
    }

    pub fn top_k(&self) -> usize {
        self.config.top_k
    }

    pub fn similarity_threshold(&self) -> f32 {
        self.config.similarity_threshold
    }

    /// Retrieve context documents for a query
    ///
    /// Blank queries return no context without touching the index. With
    /// `filter_threshold` set and a positive threshold, results carrying a
    /// distance are kept iff `1 - distance >= threshold` and get their
    /// similarity score attached; results without a distance pass unscored.
    pub async fn retrieve_context(
        &self,
        query: &str,
        top_k: Option<usize>,
        filter_threshold: bool,
    ) -> Result<Vec<RetrievedContext>, DomainError> {
        if query.trim().is_empty() {
            warn!("Empty query provided to retrieve_context");
            return Ok(Vec::new());
        }

        let k = top_k.unwrap_or(self.config.top_k);

        let results = self
            .vector_store
            .similarity_search(query, k)
            .await
            .map_err(|e| {
                let message = format!("Failed to retrieve context: {}", e);
                error!("{}", message);
                DomainError::rag_pipeline(message)
            })?;

        let results = if filter_threshold && self.config.similarity_threshold > 0.0 {
            filter_by_similarity(results, self.config.similarity_threshold)
        } else {
            results
        };

        info!(
            query_length = query.len(),
            results_count = results.len(),
            top_k = k,
            "Retrieved {} context documents",
            results.len()
        );

        Ok(results)
    }

    /// Assemble the prompt for a query and its context
    pub fn generate_prompt(
        &self,
        query: &str,
        context: &[RetrievedContext],
        system_instruction: Option<&str>,
    ) -> String {
        if context.is_empty() {
            warn!("No context provided for prompt generation");
        }

        let prompt = build_prompt(query, context, system_instruction);

        debug!(
            context_docs = context.len(),
            prompt_length = prompt.len(),
            "Generated prompt"
        );
        prompt
    }

    /// Retrieve context and assemble the prompt in one call
    pub async fn query(
        &self,
        user_query: &str,
        top_k: Option<usize>,
        system_instruction: Option<&str>,
    ) -> Result<RagQueryResult, DomainError> {
        let context = self.retrieve_context(user_query, top_k, true).await?;
        let prompt = self.generate_prompt(user_query, &context, system_instruction);

        let result = RagQueryResult::new(user_query, prompt, context);

        info!(
            query_length = user_query.len(),
            context_count = result.context_count,
            "RAG query completed"
        );
        Ok(result)
    }

    /// Pipeline settings plus live collection info
    pub async fn get_pipeline_stats(&self) -> PipelineStats {
        match self.vector_store.try_collection_info().await {
            Ok(info) => PipelineStats {
                top_k: self.config.top_k,
                similarity_threshold: self.config.similarity_threshold,
                vector_store: Some(info),
                error: None,
            },
            Err(e) => {
                error!(error = %e, "Failed to get pipeline stats");
                PipelineStats {
                    top_k: self.config.top_k,
                    similarity_threshold: self.config.similarity_threshold,
                    vector_store: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

fn filter_by_similarity(results: Vec<RetrievedContext>, threshold: f32) -> Vec<RetrievedContext> {
    results
        .into_iter()
        .filter_map(|result| match result.similarity_from_distance() {
            Some(similarity) if similarity >= threshold => {
                Some(result.with_similarity_score(similarity))
            }
            Some(_) => None,
            None => Some(result),
        })
        .collect()
}
