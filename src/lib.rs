//! Helpdesk Knowledge Base
//!
//! Retrieval layer shared by customer-support channel agents:
//! - Document ingestion with validation and append-only updates
//! - Similarity search over a pluggable index
//! - Threshold filtering and prompt assembly
//! - Confidence-gated answering with escalation to a human

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::EmbeddingProvider;
use infrastructure::{
    embedding::HashingEmbeddingProvider,
    faq::FaqAgent,
    knowledge_base::{SimilarityIndexFactory, VectorStore},
    rag::{RagConfig, RagPipeline},
    services::KnowledgeBaseManager,
};
use tracing::info;

/// Wired application components
#[derive(Debug, Clone)]
pub struct AppContext {
    pub vector_store: Arc<VectorStore>,
    pub rag_pipeline: Arc<RagPipeline>,
    pub kb_manager: Arc<KnowledgeBaseManager>,
    pub faq_agent: Arc<FaqAgent>,
}

/// Create the application context with the default configuration
pub async fn create_app_context() -> anyhow::Result<AppContext> {
    create_app_context_with_config(&AppConfig::default()).await
}

/// Create the application context from configuration
pub async fn create_app_context_with_config(config: &AppConfig) -> anyhow::Result<AppContext> {
    config.validate()?;
    let kb_config = &config.knowledge_base;

    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(HashingEmbeddingProvider::new(kb_config.embedding_dimensions));

    info!(
        index_type = %kb_config.vector_db_type,
        collection = %kb_config.collection_name,
        "Opening similarity index"
    );
    let index = SimilarityIndexFactory::create(
        &kb_config.vector_db_type,
        &kb_config.vector_db_path,
        &kb_config.collection_name,
        embedder,
    )
    .await?;

    let vector_store = Arc::new(VectorStore::open(index, kb_config.vector_db_path.clone()).await?);

    let rag_pipeline = Arc::new(RagPipeline::new(
        vector_store.clone(),
        RagConfig::default()
            .with_top_k(kb_config.top_k)
            .with_similarity_threshold(kb_config.similarity_threshold),
    ));

    let kb_manager = Arc::new(KnowledgeBaseManager::new(
        vector_store.clone(),
        rag_pipeline.clone(),
    ));

    let faq_agent = Arc::new(
        FaqAgent::new(kb_manager.clone())
            .with_confidence_threshold(config.faq.confidence_threshold),
    );

    Ok(AppContext {
        vector_store,
        rag_pipeline,
        kb_manager,
        faq_agent,
    })
}
