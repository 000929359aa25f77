//! Domain layer - Core entities, traits and errors

pub mod embedding;
pub mod error;
pub mod faq;
pub mod knowledge_base;

pub use embedding::{cosine_distance, cosine_similarity, EmbeddingProvider};
pub use error::DomainError;
pub use faq::{
    EscalationTicket, FaqResponse, FaqStatus, InteractionRecord, InteractionRecorder,
};
pub use knowledge_base::{
    CollectionInfo, Document, HealthReport, HealthStatus, IngestionSummary, KnowledgeBaseStats,
    KnowledgeBaseStatsReport, KnowledgeBaseValidationError, Metadata, PipelineStats,
    RagQueryResult, RetrievedContext, SimilarityIndex, StoredDocument,
};
