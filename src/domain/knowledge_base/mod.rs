//! Knowledge Base domain - documents, retrieval results and the index seam

mod document;
mod entity;
mod index;
mod stats;
mod validation;

pub use document::{
    Document, Metadata, StoredDocument, PREVIOUS_ID_KEY, SOURCE_KEY, UPDATED_AT_KEY,
};
pub use entity::{CollectionInfo, PipelineStats, RagQueryResult, RetrievedContext};
pub use index::{IndexGetResult, IndexQueryResult, SimilarityIndex};
pub use stats::{
    HealthChecks, HealthReport, HealthStatus, IngestionSummary, KnowledgeBaseStats,
    KnowledgeBaseStatsReport,
};
pub use validation::{
    check_document, parse_document_value, validate_collection_name, validate_dimensions,
    validate_threshold, validate_top_k, KnowledgeBaseValidationError,
};

#[cfg(test)]
pub use index::mock::{MockRow, MockSimilarityIndex};
