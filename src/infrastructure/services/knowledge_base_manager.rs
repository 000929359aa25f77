//! Knowledge base manager - ingestion, search, statistics and health

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::knowledge_base::{
    check_document, parse_document_value, Document, HealthChecks, HealthReport, HealthStatus,
    IngestionSummary, KnowledgeBaseStats, KnowledgeBaseStatsReport, Metadata, RagQueryResult,
    StoredDocument, PREVIOUS_ID_KEY, SOURCE_KEY, UPDATED_AT_KEY,
};
use crate::domain::DomainError;
use crate::infrastructure::knowledge_base::{read_file_document, VectorStore};
use crate::infrastructure::observability::{
    record_documents_ingested, record_ingestion_failures, record_search,
};
use crate::infrastructure::rag::RagPipeline;

const NO_RESULTS_MESSAGE: &str = "No relevant information found in the knowledge base.";
const RESULTS_HEADER: &str = "Based on the knowledge base, here's what we found:";

/// Running counters, safe to bump from concurrent callers
#[derive(Debug, Default)]
struct StatsCounters {
    total_documents: AtomicU64,
    total_queries: AtomicU64,
    successful_ingestions: AtomicU64,
    failed_ingestions: AtomicU64,
    last_update: RwLock<Option<DateTime<Utc>>>,
}

impl StatsCounters {
    async fn snapshot(&self) -> KnowledgeBaseStats {
        KnowledgeBaseStats {
            total_documents: self.total_documents.load(Ordering::Relaxed),
            total_queries: self.total_queries.load(Ordering::Relaxed),
            successful_ingestions: self.successful_ingestions.load(Ordering::Relaxed),
            failed_ingestions: self.failed_ingestions.load(Ordering::Relaxed),
            last_update: *self.last_update.read().await,
        }
    }

    fn add_failed(&self, count: usize) {
        self.failed_ingestions
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    fn add_stored(&self, count: usize) {
        self.total_documents
            .fetch_add(count as u64, Ordering::Relaxed);
        self.successful_ingestions
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    async fn touch(&self) -> DateTime<Utc> {
        let now = Utc::now();
        *self.last_update.write().await = Some(now);
        now
    }
}

/// Entry point for ingestion and retrieval used by channel agents
#[derive(Debug)]
pub struct KnowledgeBaseManager {
    vector_store: Arc<VectorStore>,
    rag_pipeline: Arc<RagPipeline>,
    stats: StatsCounters,
}

impl KnowledgeBaseManager {
    /// Create a new manager over an existing store and pipeline
    pub fn new(vector_store: Arc<VectorStore>, rag_pipeline: Arc<RagPipeline>) -> Self {
        tracing::info!("Knowledge base manager initialized");
        Self {
            vector_store,
            rag_pipeline,
            stats: StatsCounters::default(),
        }
    }

    pub fn vector_store(&self) -> &Arc<VectorStore> {
        &self.vector_store
    }

    pub fn rag_pipeline(&self) -> &Arc<RagPipeline> {
        &self.rag_pipeline
    }

    /// Whether a typed document may be ingested
    pub fn validate_document(&self, document: &Document) -> bool {
        match check_document(document) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }

    /// Whether a raw JSON document may be ingested
    pub fn validate_document_value(&self, value: &Value) -> bool {
        match parse_document_value(value) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }

    /// Ingest typed documents in a single batch
    ///
    /// Invalid documents are dropped and counted, never raised on. A store
    /// failure counts the whole valid batch as failed and is returned.
    pub async fn ingest_documents(
        &self,
        documents: Vec<Document>,
        validate: bool,
    ) -> Result<IngestionSummary, DomainError> {
        if documents.is_empty() {
            tracing::warn!("No documents provided for ingestion");
            return Ok(IngestionSummary::empty());
        }

        let total = documents.len();
        let (valid, invalid): (Vec<Document>, Vec<Document>) = if validate {
            documents
                .into_iter()
                .partition(|doc| self.validate_document(doc))
        } else {
            (documents, Vec::new())
        };

        self.ingest_batch(total, valid, invalid.len()).await
    }

    /// Ingest raw JSON documents, always validated
    pub async fn ingest_values(&self, values: Vec<Value>) -> Result<IngestionSummary, DomainError> {
        if values.is_empty() {
            tracing::warn!("No documents provided for ingestion");
            return Ok(IngestionSummary::empty());
        }

        let total = values.len();
        let mut valid = Vec::with_capacity(total);
        let mut invalid = 0;

        for value in &values {
            match parse_document_value(value) {
                Ok(document) => valid.push(document),
                Err(e) => {
                    tracing::warn!("{}", e);
                    invalid += 1;
                }
            }
        }

        self.ingest_batch(total, valid, invalid).await
    }

    async fn ingest_batch(
        &self,
        total: usize,
        valid: Vec<Document>,
        invalid: usize,
    ) -> Result<IngestionSummary, DomainError> {
        self.stats.add_failed(invalid);
        record_ingestion_failures("validation", invalid);

        let valid_count = valid.len();
        let document_ids = if valid.is_empty() {
            Vec::new()
        } else {
            match self.vector_store.add_documents(valid).await {
                Ok(ids) => ids,
                Err(e) => {
                    self.stats.add_failed(valid_count);
                    record_ingestion_failures("index", valid_count);

                    let message = format!("Document ingestion failed: {}", e);
                    tracing::error!("{}", message);
                    return Err(DomainError::knowledge_base(message));
                }
            }
        };

        self.stats.add_stored(document_ids.len());
        record_documents_ingested(document_ids.len());
        let timestamp = self.stats.touch().await;

        tracing::info!(
            total,
            successful = document_ids.len(),
            failed = invalid,
            "Document ingestion completed"
        );

        Ok(IngestionSummary {
            success: true,
            total,
            successful: document_ids.len(),
            failed: invalid,
            document_ids,
            timestamp: Some(timestamp),
        })
    }

    /// Ingest a UTF-8 file as one document
    ///
    /// Metadata defaults to `{source: <file name>}`.
    pub async fn add_document_from_file(
        &self,
        path: impl AsRef<Path>,
        metadata: Option<Metadata>,
    ) -> Result<String, DomainError> {
        let path = path.as_ref();

        let document = read_file_document(path, metadata).await.map_err(|e| {
            let message = format!("Failed to load document: {}", e);
            tracing::error!("{}", message);
            DomainError::knowledge_base(message)
        })?;

        let summary = self.ingest_documents(vec![document], true).await?;
        summary.document_ids.into_iter().next().ok_or_else(|| {
            DomainError::knowledge_base(format!("Document rejected: {}", path.display()))
        })
    }

    /// Append a new version of a document
    ///
    /// The new version's metadata links back through `previous_id` and
    /// carries `updated_at`. Returns false on any failure.
    pub async fn update_document(
        &self,
        doc_id: &str,
        new_content: &str,
        metadata: Option<Metadata>,
    ) -> bool {
        let mut metadata = metadata.unwrap_or_default();
        metadata.insert(PREVIOUS_ID_KEY.to_string(), Value::String(doc_id.to_string()));
        metadata.insert(
            UPDATED_AT_KEY.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );

        let document = Document::new(new_content).with_all_metadata(metadata);
        if !self.validate_document(&document) {
            return false;
        }

        match self.ingest_documents(vec![document], false).await {
            Ok(summary) => {
                tracing::info!(
                    original_id = %doc_id,
                    new_id = ?summary.document_ids.first(),
                    "Document updated"
                );
                summary.successful > 0
            }
            Err(e) => {
                tracing::error!(original_id = %doc_id, error = %e, "Failed to update document");
                false
            }
        }
    }

    /// Run a RAG query, counting it first
    ///
    /// `top_k` defaults to the pipeline's configured value.
    pub async fn search(
        &self,
        query: &str,
        top_k: Option<usize>,
        system_instruction: Option<&str>,
    ) -> Result<RagQueryResult, DomainError> {
        self.stats.total_queries.fetch_add(1, Ordering::Relaxed);
        match self
            .rag_pipeline
            .query(query, top_k, system_instruction)
            .await
        {
            Ok(result) => {
                record_search(true);
                tracing::info!(
                    query_length = query.len(),
                    results_count = result.context_count,
                    "Knowledge base search completed"
                );
                Ok(result)
            }
            Err(e) => {
                record_search(false);
                let message = format!("Knowledge base search failed: {}", e);
                tracing::error!("{}", message);
                Err(DomainError::knowledge_base(message))
            }
        }
    }

    /// Plain-text rendering of a search
    pub async fn query(
        &self,
        query: &str,
        top_k: Option<usize>,
        system_instruction: Option<&str>,
    ) -> Result<String, DomainError> {
        let result = self.search(query, top_k, system_instruction).await?;

        if result.context.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let snippets: Vec<String> = result
            .context
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| {
                let content = doc.content.trim();
                if content.is_empty() {
                    return None;
                }
                let source = match doc.metadata.get(SOURCE_KEY) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => format!("Document {}", i + 1),
                };
                Some(format!("[{}] {}", source, content))
            })
            .collect();

        Ok(format!("{}\n{}", RESULTS_HEADER, snippets.join("\n")))
    }

    /// Stored documents, best effort
    pub async fn list_documents(&self, limit: Option<usize>) -> Vec<StoredDocument> {
        self.vector_store.list_documents(limit).await
    }

    /// Counters merged with live store and pipeline information
    pub async fn get_stats(&self) -> KnowledgeBaseStatsReport {
        let stats = self.stats.snapshot().await;

        match self.vector_store.try_collection_info().await {
            Ok(info) => KnowledgeBaseStatsReport {
                stats,
                vector_store: Some(info),
                rag_pipeline: Some(self.rag_pipeline.get_pipeline_stats().await),
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to get stats");
                KnowledgeBaseStatsReport {
                    stats,
                    vector_store: None,
                    rag_pipeline: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Point-in-time counters only
    pub async fn counters(&self) -> KnowledgeBaseStats {
        self.stats.snapshot().await
    }

    /// Classify the health of the index and pipeline
    pub async fn health_check(&self) -> HealthReport {
        let mut checks = HealthChecks::default();

        if let Err(e) = self.vector_store.heartbeat().await {
            tracing::error!(error = %e, "Health check failed");
            return HealthReport {
                status: HealthStatus::Unhealthy,
                checks,
                error: Some(e.to_string()),
            };
        }

        match self.vector_store.try_collection_info().await {
            Ok(info) => {
                checks.vector_store = true;
                checks.document_count = info.document_count;
            }
            Err(e) => tracing::warn!(error = %e, "Vector store check failed"),
        }

        checks.rag_pipeline = self.rag_pipeline.get_pipeline_stats().await.is_ok();

        let status = if checks.vector_store && checks.rag_pipeline {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };

        HealthReport {
            status,
            checks,
            error: None,
        }
    }
}
