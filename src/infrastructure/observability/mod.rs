//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    init_metrics, record_documents_ingested, record_faq_outcome, record_ingestion_failures,
    record_search, PrometheusMetrics, DOCUMENTS_INGESTED_TOTAL, FAQ_CONFIDENCE_SCORE,
    FAQ_ESCALATIONS_TOTAL, FAQ_QUESTIONS_TOTAL, INGESTION_FAILURES_TOTAL, QUERIES_TOTAL,
    SEARCH_ERRORS_TOTAL,
};
