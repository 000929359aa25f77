//! Prometheus metrics infrastructure

use std::sync::Arc;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::domain::FaqStatus;

pub const DOCUMENTS_INGESTED_TOTAL: &str = "kb_documents_ingested_total";
pub const INGESTION_FAILURES_TOTAL: &str = "kb_ingestion_failures_total";
pub const QUERIES_TOTAL: &str = "kb_queries_total";
pub const SEARCH_ERRORS_TOTAL: &str = "kb_search_errors_total";
pub const FAQ_QUESTIONS_TOTAL: &str = "faq_questions_total";
pub const FAQ_ESCALATIONS_TOTAL: &str = "faq_escalations_total";
pub const FAQ_CONFIDENCE_SCORE: &str = "faq_confidence_score";

/// Prometheus metrics handle for rendering the exposition text
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish()
    }
}

impl PrometheusMetrics {
    /// Get the metrics in Prometheus text format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
///
/// Without an installed recorder every `record_*` call is a no-op.
pub fn init_metrics(enabled: bool) -> Option<PrometheusMetrics> {
    if !enabled {
        tracing::debug!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            register_default_metrics();
            tracing::info!("Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("helpdesk_kb_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record documents accepted by the index
pub fn record_documents_ingested(count: usize) {
    counter!(DOCUMENTS_INGESTED_TOTAL).increment(count as u64);
}

/// Record documents dropped by validation or a failed batch
pub fn record_ingestion_failures(reason: &'static str, count: usize) {
    if count == 0 {
        return;
    }
    counter!(INGESTION_FAILURES_TOTAL, "reason" => reason).increment(count as u64);
}

/// Record a knowledge base search and whether it failed
pub fn record_search(success: bool) {
    counter!(QUERIES_TOTAL).increment(1);

    if !success {
        counter!(SEARCH_ERRORS_TOTAL).increment(1);
    }
}

/// Record the terminal state of a FAQ question
pub fn record_faq_outcome(status: FaqStatus, confidence_score: f32) {
    counter!(FAQ_QUESTIONS_TOTAL, "status" => status.as_str()).increment(1);
    histogram!(FAQ_CONFIDENCE_SCORE).record(f64::from(confidence_score));

    if status == FaqStatus::Escalated {
        counter!(FAQ_ESCALATIONS_TOTAL).increment(1);
    }
}
