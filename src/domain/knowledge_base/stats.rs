//! Knowledge base statistics, ingestion summaries and health reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{CollectionInfo, PipelineStats};

/// Point-in-time copy of the manager's counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseStats {
    pub total_documents: u64,
    pub total_queries: u64,
    pub successful_ingestions: u64,
    pub failed_ingestions: u64,
    pub last_update: Option<DateTime<Utc>>,
}

/// Counters merged with live collaborator information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseStatsReport {
    #[serde(flatten)]
    pub stats: KnowledgeBaseStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_store: Option<CollectionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_pipeline: Option<PipelineStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a batch ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionSummary {
    pub success: bool,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub document_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl IngestionSummary {
    /// Summary for an empty batch
    pub fn empty() -> Self {
        Self {
            success: true,
            total: 0,
            successful: 0,
            failed: 0,
            document_ids: Vec::new(),
            timestamp: None,
        }
    }
}

/// Overall health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthChecks {
    pub vector_store: bool,
    pub rag_pipeline: bool,
    pub document_count: usize,
}

/// Health report across the index and pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: HealthChecks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_summary() {
        let summary = IngestionSummary::empty();

        assert!(summary.success);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.document_ids.is_empty());
    }

    #[test]
    fn test_stats_report_flattens_counters() {
        let report = KnowledgeBaseStatsReport {
            stats: KnowledgeBaseStats {
                total_documents: 2,
                ..Default::default()
            },
            vector_store: None,
            rag_pipeline: None,
            error: Some("index unavailable".to_string()),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["total_documents"], json!(2));
        assert_eq!(value["error"], json!("index unavailable"));
        assert!(value.get("vector_store").is_none());
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(serde_json::to_value(HealthStatus::Degraded).unwrap(), json!("degraded"));
    }
}
