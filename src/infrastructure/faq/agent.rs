//! FAQ agent - answers from the knowledge base or escalates to a human

use std::sync::Arc;

use crate::domain::faq::{
    EscalationTicket, FaqResponse, InteractionRecord, InteractionRecorder,
    DEFAULT_CONFIDENCE_THRESHOLD,
};
use crate::domain::knowledge_base::{RagQueryResult, RetrievedContext};
use crate::infrastructure::observability::record_faq_outcome;
use crate::infrastructure::services::KnowledgeBaseManager;

use super::tracing_recorder::TracingInteractionRecorder;

const DEFAULT_SOURCE: &str = "Knowledge Base";

/// Confidence-gated FAQ agent shared by all channel agents
#[derive(Debug, Clone)]
pub struct FaqAgent {
    kb_manager: Arc<KnowledgeBaseManager>,
    recorder: Arc<dyn InteractionRecorder>,
    confidence_threshold: f32,
}

impl FaqAgent {
    /// Create an agent with the default threshold and a tracing recorder
    pub fn new(kb_manager: Arc<KnowledgeBaseManager>) -> Self {
        let agent = Self {
            kb_manager,
            recorder: Arc::new(TracingInteractionRecorder::new()),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        };
        tracing::info!(
            confidence_threshold = agent.confidence_threshold,
            "FAQ agent initialized"
        );
        agent
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn InteractionRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    /// Answer a customer question or hand it off
    ///
    /// Never fails: a knowledge base fault yields the `error` status. Every
    /// outcome is recorded once through the interaction recorder.
    pub async fn process_question(
        &self,
        question: &str,
        customer_id: &str,
        channel: &str,
    ) -> FaqResponse {
        tracing::info!(
            customer_id = %customer_id,
            channel = %channel,
            question_length = question.len(),
            "Processing incoming question"
        );

        let response = match self.kb_manager.search(question, None, None).await {
            Ok(result) => self.decide(&result, customer_id),
            Err(e) => {
                tracing::error!(
                    customer_id = %customer_id,
                    error = %e,
                    "Error processing question"
                );
                FaqResponse::error()
            }
        };

        record_faq_outcome(response.status, response.confidence_score);
        self.recorder.record(&InteractionRecord::new(
            question,
            &response,
            customer_id,
            channel,
        ));

        response
    }

    fn decide(&self, result: &RagQueryResult, customer_id: &str) -> FaqResponse {
        let Some(top) = result.top() else {
            return self.escalate(customer_id, 0.0, "No answer found");
        };

        let score = top.similarity_score.unwrap_or(0.0);
        if score >= self.confidence_threshold {
            FaqResponse::answered(answer_text(top), score)
        } else {
            self.escalate(customer_id, score, "Low confidence")
        }
    }

    fn escalate(&self, customer_id: &str, score: f32, reason: &str) -> FaqResponse {
        let ticket = EscalationTicket::generate();

        tracing::info!(
            ticket_id = %ticket.ticket_id,
            customer_id = %customer_id,
            confidence_score = score,
            reason,
            "Escalating to human agent"
        );

        FaqResponse::escalated(ticket, score)
    }
}

fn answer_text(top: &RetrievedContext) -> String {
    let source = match top.metadata.get("source") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => DEFAULT_SOURCE.to_string(),
    };

    format!("{}\n\n(Source: {})", top.content.trim(), source)
}
