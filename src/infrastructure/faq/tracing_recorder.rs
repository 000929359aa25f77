//! Interaction recorder that emits structured log events

use crate::domain::faq::{InteractionRecord, InteractionRecorder};

/// Writes each interaction as a single `tracing` event
#[derive(Debug, Default, Clone)]
pub struct TracingInteractionRecorder;

impl TracingInteractionRecorder {
    pub fn new() -> Self {
        Self
    }
}

impl InteractionRecorder for TracingInteractionRecorder {
    fn record(&self, record: &InteractionRecord) {
        tracing::info!(
            question = %record.question,
            response_preview = %record.response_preview,
            status = %record.status,
            escalated = record.escalated,
            confidence_score = record.confidence_score,
            customer_id = %record.customer_id,
            channel = %record.channel,
            "Interaction processed"
        );
    }
}
