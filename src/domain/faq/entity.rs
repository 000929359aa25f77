//! FAQ outcome types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default minimum top similarity for answering without a human
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.75;

/// Number of response characters kept in the audit preview
pub const RESPONSE_PREVIEW_CHARS: usize = 50;

/// Customer-safe message returned when processing fails
pub const ERROR_RESPONSE: &str =
    "An unexpected error occurred. We have escalated this to a human agent.";

/// Terminal state of a processed question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaqStatus {
    Answered,
    Escalated,
    Error,
}

impl FaqStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::Escalated => "escalated",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for FaqStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Human hand-off reference, never persisted here
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EscalationTicket {
    pub ticket_id: String,
}

impl EscalationTicket {
    /// Generate a fresh `SUP-XXXXXXXX` ticket from a random UUID
    pub fn generate() -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self {
            ticket_id: format!("SUP-{}", token[..8].to_uppercase()),
        }
    }

    /// Customer-facing hand-off message
    pub fn customer_message(&self) -> String {
        format!(
            "I've created a support ticket for you (ID: {}). A human agent will be with you shortly.",
            self.ticket_id
        )
    }
}

/// Response handed back to channel agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqResponse {
    pub status: FaqStatus,
    pub response: String,
    pub escalated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<EscalationTicket>,
    pub confidence_score: f32,
}

impl FaqResponse {
    pub fn answered(response: impl Into<String>, confidence_score: f32) -> Self {
        Self {
            status: FaqStatus::Answered,
            response: response.into(),
            escalated: false,
            ticket: None,
            confidence_score,
        }
    }

    pub fn escalated(ticket: EscalationTicket, confidence_score: f32) -> Self {
        Self {
            status: FaqStatus::Escalated,
            response: ticket.customer_message(),
            escalated: true,
            ticket: Some(ticket),
            confidence_score,
        }
    }

    pub fn error() -> Self {
        Self {
            status: FaqStatus::Error,
            response: ERROR_RESPONSE.to_string(),
            escalated: true,
            ticket: None,
            confidence_score: 0.0,
        }
    }
}

/// Audit record emitted for every processed question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub question: String,
    pub response_preview: String,
    pub status: FaqStatus,
    pub escalated: bool,
    pub confidence_score: f32,
    pub customer_id: String,
    pub channel: String,
}

impl InteractionRecord {
    pub fn new(question: &str, response: &FaqResponse, customer_id: &str, channel: &str) -> Self {
        Self {
            question: question.to_string(),
            response_preview: preview(&response.response),
            status: response.status,
            escalated: response.escalated,
            confidence_score: response.confidence_score,
            customer_id: customer_id.to_string(),
            channel: channel.to_string(),
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > RESPONSE_PREVIEW_CHARS {
        let head: String = text.chars().take(RESPONSE_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_format() {
        let ticket = EscalationTicket::generate();

        assert!(ticket.ticket_id.starts_with("SUP-"));
        assert_eq!(ticket.ticket_id.len(), 12);
        assert!(
            ticket.ticket_id[4..]
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn test_tickets_are_unique() {
        let first = EscalationTicket::generate();
        let second = EscalationTicket::generate();

        assert_ne!(first, second);
    }

    #[test]
    fn test_escalated_response_mentions_ticket() {
        let ticket = EscalationTicket::generate();
        let response = FaqResponse::escalated(ticket.clone(), 0.4);

        assert!(response.escalated);
        assert!(response.response.contains(&ticket.ticket_id));
    }

    #[test]
    fn test_error_response_is_escalated() {
        let response = FaqResponse::error();

        assert_eq!(response.status, FaqStatus::Error);
        assert!(response.escalated);
        assert_eq!(response.response, ERROR_RESPONSE);
    }

    #[test]
    fn test_record_truncates_long_responses() {
        let long = FaqResponse::answered("x".repeat(80), 0.9);
        let record = InteractionRecord::new("q", &long, "cust1", "web");
        assert_eq!(record.response_preview, format!("{}...", "x".repeat(50)));

        let short = FaqResponse::answered("short answer", 0.9);
        let record = InteractionRecord::new("q", &short, "cust1", "web");
        assert_eq!(record.response_preview, "short answer");
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "é".repeat(60);
        assert_eq!(preview(&text), format!("{}...", "é".repeat(50)));
    }
}
