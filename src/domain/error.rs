use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Index error: {index} - {message}")]
    Index { index: String, message: String },

    #[error("RAG pipeline error: {0}")]
    RagPipeline(String),

    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn index(index: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Index {
            index: index.into(),
            message: message.into(),
        }
    }

    pub fn rag_pipeline(message: impl Into<String>) -> Self {
        Self::RagPipeline(message.into())
    }

    pub fn knowledge_base(message: impl Into<String>) -> Self {
        Self::KnowledgeBase(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("JSON error: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Document not found: policy.txt");
        assert_eq!(error.to_string(), "Not found: Document not found: policy.txt");
    }

    #[test]
    fn test_index_error() {
        let error = DomainError::index("in_memory", "duplicate id");
        assert_eq!(error.to_string(), "Index error: in_memory - duplicate id");
    }

    #[test]
    fn test_pipeline_errors_render_their_layer() {
        let error = DomainError::rag_pipeline("Failed to retrieve context: boom");
        assert_eq!(
            error.to_string(),
            "RAG pipeline error: Failed to retrieve context: boom"
        );

        let error = DomainError::knowledge_base("Knowledge base search failed: boom");
        assert_eq!(
            error.to_string(),
            "Knowledge base error: Knowledge base search failed: boom"
        );
    }
}
