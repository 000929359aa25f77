//! Knowledge base validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::document::{Document, Metadata};

/// Maximum length for collection names
pub const MAX_COLLECTION_NAME_LENGTH: usize = 63;

/// Regex pattern for valid collection names (alphanumeric, hyphens, underscores)
static COLLECTION_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$")
        .expect("collection name pattern is valid")
});

/// Knowledge base validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeBaseValidationError {
    /// Collection name is empty
    EmptyCollectionName,
    /// Collection name exceeds maximum length
    CollectionNameTooLong { length: usize, max: usize },
    /// Collection name contains invalid characters
    InvalidCollectionName { name: String },
    /// Invalid embedding dimensions
    InvalidDimensions { value: usize, min: usize, max: usize },
    /// Invalid top_k value
    InvalidTopK { value: usize, min: usize, max: usize },
    /// Invalid similarity or confidence threshold
    InvalidThreshold { name: &'static str, value: f32 },
    /// Document is not a JSON object
    DocumentNotObject,
    /// Document has no `content` field
    MissingContent,
    /// Document `content` is not a string
    ContentNotString,
    /// Document `content` is blank after trimming
    EmptyContent,
    /// Document `metadata` is present but not an object
    MetadataNotObject,
}

impl fmt::Display for KnowledgeBaseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCollectionName => write!(f, "Collection name cannot be empty"),
            Self::CollectionNameTooLong { length, max } => {
                write!(
                    f,
                    "Collection name too long: {} characters (max {})",
                    length, max
                )
            }
            Self::InvalidCollectionName { name } => {
                write!(
                    f,
                    "Invalid collection name '{}': must be alphanumeric with hyphens or underscores",
                    name
                )
            }
            Self::InvalidDimensions { value, min, max } => {
                write!(
                    f,
                    "Invalid embedding dimensions {}: must be between {} and {}",
                    value, min, max
                )
            }
            Self::InvalidTopK { value, min, max } => {
                write!(f, "Invalid top_k {}: must be between {} and {}", value, min, max)
            }
            Self::InvalidThreshold { name, value } => {
                write!(f, "Invalid {} {}: must be between 0.0 and 1.0", name, value)
            }
            Self::DocumentNotObject => write!(f, "Document must be an object"),
            Self::MissingContent => write!(f, "Document missing 'content' field"),
            Self::ContentNotString => write!(f, "Document 'content' must be a string"),
            Self::EmptyContent => write!(f, "Document 'content' cannot be empty"),
            Self::MetadataNotObject => write!(f, "Document 'metadata' must be a dictionary"),
        }
    }
}

impl std::error::Error for KnowledgeBaseValidationError {}

/// Validate a collection name
pub fn validate_collection_name(name: &str) -> Result<(), KnowledgeBaseValidationError> {
    if name.is_empty() {
        return Err(KnowledgeBaseValidationError::EmptyCollectionName);
    }

    if name.len() > MAX_COLLECTION_NAME_LENGTH {
        return Err(KnowledgeBaseValidationError::CollectionNameTooLong {
            length: name.len(),
            max: MAX_COLLECTION_NAME_LENGTH,
        });
    }

    if !COLLECTION_NAME_PATTERN.is_match(name) {
        return Err(KnowledgeBaseValidationError::InvalidCollectionName {
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Validate embedding dimensions
pub fn validate_dimensions(dims: usize) -> Result<(), KnowledgeBaseValidationError> {
    const MIN: usize = 1;
    const MAX: usize = 8192;

    if !(MIN..=MAX).contains(&dims) {
        return Err(KnowledgeBaseValidationError::InvalidDimensions {
            value: dims,
            min: MIN,
            max: MAX,
        });
    }

    Ok(())
}

/// Validate top_k value
pub fn validate_top_k(top_k: usize) -> Result<(), KnowledgeBaseValidationError> {
    const MIN: usize = 1;
    const MAX: usize = 1000;

    if !(MIN..=MAX).contains(&top_k) {
        return Err(KnowledgeBaseValidationError::InvalidTopK {
            value: top_k,
            min: MIN,
            max: MAX,
        });
    }

    Ok(())
}

/// Validate a 0.0 - 1.0 threshold
pub fn validate_threshold(
    name: &'static str,
    threshold: f32,
) -> Result<(), KnowledgeBaseValidationError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(KnowledgeBaseValidationError::InvalidThreshold {
            name,
            value: threshold,
        });
    }

    Ok(())
}

/// Check a typed document before ingestion
pub fn check_document(document: &Document) -> Result<(), KnowledgeBaseValidationError> {
    if document.content.trim().is_empty() {
        return Err(KnowledgeBaseValidationError::EmptyContent);
    }

    Ok(())
}

/// Parse an untyped JSON document, enforcing the ingestion rules
///
/// Valid iff the value is an object with a string `content` that is not
/// blank after trimming, and `metadata`, when present, is an object.
pub fn parse_document_value(value: &Value) -> Result<Document, KnowledgeBaseValidationError> {
    let object = value
        .as_object()
        .ok_or(KnowledgeBaseValidationError::DocumentNotObject)?;

    let content = match object.get("content") {
        None => return Err(KnowledgeBaseValidationError::MissingContent),
        Some(Value::String(content)) => content,
        Some(_) => return Err(KnowledgeBaseValidationError::ContentNotString),
    };

    if content.trim().is_empty() {
        return Err(KnowledgeBaseValidationError::EmptyContent);
    }

    let metadata = match object.get("metadata") {
        None => Metadata::new(),
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Some(_) => return Err(KnowledgeBaseValidationError::MetadataNotObject),
    };

    Ok(Document {
        content: content.clone(),
        metadata,
    })
}
