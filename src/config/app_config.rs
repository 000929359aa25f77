use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::faq::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::domain::knowledge_base::{
    validate_collection_name, validate_dimensions, validate_threshold, validate_top_k,
};
use crate::domain::DomainError;

/// Flat environment variables that override the structured keys
const FLAT_ENV_OVERRIDES: [(&str, &str); 4] = [
    ("VECTOR_DB_TYPE", "knowledge_base.vector_db_type"),
    ("VECTOR_DB_PATH", "knowledge_base.vector_db_path"),
    ("COLLECTION_NAME", "knowledge_base.collection_name"),
    ("FAQ_CONFIDENCE_THRESHOLD", "faq.confidence_threshold"),
];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub knowledge_base: KnowledgeBaseConfig,
    pub faq: FaqConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Index, retrieval and embedding settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    pub vector_db_type: String,
    pub vector_db_path: String,
    pub collection_name: String,
    pub top_k: usize,
    pub similarity_threshold: f32,
    pub embedding_dimensions: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FaqConfig {
    pub confidence_threshold: f32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            vector_db_type: "in_memory".to_string(),
            vector_db_path: "./data/vectors".to_string(),
            collection_name: "helpdesk_kb".to_string(),
            top_k: 5,
            similarity_threshold: 0.0,
            embedding_dimensions: 256,
        }
    }
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl AppConfig {
    /// Load from config files and the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_env(std::env::vars().collect())
    }

    /// Load from config files and an explicit environment map
    pub fn load_with_env(env: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            );

        for (var, key) in FLAT_ENV_OVERRIDES {
            builder = builder.set_override_option(key, env.get(var).cloned())?;
        }

        builder.build()?.try_deserialize()
    }

    /// Reject out-of-range settings
    pub fn validate(&self) -> Result<(), DomainError> {
        let kb = &self.knowledge_base;
        let to_config_error = |e: crate::domain::KnowledgeBaseValidationError| {
            DomainError::configuration(e.to_string())
        };

        validate_collection_name(&kb.collection_name).map_err(to_config_error)?;
        validate_top_k(kb.top_k).map_err(to_config_error)?;
        validate_threshold("similarity_threshold", kb.similarity_threshold)
            .map_err(to_config_error)?;
        validate_dimensions(kb.embedding_dimensions).map_err(to_config_error)?;
        validate_threshold("confidence_threshold", self.faq.confidence_threshold)
            .map_err(to_config_error)?;

        if kb.vector_db_path.trim().is_empty() {
            return Err(DomainError::configuration("vector_db_path cannot be empty"));
        }

        Ok(())
    }
}
