mod app_config;

pub use app_config::{AppConfig, FaqConfig, KnowledgeBaseConfig, LogFormat, LoggingConfig};
