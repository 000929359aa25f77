//! Infrastructure services

mod knowledge_base_manager;

pub use knowledge_base_manager::KnowledgeBaseManager;
