//! Infrastructure layer - Index backends, pipeline, services and observability

pub mod embedding;
pub mod faq;
pub mod knowledge_base;
pub mod logging;
pub mod observability;
pub mod rag;
pub mod services;
