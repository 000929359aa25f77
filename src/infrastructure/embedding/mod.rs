//! Embedding provider implementations

mod hashing;

pub use hashing::{HashingEmbeddingProvider, DEFAULT_HASHING_DIMENSIONS};
