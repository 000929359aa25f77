//! Embedding provider traits and vector math

mod provider;
mod similarity;

pub use provider::EmbeddingProvider;
pub use similarity::{cosine_distance, cosine_similarity};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
