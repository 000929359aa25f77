//! Similarity index implementations and the vector store facade

mod factory;
mod in_memory;
mod json_file;
mod vector_store;

pub use factory::{IndexType, SimilarityIndexFactory};
pub use in_memory::InMemorySimilarityIndex;
pub use json_file::JsonFileSimilarityIndex;
pub use vector_store::VectorStore;

pub(crate) use vector_store::read_file_document;
