//! Retrieval-augmented generation: context retrieval and prompt assembly

mod pipeline;
mod prompt;

pub use pipeline::{RagConfig, RagPipeline, DEFAULT_TOP_K};
pub use prompt::build_prompt;
