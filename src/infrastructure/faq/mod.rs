//! FAQ agent and interaction recording

mod agent;
mod tracing_recorder;

pub use agent::FaqAgent;
pub use tracing_recorder::TracingInteractionRecorder;
