//! FAQ domain - answer-or-escalate outcomes and the interaction audit seam

mod entity;
mod recorder;

pub use entity::{
    EscalationTicket, FaqResponse, FaqStatus, InteractionRecord, DEFAULT_CONFIDENCE_THRESHOLD,
    ERROR_RESPONSE, RESPONSE_PREVIEW_CHARS,
};
pub use recorder::InteractionRecorder;

#[cfg(test)]
pub use recorder::mock::MockInteractionRecorder;
