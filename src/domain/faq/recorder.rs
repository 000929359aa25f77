//! Interaction audit trail

use std::fmt::Debug;

use super::entity::InteractionRecord;

/// Sink for the per-question audit record
///
/// Every terminal outcome of the FAQ agent is recorded exactly once.
pub trait InteractionRecorder: Send + Sync + Debug {
    fn record(&self, record: &InteractionRecord);
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Captures records in memory
    #[derive(Debug, Default)]
    pub struct MockInteractionRecorder {
        records: Mutex<Vec<InteractionRecord>>,
    }

    impl MockInteractionRecorder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn records(&self) -> Vec<InteractionRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    impl InteractionRecorder for MockInteractionRecorder {
        fn record(&self, record: &InteractionRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }
}
