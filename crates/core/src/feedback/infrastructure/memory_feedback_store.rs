use std::sync::{Arc, Mutex};

use crate::feedback::domain::feedback_entry::FeedbackEntry;
use crate::feedback::domain::feedback_store::{FeedbackStore, FeedbackStoreError};

/// In-process store holding the raw JSON blob, shareable between a log and
/// whoever wants to inspect what was persisted.
#[derive(Clone, Default)]
pub struct MemoryFeedbackStore {
    blob: Arc<Mutex<Option<String>>>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `blob`, valid JSON or not.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|b| b.clone())
    }
}

impl FeedbackStore for MemoryFeedbackStore {
    fn load(&self) -> Result<Option<Vec<FeedbackEntry>>, FeedbackStoreError> {
        match self.blob() {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, entries: &[FeedbackEntry]) -> Result<(), FeedbackStoreError> {
        let json = serde_json::to_string(entries)?;
        if let Ok(mut blob) = self.blob.lock() {
            *blob = Some(json);
        }
        Ok(())
    }
}
