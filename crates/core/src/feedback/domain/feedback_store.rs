use std::path::PathBuf;

use thiserror::Error;

use crate::feedback::domain::feedback_entry::FeedbackEntry;

#[derive(Error, Debug)]
pub enum FeedbackStoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed feedback log: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no data directory available on this platform")]
    NoDataDir,
}

/// Persists the whole feedback list as one blob.
pub trait FeedbackStore: Send {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<FeedbackEntry>>, FeedbackStoreError>;

    fn save(&self, entries: &[FeedbackEntry]) -> Result<(), FeedbackStoreError>;
}
