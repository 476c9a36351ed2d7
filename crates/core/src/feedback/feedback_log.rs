use std::path::{Path, PathBuf};

use crate::feedback::domain::feedback_entry::{Correction, FeedbackEntry, FeedbackSnapshot};
use crate::feedback::domain::feedback_store::FeedbackStore;

/// Append-only list of user-flagged misclassifications, newest first.
///
/// Every mutation rewrites the whole list to the store. Store failures are
/// logged and otherwise ignored: the in-memory list stays authoritative for
/// the rest of the session.
pub struct FeedbackLog {
    entries: Vec<FeedbackEntry>,
    store: Box<dyn FeedbackStore>,
}

impl FeedbackLog {
    /// Reads the persisted list once. Missing or unreadable data starts an
    /// empty log.
    pub fn restore(store: Box<dyn FeedbackStore>) -> Self {
        let entries = match store.load() {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to parse feedback log, starting empty: {e}");
                Vec::new()
            }
        };
        log::debug!("Restored {} feedback entries", entries.len());
        Self { entries, store }
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entry: FeedbackEntry) {
        log::info!(
            "Flagged {} ({}) as {}",
            entry.id,
            entry.detected_status,
            entry.user_correction.label()
        );
        self.entries.insert(0, entry);
        self.persist();
    }

    /// Flags the current capture. Returns `None` (and changes nothing) when
    /// there is nothing to flag.
    pub fn record(
        &mut self,
        snapshot: Option<FeedbackSnapshot>,
        correction: Correction,
    ) -> Option<&FeedbackEntry> {
        let Some(snapshot) = snapshot else {
            log::debug!("Ignoring flag: no captured frame with detected faces");
            return None;
        };
        self.append(FeedbackEntry::from_snapshot(snapshot, correction));
        self.entries.first()
    }

    /// Deletes every entry if `confirm` agrees. Returns whether it cleared.
    pub fn clear_all(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            return false;
        }
        log::info!("Cleared {} feedback entries", self.entries.len());
        self.entries.clear();
        self.persist();
        true
    }

    /// Writes every entry's frame to `<dir>/<timestamp>_<id>.jpg`.
    pub fn export_images(&self, dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let path = dir.join(format!("{}_{}.jpg", entry.timestamp, entry.id));
            std::fs::write(&path, entry.image_bytes()?)?;
            written.push(path);
        }
        Ok(written)
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.entries) {
            log::warn!("Failed to persist feedback log: {e}");
        }
    }
}
