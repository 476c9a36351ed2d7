use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::feedback::domain::feedback_entry::FeedbackEntry;
use crate::feedback::domain::feedback_store::{FeedbackStore, FeedbackStoreError};
use crate::shared::constants::{APP_DIR_NAME, FEEDBACK_FILE_NAME};

/// Feedback list stored as one JSON array on disk.
pub struct JsonFileFeedbackStore {
    path: PathBuf,
}

impl JsonFileFeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/MaskGuard/maskguard_feedback.json`.
    pub fn default_location() -> Result<Self, FeedbackStoreError> {
        dirs::data_dir()
            .map(|d| Self::new(d.join(APP_DIR_NAME).join(FEEDBACK_FILE_NAME)))
            .ok_or(FeedbackStoreError::NoDataDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> FeedbackStoreError {
        FeedbackStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl FeedbackStore for JsonFileFeedbackStore {
    fn load(&self) -> Result<Option<Vec<FeedbackEntry>>, FeedbackStoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn save(&self, entries: &[FeedbackEntry]) -> Result<(), FeedbackStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string(entries)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::domain::feedback_entry::Correction;

    fn entry(id: &str) -> FeedbackEntry {
        FeedbackEntry {
            id: id.into(),
            image_data: "QUJD".into(),
            detected_status: "No Mask".into(),
            user_correction: Correction::FalseNegative,
            timestamp: 42,
        }
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileFeedbackStore::new(dir.path().join("feedback.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileFeedbackStore::new(dir.path().join("nested").join("feedback.json"));
        store.save(&[entry("b"), entry("a")]).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, vec![entry("b"), entry("a")]);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        fs::write(&path, "[{\"id\": ").unwrap();
        let err = JsonFileFeedbackStore::new(&path).load().unwrap_err();
        assert!(matches!(err, FeedbackStoreError::Malformed(_)));
    }

    #[test]
    fn test_default_location_uses_storage_file_name() {
        if let Ok(store) = JsonFileFeedbackStore::default_location() {
            assert!(store.path().ends_with("MaskGuard/maskguard_feedback.json"));
        }
    }
}
