use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::detection::domain::mask_classifier::MaskClassifier;
use crate::shared::detection_result::{DetectionResult, FaceDetection};
use crate::shared::encoded_frame::EncodedFrame;

/// Replays pre-recorded face lists in order, cycling at the end.
///
/// Each call gets a fresh timestamp. Used for offline demos (no network,
/// no credential) and wherever a deterministic classifier is needed.
pub struct ReplayClassifier {
    script: Vec<Vec<FaceDetection>>,
    cursor: AtomicUsize,
}

impl ReplayClassifier {
    pub fn new(script: Vec<Vec<FaceDetection>>) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Loads a JSON array of recorded results (`[{"faces": [...]}, ...]`).
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        let recorded: Vec<RecordedResult> = serde_json::from_str(&json)?;
        Ok(Self::new(recorded.into_iter().map(|r| r.faces).collect()))
    }

    pub fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

#[derive(serde::Deserialize)]
struct RecordedResult {
    #[serde(default)]
    faces: Vec<FaceDetection>,
}

impl MaskClassifier for ReplayClassifier {
    fn classify(&self, _frame: &EncodedFrame) -> DetectionResult {
        let call = self.cursor.fetch_add(1, Ordering::SeqCst);
        if self.script.is_empty() {
            return DetectionResult::new(Vec::new());
        }
        DetectionResult::new(self.script[call % self.script.len()].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::detection_result::{BoundingBox, MaskStatus};

    fn frame() -> EncodedFrame {
        EncodedFrame::from_base64("", 1, 1)
    }

    fn face(status: MaskStatus) -> FaceDetection {
        FaceDetection {
            status,
            confidence: 0.9,
            bbox: BoundingBox::new(0, 0, 500, 500),
        }
    }

    #[test]
    fn test_replays_in_order_and_cycles() {
        let classifier = ReplayClassifier::new(vec![
            vec![face(MaskStatus::Mask)],
            vec![],
            vec![face(MaskStatus::NoMask), face(MaskStatus::Mask)],
        ]);

        let counts: Vec<usize> = (0..4)
            .map(|_| classifier.classify(&frame()).faces.len())
            .collect();

        assert_eq!(counts, vec![1, 0, 2, 1]);
        assert_eq!(classifier.calls(), 4);
    }

    #[test]
    fn test_empty_script_yields_empty_results() {
        let classifier = ReplayClassifier::new(vec![]);
        let result = classifier.classify(&frame());
        assert!(result.faces.is_empty());
        assert!(result.message.is_none());
    }

    #[test]
    fn test_from_file_reads_recorded_results() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("replay.json");
        fs::write(
            &path,
            r#"[{"faces":[{"status":"Mask","confidence":0.93,"box":{"ymin":100,"xmin":200,"ymax":400,"xmax":500}}]},{}]"#,
        )
        .unwrap();

        let classifier = ReplayClassifier::from_file(&path).unwrap();
        let first = classifier.classify(&frame());
        let second = classifier.classify(&frame());

        assert_eq!(first.faces[0].status, MaskStatus::Mask);
        assert_eq!(first.faces[0].bbox, BoundingBox::new(100, 200, 400, 500));
        assert!(second.faces.is_empty());
    }

    #[test]
    fn test_from_file_rejects_malformed_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(ReplayClassifier::from_file(&path).is_err());
    }
}
