use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::shared::clock::{format_local, now_millis};
use crate::shared::encoded_frame::EncodedFrame;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 7;

/// What the user says the classifier got wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    FalsePositive,
    FalseNegative,
}

impl Correction {
    pub fn label(self) -> &'static str {
        match self {
            Correction::FalsePositive => "False Positive",
            Correction::FalseNegative => "False Negative",
        }
    }
}

/// The frame and verdict a flag would be attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSnapshot {
    pub image: EncodedFrame,
    pub detected_status: String,
}

/// A user-flagged misclassification. Serialized with the same keys the
/// stored log has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: String,
    /// Base64 JPEG of the flagged frame, without a data-URL prefix.
    pub image_data: String,
    pub detected_status: String,
    pub user_correction: Correction,
    pub timestamp: u64,
}

impl FeedbackEntry {
    pub fn from_snapshot(snapshot: FeedbackSnapshot, correction: Correction) -> Self {
        Self {
            id: random_id(),
            image_data: snapshot.image.into_base64(),
            detected_status: snapshot.detected_status,
            user_correction: correction,
            timestamp: now_millis(),
        }
    }

    pub fn recorded_at(&self) -> String {
        format_local(self.timestamp)
    }

    pub fn image_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.decode(&self.image_data)
    }
}

fn random_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FeedbackSnapshot {
        FeedbackSnapshot {
            image: EncodedFrame::from_jpeg_bytes(&[0xFF, 0xD8, 0xFF], 640, 480),
            detected_status: "Mask, No Mask".to_string(),
        }
    }

    #[test]
    fn test_serializes_with_stored_keys() {
        let entry = FeedbackEntry {
            id: "abc1234".into(),
            image_data: "QUJD".into(),
            detected_status: "Mask".into(),
            user_correction: Correction::FalsePositive,
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc1234",
                "imageData": "QUJD",
                "detectedStatus": "Mask",
                "userCorrection": "false_positive",
                "timestamp": 1_700_000_000_000u64
            })
        );
    }

    #[test]
    fn test_from_snapshot_fills_fresh_fields() {
        let entry = FeedbackEntry::from_snapshot(snapshot(), Correction::FalseNegative);
        assert_eq!(entry.id.len(), ID_LEN);
        assert!(entry.id.bytes().all(|b| ID_ALPHABET.contains(&b)));
        assert_eq!(entry.detected_status, "Mask, No Mask");
        assert_eq!(entry.user_correction, Correction::FalseNegative);
        assert!(entry.timestamp > 0);
        assert_eq!(entry.image_bytes().unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_ids_differ() {
        let a = FeedbackEntry::from_snapshot(snapshot(), Correction::FalsePositive);
        let b = FeedbackEntry::from_snapshot(snapshot(), Correction::FalsePositive);
        assert_ne!(a.id, b.id);
    }
}
