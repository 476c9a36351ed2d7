use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::clock::now_millis;
use crate::shared::constants::NORMALIZED_SCALE;

/// Mask classification for one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaskStatus {
    #[serde(rename = "Mask")]
    Mask,
    #[serde(rename = "No Mask")]
    NoMask,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl MaskStatus {
    /// Maps the remote model's free-form status string.
    ///
    /// Only the exact string `"Mask"` counts as masked; everything else,
    /// including empty and unexpected values, is `NoMask`.
    pub fn from_remote(value: &str) -> Self {
        if value == "Mask" {
            return MaskStatus::Mask;
        }
        if value != "No Mask" {
            log::debug!("Unrecognized remote mask status {value:?}, treating as No Mask");
        }
        MaskStatus::NoMask
    }

    pub fn is_mask(self) -> bool {
        self == MaskStatus::Mask
    }
}

impl fmt::Display for MaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskStatus::Mask => write!(f, "Mask"),
            MaskStatus::NoMask => write!(f, "No Mask"),
            MaskStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Face box on the virtual 1000x1000 canvas, independent of frame resolution.
///
/// `min <= max` is expected but not guaranteed by the remote model; see
/// [`BoundingBox::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ymin: i32,
    pub xmin: i32,
    pub ymax: i32,
    pub xmax: i32,
}

impl BoundingBox {
    pub fn new(ymin: i32, xmin: i32, ymax: i32, xmax: i32) -> Self {
        Self {
            ymin,
            xmin,
            ymax,
            xmax,
        }
    }

    /// Orders each coordinate pair and clamps everything into `[0, 1000]`.
    pub fn normalized(&self) -> BoundingBox {
        let scale = NORMALIZED_SCALE as i32;
        let clamp = |v: i32| v.clamp(0, scale);
        let (x0, x1) = (clamp(self.xmin), clamp(self.xmax));
        let (y0, y1) = (clamp(self.ymin), clamp(self.ymax));
        BoundingBox {
            ymin: y0.min(y1),
            xmin: x0.min(x1),
            ymax: y0.max(y1),
            xmax: x0.max(x1),
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub status: MaskStatus,
    pub confidence: f64,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

impl FaceDetection {
    /// Label drawn above the box, e.g. `"Mask (93%)"`.
    pub fn label(&self) -> String {
        format!("{} ({:.0}%)", self.status, self.confidence_percent())
    }

    pub fn confidence_percent(&self) -> f64 {
        (self.confidence * 100.0).round()
    }
}

/// Outcome of one classification call. Replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub faces: Vec<FaceDetection>,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DetectionResult {
    pub fn new(faces: Vec<FaceDetection>) -> Self {
        Self {
            faces,
            timestamp: now_millis(),
            message: None,
        }
    }

    /// Empty result carrying a user-facing message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            faces: Vec::new(),
            timestamp: now_millis(),
            message: Some(message.into()),
        }
    }

    pub fn has_faces(&self) -> bool {
        !self.faces.is_empty()
    }

    /// Statuses of all faces joined with `", "`, e.g. `"Mask, No Mask"`.
    pub fn status_summary(&self) -> String {
        self.faces
            .iter()
            .map(|f| f.status.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn face(status: MaskStatus, confidence: f64) -> FaceDetection {
        FaceDetection {
            status,
            confidence,
            bbox: BoundingBox::new(100, 200, 400, 500),
        }
    }

    // ── Status mapping ──────────────────────────────────────────────

    #[rstest]
    #[case::mask("Mask", MaskStatus::Mask)]
    #[case::no_mask("No Mask", MaskStatus::NoMask)]
    #[case::empty("", MaskStatus::NoMask)]
    #[case::lowercase("mask", MaskStatus::NoMask)]
    #[case::unknown("Unknown", MaskStatus::NoMask)]
    #[case::padded(" Mask ", MaskStatus::NoMask)]
    fn test_from_remote(#[case] remote: &str, #[case] expected: MaskStatus) {
        assert_eq!(MaskStatus::from_remote(remote), expected);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(MaskStatus::Mask.to_string(), "Mask");
        assert_eq!(MaskStatus::NoMask.to_string(), "No Mask");
        assert_eq!(MaskStatus::Unknown.to_string(), "Unknown");
    }

    // ── Labels ──────────────────────────────────────────────────────

    #[rstest]
    #[case(MaskStatus::Mask, 0.93, "Mask (93%)")]
    #[case(MaskStatus::NoMask, 0.876, "No Mask (88%)")]
    #[case(MaskStatus::Mask, 1.0, "Mask (100%)")]
    #[case(MaskStatus::NoMask, 0.0, "No Mask (0%)")]
    fn test_label(#[case] status: MaskStatus, #[case] conf: f64, #[case] expected: &str) {
        assert_eq!(face(status, conf).label(), expected);
    }

    // ── Bounding boxes ──────────────────────────────────────────────

    #[test]
    fn test_normalized_keeps_valid_box() {
        let b = BoundingBox::new(100, 200, 400, 500);
        assert_eq!(b.normalized(), b);
        assert!(!b.is_inverted());
    }

    #[test]
    fn test_normalized_orders_inverted_box() {
        let b = BoundingBox::new(400, 500, 100, 200);
        assert!(b.is_inverted());
        assert_eq!(b.normalized(), BoundingBox::new(100, 200, 400, 500));
    }

    #[test]
    fn test_normalized_clamps_out_of_range() {
        let b = BoundingBox::new(-50, -10, 1200, 1001);
        assert_eq!(b.normalized(), BoundingBox::new(0, 0, 1000, 1000));
    }

    // ── Results ─────────────────────────────────────────────────────

    #[test]
    fn test_status_summary_joins_in_order() {
        let result = DetectionResult::new(vec![
            face(MaskStatus::Mask, 0.9),
            face(MaskStatus::NoMask, 0.8),
        ]);
        assert_eq!(result.status_summary(), "Mask, No Mask");
    }

    #[test]
    fn test_failed_result_is_empty_with_message() {
        let result = DetectionResult::failed("offline");
        assert!(!result.has_faces());
        assert_eq!(result.message.as_deref(), Some("offline"));
        assert!(result.timestamp > 0);
    }

    #[test]
    fn test_serde_uses_box_key_and_display_status() {
        let result = DetectionResult {
            faces: vec![face(MaskStatus::NoMask, 0.5)],
            timestamp: 1,
            message: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["faces"][0]["status"], "No Mask");
        assert_eq!(json["faces"][0]["box"]["xmin"], 200);
        assert!(json.get("message").is_none());
    }
}
