use crate::shared::detection_result::DetectionResult;
use crate::shared::encoded_frame::EncodedFrame;

/// Domain interface for mask classification of one encoded frame.
///
/// Infallible by contract: implementations turn every failure into an empty
/// [`DetectionResult`] with a `message`, so a failed tick never interrupts
/// polling. Shared across worker threads, hence `&self` and `Sync`.
pub trait MaskClassifier: Send + Sync {
    fn classify(&self, frame: &EncodedFrame) -> DetectionResult;
}
