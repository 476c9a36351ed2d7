use thiserror::Error;

use crate::shared::constants::{CAMERA_DENIED_MESSAGE, CAPTURE_HEIGHT, CAPTURE_WIDTH};
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("camera access denied: {0}")]
    PermissionDenied(String),
    #[error("camera unavailable: {0}")]
    Unavailable(String),
    #[error("no frame available yet")]
    NoFrame,
    #[error("failed to read camera frame: {0}")]
    Read(String),
}

impl CameraError {
    /// Text shown to the user when a stream cannot be started.
    pub fn user_message(&self) -> String {
        match self {
            CameraError::PermissionDenied(_) => CAMERA_DENIED_MESSAGE.to_string(),
            other => format!("Camera error: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    User,
    Environment,
}

/// What the caller would like from a stream. Sources honor it when they can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            facing: Facing::User,
            ideal_width: CAPTURE_WIDTH,
            ideal_height: CAPTURE_HEIGHT,
        }
    }
}

/// A frame source that can be opened into a live stream.
pub trait Camera: Send {
    fn acquire(&self, constraints: &StreamConstraints)
        -> Result<Box<dyn CameraStream>, CameraError>;

    /// Human-readable source name for logs.
    fn describe(&self) -> String;
}

/// An open stream. Only the most recent frame matters; nothing is queued.
pub trait CameraStream: Send {
    fn latest_frame(&mut self) -> Result<Frame, CameraError>;

    /// Stops the source and frees every device resource. Idempotent.
    fn release(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_maps_to_fixed_message() {
        let err = CameraError::PermissionDenied("EACCES".into());
        assert_eq!(err.user_message(), CAMERA_DENIED_MESSAGE);
    }

    #[test]
    fn test_other_errors_keep_their_detail() {
        let err = CameraError::Unavailable("/dev/video9 missing".into());
        assert!(err.user_message().contains("/dev/video9 missing"));
    }

    #[test]
    fn test_default_constraints_are_front_facing_vga() {
        let c = StreamConstraints::default();
        assert_eq!(c.facing, Facing::User);
        assert_eq!((c.ideal_width, c.ideal_height), (640, 480));
    }
}
