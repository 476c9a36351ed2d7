use thiserror::Error;

use crate::shared::encoded_frame::EncodedFrame;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Turns a raw frame into the payload sent to the classifier.
pub trait FrameEncoder: Send {
    fn encode(&self, frame: &Frame) -> Result<EncodedFrame, EncodeError>;
}
