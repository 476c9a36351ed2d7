use image::codecs::jpeg::JpegEncoder;

use crate::capture::domain::frame_encoder::{EncodeError, FrameEncoder};
use crate::shared::constants::{CAPTURE_HEIGHT, CAPTURE_WIDTH, JPEG_QUALITY};
use crate::shared::encoded_frame::EncodedFrame;
use crate::shared::frame::Frame;

/// Scales frames to a fixed raster and encodes them as baseline JPEG.
pub struct JpegFrameEncoder {
    width: u32,
    height: u32,
    quality: u8,
}

impl JpegFrameEncoder {
    pub fn new(width: u32, height: u32, quality: u8) -> Self {
        Self {
            width,
            height,
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegFrameEncoder {
    fn default() -> Self {
        Self::new(CAPTURE_WIDTH, CAPTURE_HEIGHT, JPEG_QUALITY)
    }
}

impl FrameEncoder for JpegFrameEncoder {
    fn encode(&self, frame: &Frame) -> Result<EncodedFrame, EncodeError> {
        let scaled = frame.scaled_to(self.width, self.height);
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.quality)
            .encode_image(&scaled.to_rgb_image())?;
        Ok(EncodedFrame::from_jpeg_bytes(&jpeg, self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_at_capture_raster() {
        let frame = Frame::solid(1280, 720, [200, 30, 30]);
        let encoded = JpegFrameEncoder::default().encode(&frame).unwrap();

        assert_eq!((encoded.width(), encoded.height()), (640, 480));
        let decoded = image::load_from_memory(&encoded.jpeg_bytes().unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[test]
    fn test_output_is_jpeg() {
        let encoded = JpegFrameEncoder::new(32, 24, 80)
            .encode(&Frame::solid(32, 24, [0, 0, 0]))
            .unwrap();
        let bytes = encoded.jpeg_bytes().unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let mut data = Vec::with_capacity(64 * 64 * 3);
        for i in 0..64 * 64 {
            data.extend_from_slice(&[(i % 251) as u8, (i * 7 % 253) as u8, (i * 13 % 241) as u8]);
        }
        let frame = Frame::new(data, 64, 64, 0);
        let high = JpegFrameEncoder::new(64, 64, 95).encode(&frame).unwrap();
        let low = JpegFrameEncoder::new(64, 64, 10).encode(&frame).unwrap();
        assert!(low.as_base64().len() < high.as_base64().len());
    }
}
