use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A JPEG-encoded frame in base64, ready for the wire or for storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedFrame {
    base64: String,
    width: u32,
    height: u32,
}

impl EncodedFrame {
    pub fn from_jpeg_bytes(jpeg: &[u8], width: u32, height: u32) -> Self {
        Self {
            base64: STANDARD.encode(jpeg),
            width,
            height,
        }
    }

    /// Wraps an already base64-encoded JPEG.
    pub fn from_base64(base64: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            base64: base64.into(),
            width,
            height,
        }
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    pub fn into_base64(self) -> String {
        self.base64
    }

    pub fn jpeg_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.base64)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_survive_base64() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let frame = EncodedFrame::from_jpeg_bytes(&bytes, 640, 480);
        assert_eq!(frame.as_base64(), "/9j/4AAQ");
        assert_eq!(frame.jpeg_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_invalid_base64_is_an_error() {
        let frame = EncodedFrame::from_base64("not base64!!", 1, 1);
        assert!(frame.jpeg_bytes().is_err());
    }
}
