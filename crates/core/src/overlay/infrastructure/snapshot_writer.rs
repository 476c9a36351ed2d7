use std::path::Path;

use crate::overlay::domain::draw_command::DrawCommand;
use crate::overlay::infrastructure::frame_painter::FramePainter;
use crate::shared::encoded_frame::EncodedFrame;
use crate::shared::frame::Frame;

/// Saves a frame with the overlay burned in. Format follows the extension.
#[derive(Debug, Default)]
pub struct SnapshotWriter {
    painter: FramePainter,
}

impl SnapshotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(
        &self,
        path: &Path,
        frame: &Frame,
        commands: &[DrawCommand],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut annotated = frame.clone();
        self.painter.paint(&mut annotated, commands);

        let img = image::RgbImage::from_raw(
            annotated.width(),
            annotated.height(),
            annotated.data().to_vec(),
        )
        .ok_or("Failed to create image from frame data")?;
        img.save(path)?;
        log::debug!("Snapshot written to {}", path.display());
        Ok(())
    }

    /// Same as [`write`](Self::write) for a frame that is still JPEG-encoded.
    pub fn write_encoded(
        &self,
        path: &Path,
        frame: &EncodedFrame,
        commands: &[DrawCommand],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let rgb = image::load_from_memory(&frame.jpeg_bytes()?)?.to_rgb8();
        self.write(path, &Frame::from_rgb_image(rgb, 0), commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::domain::draw_command::{PixelRect, Rgb};

    fn marked() -> Vec<DrawCommand> {
        vec![
            DrawCommand::Clear {
                width: 100,
                height: 100,
            },
            DrawCommand::FillRect {
                rect: PixelRect {
                    x: 0.0,
                    y: 0.0,
                    width: 50.0,
                    height: 50.0,
                },
                color: Rgb(0xef, 0x44, 0x44),
            },
        ]
    }

    #[test]
    fn test_write_burns_overlay_into_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snap.png");
        let frame = Frame::solid(40, 40, [10, 10, 10]);

        SnapshotWriter::new().write(&path, &frame, &marked()).unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (40, 40));
        assert_eq!(img.get_pixel(5, 5).0, [0xef, 0x44, 0x44]);
        assert_eq!(img.get_pixel(30, 30).0, [10, 10, 10]);
        // The source frame itself is untouched.
        assert_eq!(&frame.data()[..3], &[10, 10, 10]);
    }

    #[test]
    fn test_write_encoded_decodes_jpeg_first() {
        use crate::capture::domain::frame_encoder::FrameEncoder;
        use crate::capture::infrastructure::jpeg_frame_encoder::JpegFrameEncoder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.png");
        let encoded = JpegFrameEncoder::new(100, 100, 90)
            .encode(&Frame::solid(100, 100, [10, 10, 10]))
            .unwrap();

        SnapshotWriter::new()
            .write_encoded(&path, &encoded, &marked())
            .unwrap();

        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (100, 100));
        assert_eq!(img.get_pixel(10, 10).0, [0xef, 0x44, 0x44]);
    }

    #[test]
    fn test_unknown_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.unknownext");
        let frame = Frame::solid(4, 4, [0, 0, 0]);
        assert!(SnapshotWriter::new().write(&path, &frame, &[]).is_err());
    }
}
