use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::capture::domain::camera::{Camera, CameraError, CameraStream, StreamConstraints};
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Plays a folder of still images (or a single image) as a camera.
///
/// Files are played in name order, cycling at the end. With no dwell each
/// `latest_frame` call advances to the next file; with a dwell the current
/// image keeps being returned until it has been on screen that long, like a
/// slideshow running independently of its readers.
pub struct ImageFolderCamera {
    path: PathBuf,
    dwell: Duration,
}

impl ImageFolderCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dwell: Duration::ZERO,
        }
    }

    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn map_io(path: &Path, e: std::io::Error) -> CameraError {
    let detail = format!("{}: {e}", path.display());
    if e.kind() == ErrorKind::PermissionDenied {
        CameraError::PermissionDenied(detail)
    } else {
        CameraError::Unavailable(detail)
    }
}

impl Camera for ImageFolderCamera {
    fn acquire(
        &self,
        _constraints: &StreamConstraints,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        let files = if self.path.is_file() {
            vec![self.path.clone()]
        } else {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&self.path)
                .map_err(|e| map_io(&self.path, e))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_image_file(p))
                .collect();
            files.sort();
            files
        };

        if files.is_empty() {
            return Err(CameraError::Unavailable(format!(
                "no images in {}",
                self.path.display()
            )));
        }

        log::info!(
            "Image folder camera opened: {} ({} image(s))",
            self.path.display(),
            files.len()
        );
        Ok(Box::new(ImageFolderStream {
            files,
            cursor: 0,
            dwell: self.dwell,
            showing: None,
            released: false,
        }))
    }

    fn describe(&self) -> String {
        format!("images:{}", self.path.display())
    }
}

struct ImageFolderStream {
    files: Vec<PathBuf>,
    cursor: usize,
    dwell: Duration,
    showing: Option<(Frame, Instant)>,
    released: bool,
}

impl CameraStream for ImageFolderStream {
    fn latest_frame(&mut self) -> Result<Frame, CameraError> {
        if self.released {
            return Err(CameraError::Unavailable("stream released".into()));
        }
        if let Some((frame, since)) = &self.showing {
            if since.elapsed() < self.dwell {
                return Ok(frame.clone());
            }
        }
        let path = &self.files[self.cursor % self.files.len()];
        let sequence = self.cursor as u64;
        self.cursor += 1;

        let img = image::open(path)
            .map_err(|e| CameraError::Read(format!("{}: {e}", path.display())))?
            .to_rgb8();
        let frame = Frame::from_rgb_image(img, sequence);
        if !self.dwell.is_zero() {
            self.showing = Some((frame.clone(), Instant::now()));
        }
        Ok(frame)
    }

    fn release(&mut self) {
        self.released = true;
    }
}
