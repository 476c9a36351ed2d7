use std::path::Path;
use std::time::Duration;

use crate::capture::domain::camera::Camera;
use crate::capture::infrastructure::ffmpeg_camera::FfmpegCamera;
use crate::capture::infrastructure::image_folder_camera::{is_image_file, ImageFolderCamera};

/// Picks a camera backend for a user-supplied source string.
///
/// Directories and still images play through the image reader, other
/// existing files are decoded by ffmpeg, anything else names a device.
pub fn create_camera(source: &str) -> Box<dyn Camera> {
    create_camera_with_dwell(source, Duration::ZERO)
}

/// Like [`create_camera`], but image sources hold each picture for `dwell`
/// so frequent preview reads do not skip through the folder.
pub fn create_camera_with_dwell(source: &str, dwell: Duration) -> Box<dyn Camera> {
    let path = Path::new(source);
    if path.is_dir() || (path.is_file() && is_image_file(path)) {
        Box::new(ImageFolderCamera::new(path).with_dwell(dwell))
    } else if path.is_file() {
        Box::new(FfmpegCamera::file(path))
    } else {
        Box::new(FfmpegCamera::device(source))
    }
}
