pub mod camera_factory;
pub mod ffmpeg_camera;
pub mod image_folder_camera;
pub mod jpeg_frame_encoder;
