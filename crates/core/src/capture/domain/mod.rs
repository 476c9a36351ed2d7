pub mod camera;
pub mod frame_encoder;
pub mod single_flight;
