pub mod frame_painter;
pub mod recording_surface;
pub mod snapshot_writer;
