pub mod draw_command;
pub mod overlay_surface;
pub mod text_measurer;
