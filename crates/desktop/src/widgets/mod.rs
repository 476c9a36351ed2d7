pub mod action_button;
pub mod overlay_canvas;
