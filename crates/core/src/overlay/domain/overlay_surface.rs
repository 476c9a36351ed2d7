use crate::overlay::domain::draw_command::DrawCommand;

/// Where overlay drawings end up (a GUI canvas, a recorder, a file).
///
/// `present` replaces whatever was shown before; nothing persists across
/// calls.
pub trait OverlaySurface: Send {
    fn size(&self) -> (u32, u32);

    fn present(&mut self, commands: Vec<DrawCommand>);

    fn clear(&mut self);
}
