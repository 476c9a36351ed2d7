use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke};
use iced::{Color, Font, Pixels, Point, Rectangle, Renderer, Size, Theme};

use maskguard_core::overlay::domain::draw_command::{DrawCommand, PixelRect, Rgb};
use maskguard_core::overlay::infrastructure::recording_surface::RecordingSurface;

/// Draws the capture loop's latest overlay commands on top of the preview.
///
/// Commands are laid out for the capture raster announced by their leading
/// `Clear`; they are stretched to whatever size the canvas ends up with.
pub struct OverlayCanvas {
    surface: RecordingSurface,
}

impl OverlayCanvas {
    pub fn new(surface: RecordingSurface) -> Self {
        Self { surface }
    }
}

impl<Message> canvas::Program<Message> for OverlayCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let commands = self.surface.commands();
        let mut frame = Frame::new(renderer, bounds.size());
        let (sx, sy) = scale_factors(&commands, bounds.size());

        for command in &commands {
            match command {
                DrawCommand::Clear { .. } => {}
                DrawCommand::StrokeRect {
                    rect,
                    color,
                    line_width,
                } => {
                    let r = scale_rect(rect, sx, sy);
                    frame.stroke(
                        &Path::rectangle(Point::new(r.x, r.y), Size::new(r.width, r.height)),
                        Stroke::default()
                            .with_color(to_color(*color))
                            .with_width(*line_width),
                    );
                }
                DrawCommand::FillRect { rect, color } => {
                    let r = scale_rect(rect, sx, sy);
                    frame.fill_rectangle(
                        Point::new(r.x, r.y),
                        Size::new(r.width, r.height),
                        to_color(*color),
                    );
                }
                DrawCommand::Text {
                    content,
                    x,
                    y,
                    color,
                    size,
                    bold,
                } => {
                    let font = if *bold {
                        Font {
                            weight: iced::font::Weight::Bold,
                            ..Font::DEFAULT
                        }
                    } else {
                        Font::DEFAULT
                    };
                    frame.fill_text(canvas::Text {
                        content: content.clone(),
                        position: Point::new(x * sx, text_top(*y, *size) * sy),
                        color: to_color(*color),
                        size: Pixels(*size),
                        font,
                        ..canvas::Text::default()
                    });
                }
            }
        }

        vec![frame.into_geometry()]
    }
}

/// Ratio between the canvas and the raster the commands were laid out for.
pub fn scale_factors(commands: &[DrawCommand], canvas: Size) -> (f32, f32) {
    match commands.first() {
        Some(DrawCommand::Clear { width, height }) if *width > 0 && *height > 0 => (
            canvas.width / *width as f32,
            canvas.height / *height as f32,
        ),
        _ => (1.0, 1.0),
    }
}

/// Labels are positioned by baseline; the canvas positions text by its top.
pub fn text_top(baseline: f32, size: f32) -> f32 {
    baseline - size
}

fn scale_rect(rect: &PixelRect, sx: f32, sy: f32) -> PixelRect {
    PixelRect {
        x: rect.x * sx,
        y: rect.y * sy,
        width: rect.width * sx,
        height: rect.height * sy,
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgb8(rgb.0, rgb.1, rgb.2)
}
