use ndarray::{s, Axis};

use crate::overlay::domain::draw_command::{DrawCommand, PixelRect, Rgb};
use crate::shared::frame::Frame;

/// Rasterizes overlay rectangles straight into a frame's pixels.
///
/// Commands are expressed in the canvas space announced by their leading
/// `Clear`; they are scaled to the frame's own size. Text is skipped (no font
/// rasterizer here), the filled label strips still mark where labels go.
#[derive(Debug, Default, Clone, Copy)]
pub struct FramePainter;

impl FramePainter {
    pub fn paint(&self, frame: &mut Frame, commands: &[DrawCommand]) {
        let (fw, fh) = (frame.width() as f32, frame.height() as f32);
        let (mut sx, mut sy) = (1.0f32, 1.0f32);

        for command in commands {
            match command {
                DrawCommand::Clear { width, height } => {
                    if *width > 0 && *height > 0 {
                        sx = fw / *width as f32;
                        sy = fh / *height as f32;
                    }
                }
                DrawCommand::StrokeRect {
                    rect,
                    color,
                    line_width,
                } => {
                    let r = scale_rect(rect, sx, sy);
                    let half = (line_width * sx.min(sy) / 2.0).max(0.5);
                    // Four bands centered on the edges, like a canvas stroke.
                    fill(frame, r.x - half, r.y - half, r.right() + half, r.y + half, *color);
                    fill(frame, r.x - half, r.bottom() - half, r.right() + half, r.bottom() + half, *color);
                    fill(frame, r.x - half, r.y - half, r.x + half, r.bottom() + half, *color);
                    fill(frame, r.right() - half, r.y - half, r.right() + half, r.bottom() + half, *color);
                }
                DrawCommand::FillRect { rect, color } => {
                    let r = scale_rect(rect, sx, sy);
                    fill(frame, r.x, r.y, r.right(), r.bottom(), *color);
                }
                DrawCommand::Text { .. } => {}
            }
        }
    }
}

fn scale_rect(rect: &PixelRect, sx: f32, sy: f32) -> PixelRect {
    PixelRect {
        x: rect.x * sx,
        y: rect.y * sy,
        width: rect.width * sx,
        height: rect.height * sy,
    }
}

/// Fills the half-open pixel span `[x0, x1) x [y0, y1)`, clipped to the frame.
fn fill(frame: &mut Frame, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb) {
    let (w, h) = (frame.width() as f32, frame.height() as f32);
    let clip = |v: f32, max: f32| v.round().clamp(0.0, max) as usize;
    let (x0, x1) = (clip(x0, w), clip(x1, w));
    let (y0, y1) = (clip(y0, h), clip(y1, h));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let mut pixels = frame.as_ndarray_mut();
    let mut region = pixels.slice_mut(s![y0..y1, x0..x1, ..]);
    for mut px in region.lanes_mut(Axis(2)) {
        px[0] = color.0;
        px[1] = color.1;
        px[2] = color.2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &Frame, x: usize, y: usize) -> [u8; 3] {
        let i = (y * frame.width() as usize + x) * 3;
        [frame.data()[i], frame.data()[i + 1], frame.data()[i + 2]]
    }

    fn rect(x: f32, y: f32, width: f32, height: f32) -> PixelRect {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    const RED: Rgb = Rgb(255, 0, 0);

    #[test]
    fn test_fill_rect_paints_inside_only() {
        let mut frame = Frame::solid(10, 10, [0, 0, 0]);
        FramePainter.paint(
            &mut frame,
            &[
                DrawCommand::Clear {
                    width: 10,
                    height: 10,
                },
                DrawCommand::FillRect {
                    rect: rect(2.0, 2.0, 3.0, 3.0),
                    color: RED,
                },
            ],
        );
        assert_eq!(pixel(&frame, 2, 2), [255, 0, 0]);
        assert_eq!(pixel(&frame, 4, 4), [255, 0, 0]);
        assert_eq!(pixel(&frame, 5, 5), [0, 0, 0]);
        assert_eq!(pixel(&frame, 1, 1), [0, 0, 0]);
    }

    #[test]
    fn test_stroke_leaves_interior_untouched() {
        let mut frame = Frame::solid(20, 20, [0, 0, 0]);
        FramePainter.paint(
            &mut frame,
            &[
                DrawCommand::Clear {
                    width: 20,
                    height: 20,
                },
                DrawCommand::StrokeRect {
                    rect: rect(4.0, 4.0, 12.0, 12.0),
                    color: RED,
                    line_width: 2.0,
                },
            ],
        );
        assert_eq!(pixel(&frame, 4, 10), [255, 0, 0]);
        assert_eq!(pixel(&frame, 10, 15), [255, 0, 0]);
        assert_eq!(pixel(&frame, 10, 10), [0, 0, 0]);
    }

    #[test]
    fn test_commands_scale_from_canvas_to_frame() {
        let mut frame = Frame::solid(20, 20, [0, 0, 0]);
        FramePainter.paint(
            &mut frame,
            &[
                DrawCommand::Clear {
                    width: 10,
                    height: 10,
                },
                DrawCommand::FillRect {
                    rect: rect(5.0, 5.0, 5.0, 5.0),
                    color: RED,
                },
            ],
        );
        assert_eq!(pixel(&frame, 10, 10), [255, 0, 0]);
        assert_eq!(pixel(&frame, 19, 19), [255, 0, 0]);
        assert_eq!(pixel(&frame, 9, 9), [0, 0, 0]);
    }

    #[test]
    fn test_out_of_bounds_shapes_are_clipped() {
        let mut frame = Frame::solid(8, 8, [0, 0, 0]);
        FramePainter.paint(
            &mut frame,
            &[
                DrawCommand::FillRect {
                    rect: rect(-20.0, -20.0, 24.0, 24.0),
                    color: RED,
                },
                DrawCommand::FillRect {
                    rect: rect(50.0, 50.0, 5.0, 5.0),
                    color: RED,
                },
            ],
        );
        assert_eq!(pixel(&frame, 3, 3), [255, 0, 0]);
        assert_eq!(pixel(&frame, 4, 4), [0, 0, 0]);
    }
}
