use crate::overlay::domain::draw_command::{DrawCommand, PixelRect, Rgb};
use crate::overlay::domain::text_measurer::TextMeasurer;
use crate::shared::constants::{MASK_COLOR, NORMALIZED_SCALE, NO_MASK_COLOR};
use crate::shared::detection_result::{DetectionResult, FaceDetection};

pub const BOX_LINE_WIDTH: f32 = 4.0;
pub const LABEL_FONT_SIZE: f32 = 16.0;
pub const LABEL_HEIGHT: f32 = 30.0;
const LABEL_PADDING: f32 = 10.0;
const LABEL_TEXT_INSET: f32 = 5.0;
const LABEL_BASELINE_OFFSET: f32 = 8.0;

pub fn status_color(face: &FaceDetection) -> Rgb {
    if face.status.is_mask() {
        Rgb::from_array(MASK_COLOR)
    } else {
        Rgb::from_array(NO_MASK_COLOR)
    }
}

/// Maps a face box from the normalized 0..=1000 space onto a `width` x
/// `height` canvas.
pub fn to_pixel_rect(face: &FaceDetection, width: u32, height: u32) -> PixelRect {
    let b = face.bbox.normalized();
    let sx = |v: i32| (v as f64 / NORMALIZED_SCALE * width as f64) as f32;
    let sy = |v: i32| (v as f64 / NORMALIZED_SCALE * height as f64) as f32;
    let (x, y) = (sx(b.xmin), sy(b.ymin));
    PixelRect {
        x,
        y,
        width: sx(b.xmax) - x,
        height: sy(b.ymax) - y,
    }
}

/// Turns a detection result into the full command list for one overlay
/// redraw.
///
/// The first command always clears the canvas, so an empty result wipes any
/// previous boxes. Each face contributes a stroked box, a filled label strip
/// just above it and the label text.
pub fn render(
    result: &DetectionResult,
    width: u32,
    height: u32,
    measurer: &dyn TextMeasurer,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(1 + result.faces.len() * 3);
    commands.push(DrawCommand::Clear { width, height });

    for face in &result.faces {
        let rect = to_pixel_rect(face, width, height);
        let color = status_color(face);
        let label = face.label();
        let text_width = measurer.width(&label, LABEL_FONT_SIZE, true);

        commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width: BOX_LINE_WIDTH,
        });
        commands.push(DrawCommand::FillRect {
            rect: PixelRect {
                x: rect.x,
                y: rect.y - LABEL_HEIGHT,
                width: text_width + LABEL_PADDING,
                height: LABEL_HEIGHT,
            },
            color,
        });
        commands.push(DrawCommand::Text {
            content: label,
            x: rect.x + LABEL_TEXT_INSET,
            y: rect.y - LABEL_BASELINE_OFFSET,
            color: Rgb::WHITE,
            size: LABEL_FONT_SIZE,
            bold: true,
        });
    }

    commands
}
