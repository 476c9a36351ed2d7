/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    pub const fn from_array(rgb: [u8; 3]) -> Self {
        Rgb(rgb[0], rgb[1], rgb[2])
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Axis-aligned rectangle in overlay pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// One drawing step for an overlay surface, in the surface's pixel space.
///
/// `Text::y` is the baseline, matching how label text sits inside its
/// background strip.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: u32,
        height: u32,
    },
    StrokeRect {
        rect: PixelRect,
        color: Rgb,
        line_width: f32,
    },
    FillRect {
        rect: PixelRect,
        color: Rgb,
    },
    Text {
        content: String,
        x: f32,
        y: f32,
        color: Rgb,
        size: f32,
        bold: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgb(0x22, 0xc5, 0x5e).to_hex(), "#22c55e");
        assert_eq!(Rgb::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn test_rect_edges() {
        let r = PixelRect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
        };
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }
}
