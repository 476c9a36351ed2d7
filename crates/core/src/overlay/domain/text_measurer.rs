/// Measures rendered label width, so label backgrounds fit their text.
pub trait TextMeasurer: Send + Sync {
    fn width(&self, text: &str, size: f32, bold: bool) -> f32;
}

/// Average advance of a sans-serif glyph, in em.
const REGULAR_ADVANCE_EM: f32 = 0.55;
const BOLD_ADVANCE_EM: f32 = 0.6;

/// Font-free estimate: a fixed average advance per character.
#[derive(Debug, Default, Clone, Copy)]
pub struct EstimatedTextMeasurer;

impl TextMeasurer for EstimatedTextMeasurer {
    fn width(&self, text: &str, size: f32, bold: bool) -> f32 {
        let em = if bold { BOLD_ADVANCE_EM } else { REGULAR_ADVANCE_EM };
        text.chars().count() as f32 * size * em
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_width_scales_with_length_and_size() {
        let m = EstimatedTextMeasurer;
        let one = m.width("a", 16.0, false);
        assert_relative_eq!(m.width("abcd", 16.0, false), one * 4.0);
        assert_relative_eq!(m.width("a", 32.0, false), one * 2.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let m = EstimatedTextMeasurer;
        assert!(m.width("Mask (93%)", 16.0, true) > m.width("Mask (93%)", 16.0, false));
    }

    #[test]
    fn test_empty_text_has_no_width() {
        assert_relative_eq!(EstimatedTextMeasurer.width("", 16.0, true), 0.0);
    }
}
