use ndarray::{ArrayView3, ArrayViewMut3};

/// One raw camera frame: tightly packed RGB24 pixels in row-major order.
///
/// Cameras produce these; the capture loop scales and encodes them before
/// anything leaves the process.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    sequence: u64,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    pub fn new(data: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * Self::CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            sequence,
        }
    }

    /// A frame filled with one color. Mostly useful for tests and placeholders.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let data = rgb.iter().copied().cycle().take(pixels * Self::CHANNELS).collect();
        Self::new(data, width, height, 0)
    }

    pub fn from_rgb_image(img: image::RgbImage, sequence: u64) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, sequence)
    }

    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .expect("Frame data length must match dimensions")
    }

    /// Returns a copy resized to `width` x `height`, or a plain clone when the
    /// size already matches.
    pub fn scaled_to(&self, width: u32, height: u32) -> Frame {
        if self.width == width && self.height == height {
            return self.clone();
        }
        let resized = image::imageops::resize(
            &self.to_rgb_image(),
            width,
            height,
            image::imageops::FilterType::Triangle,
        );
        Frame::from_rgb_image(resized, self.sequence)
    }

    /// RGBA bytes with an opaque alpha channel, the layout GUI toolkits want.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() / Self::CHANNELS * 4);
        for px in self.data.chunks_exact(Self::CHANNELS) {
            out.extend_from_slice(px);
            out.push(255);
        }
        out
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, Self::CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_fills_every_pixel() {
        let frame = Frame::solid(3, 2, [10, 20, 30]);
        assert_eq!(frame.data().len(), 18);
        for px in frame.data().chunks_exact(3) {
            assert_eq!(px, &[10, 20, 30]);
        }
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 0);
    }

    #[test]
    fn test_scaled_to_same_size_keeps_pixels() {
        let frame = Frame::solid(4, 4, [1, 2, 3]);
        let scaled = frame.scaled_to(4, 4);
        assert_eq!(scaled.data(), frame.data());
    }

    #[test]
    fn test_scaled_to_changes_dimensions_and_keeps_sequence() {
        let frame = Frame::new(vec![128u8; 8 * 6 * 3], 8, 6, 42);
        let scaled = frame.scaled_to(4, 3);
        assert_eq!((scaled.width(), scaled.height()), (4, 3));
        assert_eq!(scaled.sequence(), 42);
        assert!(scaled.data().iter().all(|&v| (127..=129).contains(&v)));
    }

    #[test]
    fn test_to_rgba_appends_opaque_alpha() {
        let frame = Frame::solid(2, 1, [9, 8, 7]);
        assert_eq!(frame.to_rgba(), vec![9, 8, 7, 255, 9, 8, 7, 255]);
    }

    #[test]
    fn test_rgb_image_roundtrip() {
        let img = image::RgbImage::from_pixel(5, 3, image::Rgb([1, 2, 3]));
        let frame = Frame::from_rgb_image(img.clone(), 7);
        assert_eq!(frame.to_rgb_image(), img);
    }

    #[test]
    fn test_as_ndarray_mut_writes_through() {
        let mut frame = Frame::solid(2, 2, [0, 0, 0]);
        frame.as_ndarray_mut()[[1, 0, 2]] = 200;
        assert_eq!(frame.as_ndarray()[[1, 0, 2]], 200);
        assert_eq!(frame.data()[8], 200);
    }
}
