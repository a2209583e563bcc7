//! Texture buffers and pixel sampling.

use crate::color::Color;

/// Read access to a raster in texture space.
///
/// Texel coordinates have their origin at the bottom-left corner, as in
/// engine texture space: `pixel(x, 0)` is the bottom row of the stored image.
pub trait PixelSource {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Color at texel `(x, y)`. Coordinates must be in bounds.
    fn pixel(&self, x: u32, y: u32) -> Color;

    /// Width in pixels.
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Height in pixels.
    fn height(&self) -> u32 {
        self.dimensions().1
    }
}

/// A 2D RGBA texture buffer.
///
/// Storage is row-major and top-down (row 0 is the first row of an encoded
/// image). [`TextureBuffer::texel`] and [`PixelSource`] address it in
/// texture space instead.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (RGBA, row-major).
    pub data: Vec<Color>,
}

impl TextureBuffer {
    /// Create a new texture buffer filled with a color.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![fill; size],
        }
    }

    /// Create a buffer from 8-bit RGBA bytes in top-down row order.
    ///
    /// Returns `None` if `bytes` is not exactly `width * height * 4` long.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return None;
        }

        let data = bytes
            .chunks_exact(4)
            .map(|px| Color::from_rgba8([px[0], px[1], px[2], px[3]]))
            .collect();

        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Get a pixel at storage coordinates (top-down).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Color {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx]
    }

    /// Set a pixel at storage coordinates (top-down).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = y as usize * self.width as usize + x as usize;
        self.data[idx] = color;
    }

    /// Get a texel in texture space (bottom-up).
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> Color {
        self.get(x, self.height - 1 - y)
    }

    /// Set a texel in texture space (bottom-up).
    #[inline]
    pub fn set_texel(&mut self, x: u32, y: u32, color: Color) {
        let row = self.height - 1 - y;
        self.set(x, row, color);
    }

    /// Convert to 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * 4);
        for color in &self.data {
            bytes.extend_from_slice(&color.to_rgba8());
        }
        bytes
    }
}

impl PixelSource for TextureBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        self.texel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texel_is_bottom_up() {
        let mut buffer = TextureBuffer::new(2, 3, Color::black());
        buffer.set(0, 2, Color::rgb(1.0, 0.0, 0.0));

        assert_eq!(buffer.texel(0, 0), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(buffer.pixel(0, 0), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(buffer.texel(0, 2), Color::black());
    }

    #[test]
    fn test_set_texel_matches_texel() {
        let mut buffer = TextureBuffer::new(3, 3, Color::black());
        buffer.set_texel(1, 0, Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(buffer.get(1, 2), Color::rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_from_rgba8_checks_length() {
        assert!(TextureBuffer::from_rgba8(2, 2, &[0; 15]).is_none());

        let buffer = TextureBuffer::from_rgba8(1, 2, &[255, 0, 0, 255, 0, 0, 255, 128]).unwrap();
        assert_eq!(buffer.get(0, 0), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(buffer.get(0, 1).to_rgba8(), [0, 0, 255, 128]);
        assert_eq!(buffer.to_rgba8(), vec![255, 0, 0, 255, 0, 0, 255, 128]);
    }

    #[test]
    fn test_dimensions() {
        let buffer = TextureBuffer::new(7, 3, Color::black());
        assert_eq!(buffer.dimensions(), (7, 3));
        assert_eq!(buffer.width(), 7);
        assert_eq!(buffer.height(), 3);
    }
}
