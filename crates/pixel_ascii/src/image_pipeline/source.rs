use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};

use crate::InvalidInput;

/// Read-only access to decoded 8-bit pixels.
///
/// Alpha, when present, is ignored.
pub trait PixelSource: Sync {
    fn dimensions(&self) -> (u32, u32);

    /// Red, green and blue at `(x, y)`. Callers stay within `dimensions()`.
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb8,
    Rgba8,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb8 => 3,
            PixelLayout::Rgba8 => 4,
        }
    }
}

/// Borrowed, tightly packed pixel buffer.
#[derive(Clone, Copy, Debug)]
pub struct RawImage<'a> {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: &'a [u8],
}

impl<'a> RawImage<'a> {
    pub fn new(
        width: u32,
        height: u32,
        layout: PixelLayout,
        data: &'a [u8],
    ) -> Result<Self, InvalidInput> {
        if width == 0 || height == 0 {
            return Err(InvalidInput::EmptyImage);
        }

        let expected = u64::from(width) * u64::from(height) * layout.channels() as u64;
        if data.len() as u64 != expected {
            return Err(InvalidInput::BufferSize { expected, actual: data.len() });
        }

        Ok(Self { width, height, layout, data })
    }

    pub fn rgb8(width: u32, height: u32, data: &'a [u8]) -> Result<Self, InvalidInput> {
        Self::new(width, height, PixelLayout::Rgb8, data)
    }

    pub fn rgba8(width: u32, height: u32, data: &'a [u8]) -> Result<Self, InvalidInput> {
        Self::new(width, height, PixelLayout::Rgba8, data)
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }
}

impl PixelSource for RawImage<'_> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = (y as usize * self.width as usize + x as usize) * self.layout.channels();
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }
}

impl PixelSource for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).0
    }
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        [r, g, b]
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = GenericImageView::get_pixel(self, x, y).0;
        [r, g, b]
    }
}
