//! Image to monospace text renderer.
//!
//! Each output cell point-samples one source pixel, converts it to BT.709
//! luminance and picks the glyph of matching density from a [`GlyphRamp`].
//!
//! ```
//! use pixel_ascii::{render, GlyphRamp, RawImage, RenderOptions};
//!
//! let black = [0u8, 0, 0];
//! let white = [255, 255, 255];
//! let pixels = [black, white, white, black].concat();
//! let image = RawImage::rgb8(2, 2, &pixels).unwrap();
//!
//! let options = RenderOptions {
//!     width: 2,
//!     aspect: 1.0,
//!     ramp: GlyphRamp::from_chars(" #").unwrap(),
//!     ..RenderOptions::default()
//! };
//! let grid = render(&image, &options).unwrap();
//! assert_eq!(grid.to_string(), " #\n# \n");
//! ```

mod ascii;
mod image_pipeline;

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use ascii::{
    grid::TextGrid,
    mapping::{glyph_index, luminance, GlyphMapper},
    ramp::{GlyphRamp, RampPreset},
};
pub use image_pipeline::{
    layout::Geometry,
    source::{PixelLayout, PixelSource, RawImage},
};

pub const DEFAULT_WIDTH: u32 = 100;
pub const DEFAULT_ASPECT: f64 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
}

/// Caller contract violations, detected before any sampling.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("image has zero width or height")]
    EmptyImage,
    #[error("target width must be at least one column")]
    ZeroWidth,
    #[error("character aspect ratio must be a positive number, got {0}")]
    InvalidAspect(f64),
    #[error("grid would need {0} rows, more than the supported maximum")]
    TooManyRows(f64),
    #[error("glyph ramp is empty")]
    EmptyRamp,
    #[error("glyph ramp needs at least two glyphs, got {0}")]
    RampTooShort(usize),
    #[error("glyph {0} of the ramp is empty")]
    EmptyGlyph(usize),
    #[error("glyph {0} of the ramp contains a line break")]
    MultilineGlyph(usize),
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: u64, actual: usize },
}

/// Immutable description of a single render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Output width in glyphs.
    pub width: u32,
    /// Glyph cell width divided by glyph cell height.
    pub aspect: f64,
    /// Map dark pixels to the dense end of the ramp.
    pub invert: bool,
    pub ramp: GlyphRamp,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            aspect: DEFAULT_ASPECT,
            invert: false,
            ramp: GlyphRamp::default(),
        }
    }
}

impl RenderOptions {
    /// Grid size for a source image of the given dimensions.
    pub fn geometry(&self, source_width: u32, source_height: u32) -> Result<Geometry, InvalidInput> {
        Geometry::derive(source_width, source_height, self.width, self.aspect)
    }
}

/// Renders `image` into a grid of `options.width` columns.
pub fn render<S>(image: &S, options: &RenderOptions) -> Result<TextGrid, RenderError>
where
    S: PixelSource + ?Sized,
{
    let (width, height) = image.dimensions();
    let geometry = options.geometry(width, height)?;
    debug!(
        source_width = width,
        source_height = height,
        columns = geometry.columns,
        rows = geometry.rows,
        invert = options.invert,
        "derived grid geometry"
    );

    let mapper = &GlyphMapper::new(&options.ramp, options.invert);
    let cells: Vec<usize> = (0..geometry.rows)
        .into_par_iter()
        .flat_map_iter(|y| {
            let source_y = geometry.source_y(y);
            (0..geometry.columns)
                .map(move |x| mapper.index_for(image.rgb(geometry.source_x(x), source_y)))
        })
        .collect();

    Ok(TextGrid::new(geometry.columns, geometry.rows, options.ramp.clone(), cells))
}

#[derive(Default)]
pub struct AsciiRenderer;

impl AsciiRenderer {
    /// Decodes the file at `path` and renders it.
    pub fn render_path<P: AsRef<Path>>(
        &self,
        path: P,
        options: &RenderOptions,
    ) -> Result<TextGrid, RenderError> {
        let image = image::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "decoded image");
        self.render_image(&image, options)
    }

    pub fn render_image<S>(&self, image: &S, options: &RenderOptions) -> Result<TextGrid, RenderError>
    where
        S: PixelSource + ?Sized,
    {
        render(image, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 3] = [0, 0, 0];
    const WHITE: [u8; 3] = [255, 255, 255];

    fn options(width: u32, aspect: f64, ramp: &str) -> RenderOptions {
        RenderOptions {
            width,
            aspect,
            invert: false,
            ramp: GlyphRamp::from_chars(ramp).unwrap(),
        }
    }

    #[test]
    fn renders_checkerboard() {
        let pixels = [BLACK, WHITE, WHITE, BLACK].concat();
        let image = RawImage::rgb8(2, 2, &pixels).unwrap();
        let grid = render(&image, &options(2, 1.0, " #")).unwrap();
        assert_eq!(grid.to_string(), " #\n# \n");
    }

    #[test]
    fn inverted_checkerboard_swaps_glyphs() {
        let pixels = [BLACK, WHITE, WHITE, BLACK].concat();
        let image = RawImage::rgb8(2, 2, &pixels).unwrap();
        let mut options = options(2, 1.0, " #");
        options.invert = true;
        assert_eq!(render(&image, &options).unwrap().to_string(), "# \n #\n");
    }

    #[test]
    fn single_pixel_fills_every_cell() {
        let pixels = [90, 180, 40];
        let image = RawImage::rgb8(1, 1, &pixels).unwrap();
        let options = RenderOptions { width: 9, aspect: 0.5, ..RenderOptions::default() };
        let grid = render(&image, &options).unwrap();

        assert_eq!(grid.height(), 4);
        let first = grid.glyph(0, 0).unwrap();
        assert!(grid.glyphs().all(|glyph| glyph == first));
    }

    #[test]
    fn zero_rows_is_empty_text() {
        let pixels = vec![255u8; 40 * 3];
        let image = RawImage::rgb8(40, 1, &pixels).unwrap();
        let grid = render(&image, &options(3, 0.5, " #")).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.to_string(), "");
    }

    #[test]
    fn rejects_invalid_options() {
        let pixels = [0; 3];
        let image = RawImage::rgb8(1, 1, &pixels).unwrap();

        let zero_width = options(0, 0.5, " #");
        assert!(matches!(
            render(&image, &zero_width),
            Err(RenderError::InvalidInput(InvalidInput::ZeroWidth))
        ));

        let bad_aspect = options(4, -0.5, " #");
        assert!(matches!(
            render(&image, &bad_aspect),
            Err(RenderError::InvalidInput(InvalidInput::InvalidAspect(_)))
        ));

        let huge_aspect = options(4, 1e300, " #");
        assert!(matches!(
            render(&image, &huge_aspect),
            Err(RenderError::InvalidInput(InvalidInput::TooManyRows(_)))
        ));
    }

    #[test]
    fn empty_ramp_from_config_is_rejected() {
        let err = serde_json::from_str::<RenderOptions>(r#"{"ramp": []}"#).unwrap_err();
        assert!(err.to_string().contains("empty"), "{err}");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: RenderOptions = serde_json::from_str(r#"{"width": 40, "invert": true}"#).unwrap();
        assert_eq!(options.width, 40);
        assert!(options.invert);
        assert_eq!(options.aspect, DEFAULT_ASPECT);
        assert_eq!(options.ramp, GlyphRamp::punctuation());
    }

    #[test]
    fn renderer_reports_missing_files() {
        let result = AsciiRenderer.render_path("does/not/exist.png", &RenderOptions::default());
        assert!(matches!(result, Err(RenderError::Image(_))));
    }
}
