use crate::InvalidInput;

/// Character grid derived from a source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub columns: u32,
    pub rows: u32,
    source_width: u32,
    source_height: u32,
}

impl Geometry {
    /// `rows = floor((source_height / source_width) * columns * cell_aspect)`.
    ///
    /// `cell_aspect` is glyph width over glyph height. Zero rows is a valid result.
    pub fn derive(
        source_width: u32,
        source_height: u32,
        columns: u32,
        cell_aspect: f64,
    ) -> Result<Self, InvalidInput> {
        if source_width == 0 || source_height == 0 {
            return Err(InvalidInput::EmptyImage);
        }
        if columns == 0 {
            return Err(InvalidInput::ZeroWidth);
        }
        if !cell_aspect.is_finite() || cell_aspect <= 0.0 {
            return Err(InvalidInput::InvalidAspect(cell_aspect));
        }

        let image_ratio = f64::from(source_height) / f64::from(source_width);
        let rows = (image_ratio * f64::from(columns) * cell_aspect).floor();
        if rows > f64::from(u32::MAX) {
            return Err(InvalidInput::TooManyRows(rows));
        }
        let rows = rows as u32;

        Ok(Self { columns, rows, source_width, source_height })
    }

    /// Nearest source column for output column `x`: `floor(x / columns * source_width)`.
    pub fn source_x(&self, x: u32) -> u32 {
        scale(x, self.columns, self.source_width)
    }

    /// Nearest source row for output row `y`: `floor(y / rows * source_height)`.
    pub fn source_y(&self, y: u32) -> u32 {
        scale(y, self.rows, self.source_height)
    }

    pub fn cells(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}

fn scale(index: u32, steps: u32, extent: u32) -> u32 {
    let scaled = u64::from(index) * u64::from(extent) / u64::from(steps.max(1));
    (scaled as u32).min(extent - 1)
}
