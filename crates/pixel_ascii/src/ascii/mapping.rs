use super::ramp::GlyphRamp;

/// BT.709 luma weights scaled to integers, summing to `LUMA_SCALE`.
const LUMA_WEIGHTS: [u32; 3] = [2126, 7152, 722];
const LUMA_SCALE: u32 = 10_000;

/// Perceptual luminance `floor(0.2126 r + 0.7152 g + 0.0722 b)`.
///
/// Computed in fixed point so white lands on exactly 255.
pub fn luminance([r, g, b]: [u8; 3]) -> u8 {
    let weighted = LUMA_WEIGHTS[0] * u32::from(r)
        + LUMA_WEIGHTS[1] * u32::from(g)
        + LUMA_WEIGHTS[2] * u32::from(b);
    (weighted / LUMA_SCALE) as u8
}

/// Linear quantization of `luminance` into `levels` buckets.
///
/// `floor(L / 255 * (levels - 1))`, so 255 always maps to the last bucket.
pub fn glyph_index(luminance: u8, levels: usize) -> usize {
    let max_index = levels.saturating_sub(1);
    usize::from(luminance) * max_index / 255
}

pub struct GlyphMapper<'a> {
    ramp: &'a GlyphRamp,
    invert: bool,
}

impl<'a> GlyphMapper<'a> {
    pub fn new(ramp: &'a GlyphRamp, invert: bool) -> Self {
        Self { ramp, invert }
    }

    pub fn index_for(&self, rgb: [u8; 3]) -> usize {
        let mut lum = luminance(rgb);
        if self.invert {
            lum = 255 - lum;
        }
        glyph_index(lum, self.ramp.len())
    }

    pub fn glyph_for(&self, rgb: [u8; 3]) -> &'a str {
        self.ramp.glyph(self.index_for(rgb))
    }
}
