use serde::{Deserialize, Serialize};

use crate::InvalidInput;

/// Ordered glyphs, lightest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct GlyphRamp {
    glyphs: Vec<String>,
}

impl GlyphRamp {
    /// Builds a ramp from multi-character glyphs.
    ///
    /// Every glyph must be non-empty and free of line breaks, and the ramp needs at
    /// least two entries so both ends of the luminance range get a distinct bucket.
    pub fn new<I, S>(glyphs: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let glyphs: Vec<String> = glyphs.into_iter().map(Into::into).collect();
        match glyphs.len() {
            0 => return Err(InvalidInput::EmptyRamp),
            1 => return Err(InvalidInput::RampTooShort(1)),
            _ => {},
        }

        for (index, glyph) in glyphs.iter().enumerate() {
            if glyph.is_empty() {
                return Err(InvalidInput::EmptyGlyph(index));
            }
            if glyph.contains(['\n', '\r']) {
                return Err(InvalidInput::MultilineGlyph(index));
            }
        }

        Ok(Self { glyphs })
    }

    /// One glyph per `char` of `chars`.
    pub fn from_chars(chars: &str) -> Result<Self, InvalidInput> {
        Self::new(chars.chars().map(String::from))
    }

    pub fn punctuation() -> Self {
        Self::preset(" .,:;-=+*#%@")
    }

    pub fn alphanumeric() -> Self {
        Self::preset("il1rtfjxnuvczXUQM")
    }

    pub fn blocks() -> Self {
        Self::preset(" ░▒▓█")
    }

    fn preset(chars: &str) -> Self {
        Self { glyphs: chars.chars().map(String::from).collect() }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false for a constructed ramp.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    pub fn last_index(&self) -> usize {
        self.glyphs.len() - 1
    }

    pub fn glyph(&self, index: usize) -> &str {
        &self.glyphs[index.min(self.last_index())]
    }

    pub fn contains(&self, glyph: &str) -> bool {
        self.glyphs.iter().any(|candidate| candidate == glyph)
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self::punctuation()
    }
}

impl TryFrom<Vec<String>> for GlyphRamp {
    type Error = InvalidInput;

    fn try_from(glyphs: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(glyphs)
    }
}

impl From<GlyphRamp> for Vec<String> {
    fn from(ramp: GlyphRamp) -> Self {
        ramp.glyphs
    }
}

/// Named ramps selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RampPreset {
    #[default]
    Punctuation,
    Alphanumeric,
    Blocks,
}

impl RampPreset {
    pub fn ramp(self) -> GlyphRamp {
        match self {
            RampPreset::Punctuation => GlyphRamp::punctuation(),
            RampPreset::Alphanumeric => GlyphRamp::alphanumeric(),
            RampPreset::Blocks => GlyphRamp::blocks(),
        }
    }
}
