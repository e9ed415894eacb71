use std::path::Path;

use anyhow::{Context, Result};
use pixel_ascii::{GlyphRamp, RampPreset, RenderOptions, DEFAULT_ASPECT, DEFAULT_WIDTH};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variables override file values, e.g. `PIXEL_ASCII_RENDER__WIDTH=80`.
const ENV_PREFIX: &str = "PIXEL_ASCII";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
    pub bounds: WidthBounds,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Target width in characters
    pub width: u32,

    /// Glyph cell width / height
    pub aspect: f64,

    pub invert: bool,

    pub ramp: RampPreset,

    /// Custom ramp, one glyph per character, lightest first. Wins over `ramp`.
    pub glyphs: Option<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            aspect: DEFAULT_ASPECT,
            invert: false,
            ramp: RampPreset::default(),
            glyphs: None,
        }
    }
}

/// Accepted output widths. The renderer itself has no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WidthBounds {
    pub min_width: u32,
    pub max_width: u32,
}

impl Default for WidthBounds {
    fn default() -> Self {
        Self { min_width: 30, max_width: 300 }
    }
}

impl WidthBounds {
    pub fn clamp(&self, width: u32) -> u32 {
        let clamped = width.clamp(self.min_width, self.max_width);
        if clamped != width {
            warn!(
                requested = width,
                used = clamped,
                min = self.min_width,
                max = self.max_width,
                "width out of range, clamping"
            );
        }
        clamped
    }
}

/// Values stay strings until deserialized, so a digit ramp like `0123` keeps its leading zero.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__")
}

impl Settings {
    /// Load settings from an optional file plus environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(env)
            .build()
            .with_context(|| match path {
                Some(path) => format!("failed to read configuration from {:?}", path),
                None => "failed to read configuration from the environment".to_string(),
            })?;

        settings.try_deserialize().context("failed to parse configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.bounds.min_width == 0 {
            anyhow::bail!("min_width must be at least 1");
        }

        if self.bounds.min_width > self.bounds.max_width {
            anyhow::bail!(
                "min_width ({}) must not exceed max_width ({})",
                self.bounds.min_width,
                self.bounds.max_width
            );
        }

        if !self.render.aspect.is_finite() || self.render.aspect <= 0.0 {
            anyhow::bail!("aspect must be a positive number, got {}", self.render.aspect);
        }

        Ok(())
    }

    /// Build the immutable request handed to the renderer.
    pub fn render_options(&self) -> Result<RenderOptions> {
        let ramp = match &self.render.glyphs {
            Some(glyphs) => GlyphRamp::from_chars(glyphs)
                .with_context(|| format!("invalid custom glyph ramp {:?}", glyphs))?,
            None => self.render.ramp.ramp(),
        };

        Ok(RenderOptions {
            width: self.bounds.clamp(self.render.width),
            aspect: self.render.aspect,
            invert: self.render.invert,
            ramp,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();

        let options = settings.render_options().unwrap();
        assert_eq!(options.width, DEFAULT_WIDTH);
        assert_eq!(options.aspect, 0.5);
        assert_eq!(options.ramp, GlyphRamp::punctuation());
    }

    #[test]
    fn width_is_clamped_to_bounds() {
        let bounds = WidthBounds::default();
        assert_eq!(bounds.clamp(10), 30);
        assert_eq!(bounds.clamp(120), 120);
        assert_eq!(bounds.clamp(1000), 300);
    }

    #[test]
    fn custom_glyphs_override_preset() {
        let mut settings = Settings::default();
        settings.render.ramp = RampPreset::Alphanumeric;
        settings.render.glyphs = Some(" .#".to_string());
        assert_eq!(settings.render_options().unwrap().ramp, GlyphRamp::from_chars(" .#").unwrap());

        settings.render.glyphs = Some("#".to_string());
        assert!(settings.render_options().is_err());
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let mut settings = Settings::default();
        settings.bounds = WidthBounds { min_width: 200, max_width: 100 };
        assert!(settings.validate().is_err());

        settings.bounds = WidthBounds { min_width: 0, max_width: 100 };
        assert!(settings.validate().is_err());

        settings.bounds = WidthBounds::default();
        settings.render.aspect = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn loads_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[render]
width = 64
invert = true
ramp = "alphanumeric"

[bounds]
max_width = 120
"#
        )
        .unwrap();

        let no_env = environment().source(Some(config::Map::new()));
        let settings = Settings::load_with_env(Some(file.path()), no_env).unwrap();
        assert_eq!(settings.render.width, 64);
        assert!(settings.render.invert);
        assert_eq!(settings.render.ramp, RampPreset::Alphanumeric);
        assert_eq!(settings.render.aspect, DEFAULT_ASPECT);
        assert_eq!(settings.bounds, WidthBounds { min_width: 30, max_width: 120 });
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[render]\nwidth = 64\nglyphs = \" .#\"").unwrap();

        let vars: config::Map<String, String> = [
            ("PIXEL_ASCII_RENDER__WIDTH", "72"),
            ("PIXEL_ASCII_RENDER__GLYPHS", "0123456789"),
            ("PIXEL_ASCII_BOUNDS__MAX_WIDTH", "90"),
            ("UNRELATED__WIDTH", "1"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
        let env = environment().source(Some(vars));

        let settings = Settings::load_with_env(Some(file.path()), env).unwrap();
        assert_eq!(settings.render.width, 72);
        assert_eq!(settings.render.glyphs.as_deref(), Some("0123456789"));
        assert_eq!(settings.bounds.max_width, 90);

        let options = settings.render_options().unwrap();
        assert_eq!(options.ramp.len(), 10);
        assert_eq!(options.ramp.glyph(0), "0");
    }

    #[test]
    fn round_trips_through_toml() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        assert_eq!(toml::from_str::<Settings>(&text).unwrap(), settings);
    }
}
