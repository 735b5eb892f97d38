//! Collage configuration module.
//!
//! Handles loading and validating `config.toml`. Configuration is sparse:
//! stock defaults (matching the classic polaroid look) are overridden by the
//! user's file, and CLI flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]
//! border_px = 20            # Frame thickness around each photo (px)
//! dpi = 300                 # Print resolution; scales tile size and is
//!                           # embedded as output metadata
//!
//! [caption]
//! text = ""                 # Empty = no caption, no caption band
//! font_size = 50            # Caption size in pixels
//! color = "#000000"         # Caption color as #rrggbb
//! placement = "per-tile"    # "per-tile" or "shared"
//!
//! [font]
//! family = "Reenie Beanie"  # Display name, file path, or http(s) URL
//! dir = "fonts"             # Directory searched for named fonts
//!
//! [output]
//! path = "collage.jpg"      # .jpg/.jpeg or .png
//! quality = 90              # JPEG quality (1-100); ignored for PNG
//! ```
//!
//! Degenerate geometry (zero DPI, absurd borders) is rejected here, at the
//! configuration boundary — the composer assumes validated parameters.
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::compose::{Caption, CaptionPlacement, CollageParams, Rgb};
use crate::font::FontSource;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Collage configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollageConfig {
    /// Frame and resolution settings.
    pub layout: LayoutConfig,
    /// Caption text and styling.
    pub caption: CaptionConfig,
    /// Caption font selection.
    pub font: FontConfig,
    /// Output file settings.
    pub output: OutputConfig,
}

/// Frame and resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Frame thickness around each photo, in pixels.
    pub border_px: u32,
    /// Print resolution. Scales the photo tile size linearly and is embedded
    /// as output metadata.
    pub dpi: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            border_px: 20,
            dpi: 300,
        }
    }
}

/// Caption text and styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    /// Caption text; empty means no caption and no caption band.
    pub text: String,
    /// Caption size in pixels.
    pub font_size: u32,
    /// Caption color as `#rrggbb`.
    pub color: String,
    /// Whether the caption repeats in every tile or spans the collage once.
    pub placement: CaptionPlacement,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 50,
            color: "#000000".to_string(),
            placement: CaptionPlacement::PerTile,
        }
    }
}

/// Caption font selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Font reference: a display name resolved in `dir`, a `.ttf`/`.otf`
    /// path, or an `http(s)` URL.
    pub family: String,
    /// Directory searched for named fonts.
    pub dir: PathBuf,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Reenie Beanie".to_string(),
            dir: PathBuf::from("fonts"),
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output path; the extension picks the format (`.jpg`/`.jpeg`/`.png`).
    pub path: PathBuf,
    /// JPEG quality (1-100); ignored for PNG.
    pub quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("collage.jpg"),
            quality: 90,
        }
    }
}

impl CollageConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: CollageConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.dpi == 0 || self.layout.dpi > 2400 {
            return Err(ConfigError::Validation("layout.dpi must be 1-2400".into()));
        }
        if self.layout.border_px > 1000 {
            return Err(ConfigError::Validation(
                "layout.border_px must be 0-1000".into(),
            ));
        }
        if self.caption.font_size == 0 || self.caption.font_size > 600 {
            return Err(ConfigError::Validation(
                "caption.font_size must be 1-600".into(),
            ));
        }
        if self.output.quality == 0 || self.output.quality > 100 {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if Rgb::from_hex(&self.caption.color).is_err() {
            return Err(ConfigError::Validation(format!(
                "caption.color {:?} is not #rrggbb",
                self.caption.color
            )));
        }
        Ok(())
    }

    /// Build composer parameters from the validated config.
    pub fn params(&self) -> Result<CollageParams, ConfigError> {
        let color =
            Rgb::from_hex(&self.caption.color).map_err(|e| ConfigError::Validation(e.to_string()))?;
        let caption = Caption::new(
            &self.caption.text,
            self.caption.font_size,
            color,
            self.caption.placement,
        );
        Ok(CollageParams::new(
            self.layout.border_px,
            self.layout.dpi,
            caption,
        ))
    }

    /// The font source the caption resolves against.
    pub fn font_source(&self) -> FontSource {
        FontSource::from_reference(&self.font.family, &self.font.dir)
    }
}

/// A fully documented stock config file, printed by `gen-config`.
pub fn stock_config_toml() -> String {
    r##"# polagrid configuration
# All options are optional - the values below are the defaults.

[layout]
# Frame thickness around each photo, in pixels.
border_px = 20
# Print resolution. Scales the photo tile size linearly and is embedded
# as JPEG/PNG resolution metadata.
dpi = 300

[caption]
# Caption text. Empty = no caption (and no caption band is reserved).
text = ""
# Caption size in pixels.
font_size = 50
# Caption color as #rrggbb.
color = "#000000"
# "per-tile" repeats the caption under every photo (the classic polaroid
# look); "shared" draws it once, centered below the whole grid.
placement = "per-tile"

[font]
# Display name resolved inside `dir` (e.g. "Reenie Beanie" finds
# fonts/ReenieBeanie-Regular.ttf), a .ttf/.otf path, or an http(s) URL.
family = "Reenie Beanie"
dir = "fonts"

[output]
# Output path; extension picks the format (.jpg/.jpeg or .png).
path = "collage.jpg"
# JPEG quality (1-100); ignored for PNG.
quality = 90
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_look() {
        let config = CollageConfig::default();
        assert_eq!(config.layout.border_px, 20);
        assert_eq!(config.layout.dpi, 300);
        assert_eq!(config.caption.font_size, 50);
        assert_eq!(config.caption.placement, CaptionPlacement::PerTile);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let parsed: CollageConfig = toml::from_str(&stock_config_toml()).unwrap();
        assert_eq!(
            parsed.layout.border_px,
            CollageConfig::default().layout.border_px
        );
        assert_eq!(parsed.output.quality, 90);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn sparse_override_keeps_other_defaults() {
        let config: CollageConfig = toml::from_str("[layout]\nborder_px = 40\n").unwrap();
        assert_eq!(config.layout.border_px, 40);
        assert_eq!(config.layout.dpi, 300);
        assert_eq!(config.caption.font_size, 50);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<CollageConfig, _> = toml::from_str("[layout]\nborder = 40\n");
        assert!(result.is_err());
    }

    #[test]
    fn zero_dpi_fails_validation() {
        let config: CollageConfig = toml::from_str("[layout]\ndpi = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("dpi")
        ));
    }

    #[test]
    fn bad_color_fails_validation() {
        let config: CollageConfig = toml::from_str("[caption]\ncolor = \"red\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn params_with_empty_text_have_no_caption() {
        let params = CollageConfig::default().params().unwrap();
        assert!(params.caption.is_none());
        assert_eq!(params.border_px, 20);
        assert_eq!(params.dpi, 300);
    }

    #[test]
    fn params_carry_caption_and_parsed_color() {
        let config: CollageConfig =
            toml::from_str("[caption]\ntext = \"Summer\"\ncolor = \"#112233\"\n").unwrap();
        let params = config.params().unwrap();
        let caption = params.caption.unwrap();
        assert_eq!(caption.text, "Summer");
        assert_eq!(
            caption.color,
            Rgb {
                r: 0x11,
                g: 0x22,
                b: 0x33
            }
        );
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = CollageConfig::load(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_roundtrip_through_tempfile() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[layout]\ndpi = 150\n[output]\npath = \"out.png\"\n").unwrap();

        let config = CollageConfig::load(&path).unwrap();
        assert_eq!(config.layout.dpi, 150);
        assert_eq!(config.output.path, PathBuf::from("out.png"));
    }
}
