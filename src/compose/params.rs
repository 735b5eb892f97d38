//! Parameter types for collage composition.
//!
//! These structs describe *what* to compose, not *how*. They are the
//! interface between the configuration boundary (CLI flags + `config.toml`,
//! where ranges are clamped and colors parsed) and the
//! [`composer`](super::composer), which assumes its inputs are already valid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid color {0:?}: expected #rrggbb")]
pub struct ColorParseError(pub String);

/// An RGB color, parsed from `#rrggbb` hex notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let parse = |range| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Rgb {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

impl std::str::FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

/// Where the caption is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptionPlacement {
    /// The caption is repeated in every tile's reserved band (the classic
    /// polaroid look).
    #[default]
    PerTile,
    /// One caption centered in a single band appended below the grid.
    Shared,
}

/// A caption to render. Construction rejects empty text — "no caption" is
/// modeled as `Option<Caption>::None`, never as an empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    /// Font size in pixels (> 0, clamped at the config boundary).
    pub font_size: u32,
    pub color: Rgb,
    pub placement: CaptionPlacement,
}

impl Caption {
    /// Build a caption, or `None` for empty/whitespace text.
    pub fn new(text: &str, font_size: u32, color: Rgb, placement: CaptionPlacement) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            font_size: font_size.max(1),
            color,
            placement,
        })
    }
}

/// Layout parameters for one composition. Immutable once built; the composer
/// never reads configuration from anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct CollageParams {
    /// Frame thickness around each photo, in pixels.
    pub border_px: u32,
    /// Print resolution. Scales the photo tile size and is embedded as
    /// output metadata.
    pub dpi: u32,
    pub caption: Option<Caption>,
}

impl CollageParams {
    pub fn new(border_px: u32, dpi: u32, caption: Option<Caption>) -> Self {
        Self {
            border_px,
            dpi: dpi.max(1),
            caption,
        }
    }
}

/// Quality setting for JPEG encoding (1-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegQuality(u8);

impl JpegQuality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self(90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_parses_hex_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#ff8000"), Ok(Rgb { r: 255, g: 128, b: 0 }));
        assert_eq!(Rgb::from_hex("000000"), Ok(Rgb::BLACK));
    }

    #[test]
    fn rgb_rejects_malformed_hex() {
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn caption_empty_text_is_none() {
        assert_eq!(
            Caption::new("", 50, Rgb::BLACK, CaptionPlacement::PerTile),
            None
        );
        assert_eq!(
            Caption::new("   ", 50, Rgb::BLACK, CaptionPlacement::PerTile),
            None
        );
    }

    #[test]
    fn caption_clamps_zero_font_size() {
        let c = Caption::new("Hi", 0, Rgb::BLACK, CaptionPlacement::PerTile).unwrap();
        assert_eq!(c.font_size, 1);
    }

    #[test]
    fn params_clamp_zero_dpi() {
        let p = CollageParams::new(20, 0, None);
        assert_eq!(p.dpi, 1);
    }

    #[test]
    fn jpeg_quality_clamps_to_valid_range() {
        assert_eq!(JpegQuality::new(0).value(), 1);
        assert_eq!(JpegQuality::new(90).value(), 90);
        assert_eq!(JpegQuality::new(255).value(), 100);
    }
}
