//! # polagrid
//!
//! A polaroid-style photo collage composer. Feed it a handful of images and
//! layout parameters (border thickness, DPI, caption text/font/color) and it
//! produces one collage raster: each photo center-cropped to a square,
//! wrapped in a white instant-film frame, tiled into a near-square grid,
//! with an optional handwritten-style caption.
//!
//! # Architecture: One Pure Composition
//!
//! The composer is a single-pass transformation with no persistent state —
//! every invocation recomputes the collage from scratch:
//!
//! ```text
//! 1. Resolve   font reference  →  Font           (cache: fetch/read once)
//! 2. Compose   images + params →  RgbImage       (pure, in-memory)
//! 3. Encode    canvas          →  JPEG/PNG bytes (DPI metadata embedded)
//! ```
//!
//! Fonts are resolved *before* composition: a missing or unparsable font is
//! an error up front, never a silently substituted fallback. The composer
//! returns either a complete canvas or an error — no partial output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compose`] | Layout math, tile normalization, framing, grid paste, caption rendering |
//! | [`font`] | Font resolution (named/path/URL) with a fetch-once byte cache |
//! | [`encode`] | JPEG/PNG encoding with hand-written DPI metadata (JFIF density, pHYs) |
//! | [`config`] | `config.toml` loading, validation, stock config generation |
//!
//! # Design Decisions
//!
//! ## Pure-Rust Imaging and Text
//!
//! Pixel work uses the `image` crate (Lanczos3 resampling) and `rusttype`
//! for caption glyphs — both pure Rust, statically linked. No ImageMagick,
//! no system freetype.
//!
//! ## One Rounding Convention
//!
//! Every half-border offset is `border_px / 2` with integer division; odd
//! borders leave the extra pixel on the right/bottom. See
//! [`compose::TileGeometry`].
//!
//! ## Geometry Before Pixels
//!
//! All collage arithmetic lives in [`compose::calculations`] as pure
//! functions over integers, unit-tested without decoding a single image.
//! The composer only applies that geometry with crop/resize/paste calls.

pub mod compose;
pub mod config;
pub mod encode;
pub mod font;
