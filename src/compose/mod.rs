//! Collage composition — pure Rust, one pass per invocation.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Grid sizing** | [`grid_dimensions`] (ceil-sqrt columns) |
//! | **Tile normalization** | center-crop + `image::imageops::resize` (Lanczos3) |
//! | **Framing & paste** | `image::imageops::replace` onto a white canvas |
//! | **Caption** | `rusttype` layout, measured bounding box centering |
//!
//! The module is split into:
//! - **Calculations**: pure functions for collage geometry (unit testable)
//! - **Parameters**: data structures describing one composition
//! - **Text**: glyph measurement and alpha-blended drawing
//! - **Composer**: [`compose`], combining the above into the finished canvas

pub mod calculations;
mod composer;
mod params;
pub mod text;

pub use calculations::{
    NOMINAL_PHOTO_INCHES, TileGeometry, center_crop_box, centered_offset, grid_dimensions,
    photo_px_for_dpi,
};
pub use composer::{ComposeError, compose};
pub use params::{
    Caption, CaptionPlacement, CollageParams, ColorParseError, JpegQuality, Rgb,
};
