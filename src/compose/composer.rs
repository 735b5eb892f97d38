//! The collage composer.
//!
//! A single-pass, single-invocation transformation: decoded images in,
//! finished canvas out. All layout arithmetic lives in
//! [`calculations`](super::calculations); this module owns the pixel work
//! (crop, resize, paste, caption draw).
//!
//! The composer never produces partial output: it returns either a complete
//! canvas or an error. Font resolution happens *before* composition (see
//! [`crate::font`]); a caption without a font is rejected up front rather
//! than silently substituted.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use rusttype::Font;
use thiserror::Error;

use super::calculations::{
    TileGeometry, center_crop_box, centered_offset, grid_dimensions, photo_px_for_dpi,
};
use super::params::{Caption, CaptionPlacement, CollageParams, Rgb};
use super::text;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("no images supplied: a collage needs at least one photo")]
    EmptyInput,
    #[error("a caption was requested but no font was provided")]
    FontMissing,
}

/// Compose a polaroid grid collage from decoded images.
///
/// `font` is required whenever `params.caption` is set; pass `None` for
/// caption-less collages. The images are read-only; each call builds its own
/// canvas and tile buffers.
pub fn compose(
    images: &[DynamicImage],
    params: &CollageParams,
    font: Option<&Font>,
) -> Result<RgbImage, ComposeError> {
    if images.is_empty() {
        return Err(ComposeError::EmptyInput);
    }
    let caption = params.caption.as_ref();
    let font = match (caption, font) {
        (Some(_), None) => return Err(ComposeError::FontMissing),
        (_, f) => f,
    };

    let (columns, rows) = grid_dimensions(images.len());
    let photo_px = photo_px_for_dpi(params.dpi);
    let per_tile = caption.is_some_and(|c| c.placement == CaptionPlacement::PerTile);
    let shared = caption.is_some_and(|c| c.placement == CaptionPlacement::Shared);
    let geom = TileGeometry::new(photo_px, params.border_px, per_tile || shared);

    let (canvas_w, canvas_h) = geom.canvas_size(columns, rows, shared);
    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, Rgb::WHITE.into());

    for (index, image) in images.iter().enumerate() {
        let photo = normalize_tile(image, photo_px);
        let tile_caption = if per_tile { caption.zip(font) } else { None };
        let tile = frame_tile(&photo, &geom, tile_caption);

        let column = index as u32 % columns;
        let row = index as u32 / columns;
        let (x, y) = geom.tile_position(column, row);
        imageops::replace(&mut canvas, &tile, x as i64, y as i64);
    }

    if shared {
        if let Some((caption, font)) = caption.zip(font) {
            let band_top = rows * geom.step_y() + params.border_px;
            draw_caption_in_band(&mut canvas, caption, font, 0, band_top, canvas_w, geom.band_px);
        }
    }

    Ok(canvas)
}

/// Center-crop a source image to a square and resize it to the tile size.
///
/// Already-square sources skip the crop entirely (content no-op), and an
/// already-`photo_px` square skips the resize too.
fn normalize_tile(image: &DynamicImage, photo_px: u32) -> RgbImage {
    let (width, height) = (image.width(), image.height());
    let (left, top, side) = center_crop_box(width, height);

    let square = if side == width && side == height {
        image.to_rgb8()
    } else {
        image.crop_imm(left, top, side, side).to_rgb8()
    };
    if side == photo_px {
        return square;
    }
    imageops::resize(&square, photo_px, photo_px, FilterType::Lanczos3)
}

/// Paste a normalized photo onto its white frame, drawing the per-tile
/// caption into the reserved band when one is given.
fn frame_tile(photo: &RgbImage, geom: &TileGeometry, caption: Option<(&Caption, &Font)>) -> RgbImage {
    let mut tile = RgbImage::from_pixel(
        geom.frame_width(),
        geom.frame_height(),
        Rgb::WHITE.into(),
    );
    let offset = geom.photo_offset() as i64;
    imageops::replace(&mut tile, photo, offset, offset);

    if let Some((caption, font)) = caption {
        draw_caption_in_band(
            &mut tile,
            caption,
            font,
            0,
            geom.band_top(),
            geom.frame_width(),
            geom.band_px,
        );
    }
    tile
}

/// Draw a caption centered in a band, both axes derived from the measured
/// text bounding box.
fn draw_caption_in_band(
    canvas: &mut RgbImage,
    caption: &Caption,
    font: &Font,
    band_x: u32,
    band_y: u32,
    band_w: u32,
    band_h: u32,
) {
    if band_h == 0 {
        return;
    }
    let extent = text::measure(font, caption.font_size, &caption.text);
    let x = band_x + centered_offset(band_w, extent.width);
    let y = band_y + centered_offset(band_h, extent.height);
    text::draw(
        canvas,
        font,
        caption.font_size,
        &caption.text,
        x as i32,
        y as i32,
        caption.color,
    );
}
