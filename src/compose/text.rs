//! Glyph measurement and rasterization for captions.
//!
//! Centering is always based on the measured ink bounding box of the laid-out
//! string — never on a fixed glyph advance — so handwriting fonts with wild
//! side bearings still land visually centered.

use image::RgbImage;
use rusttype::{Font, Point, Scale};

use super::params::Rgb;

/// Ink bounding box of a laid-out string.
///
/// `min_x`/`min_y` are the box's offset from the layout origin (baseline at
/// the font's ascent), so a caller can place the *ink* rather than the
/// typographic origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
    min_x: i32,
    min_y: i32,
}

impl TextExtent {
    /// Zero extent for strings with no visible ink.
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            min_x: 0,
            min_y: 0,
        }
    }
}

fn layout_origin(font: &Font, scale: Scale) -> Point<f32> {
    rusttype::point(0.0, font.v_metrics(scale).ascent)
}

/// Measure the pixel bounding box of `text` at `font_size`.
pub fn measure(font: &Font, font_size: u32, text: &str) -> TextExtent {
    let scale = Scale::uniform(font_size as f32);
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;

    for glyph in font.layout(text, scale, layout_origin(font, scale)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            min_x = min_x.min(bb.min.x);
            min_y = min_y.min(bb.min.y);
            max_x = max_x.max(bb.max.x);
            max_y = max_y.max(bb.max.y);
        }
    }

    if min_x > max_x {
        return TextExtent::empty();
    }
    TextExtent {
        width: (max_x - min_x) as u32,
        height: (max_y - min_y) as u32,
        min_x,
        min_y,
    }
}

/// Draw `text` so that its ink bounding box's top-left corner lands at
/// `(x, y)`. Glyph coverage is alpha-blended over the existing pixels;
/// out-of-bounds fragments are clipped.
pub fn draw(
    canvas: &mut RgbImage,
    font: &Font,
    font_size: u32,
    text: &str,
    x: i32,
    y: i32,
    color: Rgb,
) {
    let extent = measure(font, font_size, text);
    if extent.width == 0 {
        return;
    }

    let scale = Scale::uniform(font_size as f32);
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);

    for glyph in font.layout(text, scale, layout_origin(font, scale)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = x + (bb.min.x - extent.min_x) + gx as i32;
                let py = y + (bb.min.y - extent.min_y) + gy as i32;
                if px < 0 || py < 0 || px >= width || py >= height {
                    return;
                }
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                blend(pixel, color, coverage);
            });
        }
    }
}

/// Blend `color` over `base` with the given coverage (0.0..=1.0).
fn blend(base: &mut image::Rgb<u8>, color: Rgb, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    let mix = |over: u8, under: u8| {
        (over as f32 * alpha + under as f32 * inv)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    base.0 = [
        mix(color.r, base.0[0]),
        mix(color.g, base.0[1]),
        mix(color.b, base.0[2]),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_font() -> Font<'static> {
        let bytes = std::fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/DejaVuSans.ttf"
        ))
        .expect("fixture font present");
        Font::try_from_vec(bytes).expect("fixture font parses")
    }

    #[test]
    fn measure_empty_string_is_zero() {
        let font = fixture_font();
        let extent = measure(&font, 20, "");
        assert_eq!(extent.width, 0);
        assert_eq!(extent.height, 0);
    }

    #[test]
    fn measure_larger_size_is_wider() {
        let font = fixture_font();
        let small = measure(&font, 12, "Hello");
        let large = measure(&font, 48, "Hello");
        assert!(large.width > small.width);
        assert!(large.height > small.height);
    }

    #[test]
    fn draw_places_ink_at_requested_origin() {
        let font = fixture_font();
        let extent = measure(&font, 24, "Hi");
        let mut canvas = RgbImage::from_pixel(200, 100, image::Rgb([255, 255, 255]));

        draw(&mut canvas, &font, 24, "Hi", 40, 30, Rgb::BLACK);

        // Find the rendered ink bounding box
        let mut min = (u32::MAX, u32::MAX);
        let mut max = (0u32, 0u32);
        for (x, y, p) in canvas.enumerate_pixels() {
            if p.0 != [255, 255, 255] {
                min = (min.0.min(x), min.1.min(y));
                max = (max.0.max(x), max.1.max(y));
            }
        }
        assert!(min.0 <= max.0, "nothing was drawn");
        // Anti-aliasing can shave the faintest edge pixel; allow 1 px slack.
        assert!(min.0.abs_diff(40) <= 1, "left edge at {}", min.0);
        assert!(min.1.abs_diff(30) <= 1, "top edge at {}", min.1);
        assert!((max.0 - min.0 + 1).abs_diff(extent.width) <= 2);
        assert!((max.1 - min.1 + 1).abs_diff(extent.height) <= 2);
    }

    #[test]
    fn blend_full_coverage_replaces_pixel() {
        let mut pixel = image::Rgb([255u8, 255, 255]);
        blend(&mut pixel, Rgb { r: 10, g: 20, b: 30 }, 1.0);
        assert_eq!(pixel.0, [10, 20, 30]);
    }

    #[test]
    fn blend_zero_coverage_is_noop() {
        let mut pixel = image::Rgb([1u8, 2, 3]);
        blend(&mut pixel, Rgb::WHITE, 0.0);
        assert_eq!(pixel.0, [1, 2, 3]);
    }
}
