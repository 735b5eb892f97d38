//! Pure calculation functions for collage geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Nominal physical edge of one polaroid photo, in inches.
///
/// The photo tile is rendered at `dpi * NOMINAL_PHOTO_INCHES` pixels, so
/// requesting a higher DPI yields proportionally higher-resolution tiles
/// rather than just different metadata. At the default 300 DPI this gives
/// a 300 px photo.
pub const NOMINAL_PHOTO_INCHES: f64 = 1.0;

/// Height of the caption band as a multiple of the half-border.
const CAPTION_BAND_HALF_BORDERS: u32 = 6;

/// Calculate grid dimensions for a photo count.
///
/// Favors a near-square grid: `columns = ceil(sqrt(n))`,
/// `rows = ceil(n / columns)`. For every `n >= 1` the result satisfies
/// `columns * rows >= n` and `columns * (rows - 1) < n` (no empty row).
///
/// # Examples
/// ```
/// # use polagrid::compose::grid_dimensions;
/// assert_eq!(grid_dimensions(1), (1, 1));
/// assert_eq!(grid_dimensions(4), (2, 2));
/// assert_eq!(grid_dimensions(5), (3, 2));
/// ```
pub fn grid_dimensions(count: usize) -> (u32, u32) {
    let columns = ((count as f64).sqrt().ceil() as u32).max(1);
    let rows = (count as u32).div_ceil(columns);
    (columns, rows)
}

/// Calculate the centered square crop box for an image.
///
/// The square side is the shorter of the two dimensions; the box is centered
/// along the longer axis (odd remainders leave the extra pixel on the
/// right/bottom).
///
/// # Returns
/// * `(left, top, side)`
pub fn center_crop_box(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    let left = (width - side) / 2;
    let top = (height - side) / 2;
    (left, top, side)
}

/// Calculate the photo tile edge in pixels for a given DPI.
///
/// Scales linearly with DPI (`pixel_size ∝ dpi`).
pub fn photo_px_for_dpi(dpi: u32) -> u32 {
    ((dpi as f64 * NOMINAL_PHOTO_INCHES).round() as u32).max(1)
}

/// Geometry of one polaroid tile and of the grid built from it.
///
/// Rounding convention: every half-border offset is `border_px / 2` with
/// integer division. An odd border therefore leaves the extra pixel on the
/// right and bottom edges of the photo within its frame — a documented quirk,
/// applied uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    /// Edge of the square photo inside the frame.
    pub photo_px: u32,
    /// Frame thickness around the photo.
    pub border_px: u32,
    /// Height of the reserved caption band below the photo (0 when
    /// captioning is disabled).
    pub band_px: u32,
}

impl TileGeometry {
    /// Build tile geometry. The caption band, `6 * (border_px / 2)` tall, is
    /// reserved whenever captioning is enabled so that all tiles share the
    /// same height whether or not text is ultimately drawn in them.
    pub fn new(photo_px: u32, border_px: u32, caption_enabled: bool) -> Self {
        let band_px = if caption_enabled {
            CAPTION_BAND_HALF_BORDERS * (border_px / 2)
        } else {
            0
        };
        Self {
            photo_px,
            border_px,
            band_px,
        }
    }

    /// Offset of the photo from the frame's top-left corner.
    pub fn photo_offset(&self) -> u32 {
        self.border_px / 2
    }

    /// Width of the framed tile.
    pub fn frame_width(&self) -> u32 {
        self.photo_px + self.border_px
    }

    /// Height of the framed tile, including the reserved caption band.
    pub fn frame_height(&self) -> u32 {
        self.photo_px + self.border_px + self.band_px
    }

    /// Top edge of the caption band within the frame.
    pub fn band_top(&self) -> u32 {
        self.photo_px + self.border_px
    }

    /// Horizontal step between tile origins (frame plus one border of gap).
    pub fn step_x(&self) -> u32 {
        self.frame_width() + self.border_px
    }

    /// Vertical step between tile origins.
    pub fn step_y(&self) -> u32 {
        self.frame_height() + self.border_px
    }

    /// Canvas position of the tile at `(column, row)`: one border of outer
    /// margin, tiles separated by one border of gap.
    pub fn tile_position(&self, column: u32, row: u32) -> (u32, u32) {
        (
            self.border_px + column * self.step_x(),
            self.border_px + row * self.step_y(),
        )
    }

    /// Canvas dimensions for a grid of tiles.
    ///
    /// `shared_band` appends one extra caption band across the full width at
    /// the bottom (used when the caption is collage-wide rather than
    /// per-tile).
    pub fn canvas_size(&self, columns: u32, rows: u32, shared_band: bool) -> (u32, u32) {
        let width = columns * self.step_x() + self.border_px;
        let mut height = rows * self.step_y() + self.border_px;
        if shared_band {
            height += self.band_px;
        }
        (width, height)
    }
}

/// Horizontal offset that centers content of `content` width inside a
/// container of `container` width. Content wider than the container is
/// anchored at the left edge rather than clipped on both sides.
pub fn centered_offset(container: u32, content: u32) -> u32 {
    container.saturating_sub(content) / 2
}
