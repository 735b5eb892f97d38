//! Output encoding with embedded resolution metadata.
//!
//! The composed canvas is encoded to JPEG or PNG (picked from the output
//! extension), then the configured DPI is embedded directly in the container
//! bytes: JFIF APP0 pixel density for JPEG, a `pHYs` chunk for PNG. The
//! `image` crate's encoders don't expose density, so the segment/chunk is
//! written by hand — a handful of well-specified bytes in each format.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::compose::JpegQuality;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("unsupported output format: {0:?} (use .jpg or .png)")]
    UnsupportedFormat(String),
}

/// Output raster format, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, EncodeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(EncodeError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Encode a canvas, embedding `dpi` as horizontal and vertical resolution
/// metadata.
pub fn encode_with_dpi(
    canvas: &RgbImage,
    format: OutputFormat,
    quality: JpegQuality,
    dpi: u32,
) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buffer, quality.value()).write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgb8,
            )?;
            set_jfif_density(&mut buffer, dpi);
        }
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer).write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgb8,
            )?;
            insert_phys_chunk(&mut buffer, dpi);
        }
    }
    Ok(buffer)
}

/// Encode a canvas and write it to `path` (format from the extension).
/// Returns the encoded bytes so the caller can also hand them out as a
/// download buffer.
pub fn write_collage(
    canvas: &RgbImage,
    path: &Path,
    quality: JpegQuality,
    dpi: u32,
) -> Result<Vec<u8>, EncodeError> {
    let format = OutputFormat::from_path(path)?;
    let bytes = encode_with_dpi(canvas, format, quality, dpi)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    Ok(bytes)
}

/// Set the pixel density in a JPEG's JFIF APP0 segment, inserting the
/// segment after SOI if the encoder didn't write one.
///
/// JFIF APP0 layout after SOI: `FF E0 | len(2) | "JFIF\0" | version(2) |
/// units(1) | Xdensity(2) | Ydensity(2) | thumb(2)`. Units 1 = dots per inch.
fn set_jfif_density(jpeg: &mut Vec<u8>, dpi: u32) {
    let dpi = dpi.min(u16::MAX as u32) as u16;
    let [hi, lo] = dpi.to_be_bytes();

    let has_jfif_app0 = jpeg.len() >= 18
        && jpeg[..2] == [0xFF, 0xD8]
        && jpeg[2..4] == [0xFF, 0xE0]
        && &jpeg[6..11] == b"JFIF\0";

    if has_jfif_app0 {
        jpeg[13] = 1; // units: dots per inch
        jpeg[14] = hi;
        jpeg[15] = lo;
        jpeg[16] = hi;
        jpeg[17] = lo;
        return;
    }
    if jpeg.len() < 2 || jpeg[..2] != [0xFF, 0xD8] {
        return;
    }
    #[rustfmt::skip]
    let app0 = [
        0xFF, 0xE0, 0x00, 0x10,             // marker, length 16
        b'J', b'F', b'I', b'F', 0x00,
        0x01, 0x02,                         // version 1.02
        0x01, hi, lo, hi, lo,               // dpi units + densities
        0x00, 0x00,                         // no thumbnail
    ];
    let _ = jpeg.splice(2..2, app0);
}

/// Insert a `pHYs` chunk (pixels per meter) before the first IDAT chunk.
fn insert_phys_chunk(png: &mut Vec<u8>, dpi: u32) {
    const SIGNATURE_LEN: usize = 8;
    let ppm = (dpi as f64 / 0.0254).round() as u32;

    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(b"pHYs");
    data.extend_from_slice(&ppm.to_be_bytes());
    data.extend_from_slice(&ppm.to_be_bytes());
    data.push(1); // unit: meter

    let mut chunk = Vec::with_capacity(25);
    chunk.extend_from_slice(&9u32.to_be_bytes());
    chunk.extend_from_slice(&data);
    chunk.extend_from_slice(&crc32(&data).to_be_bytes());

    // Walk chunks to find the first IDAT
    let mut pos = SIGNATURE_LEN;
    while pos + 8 <= png.len() {
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        let chunk_type = &png[pos + 4..pos + 8];
        if chunk_type == b"IDAT" {
            let _ = png.splice(pos..pos, chunk);
            return;
        }
        pos += 12 + len; // length + type + data + crc
    }
}

/// CRC-32 (ISO 3309 / PNG), bitwise with the reflected polynomial.
fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    !crc
}
