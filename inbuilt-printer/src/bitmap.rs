//! Bitmap processing
//!
//! Turns base64 encoded images into 1-bit raster data for `GS v 0`.

use base64::Engine;
use image::{DynamicImage, GenericImageView};
use tracing::{debug, instrument};

use crate::error::{PrintError, PrintResult};

/// Monochrome raster ready for [`EscPosBuilder::raster`](crate::EscPosBuilder::raster)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width_bytes: u16,
    pub height: u16,
    pub data: Vec<u8>,
}

/// Decode a base64 image and rasterize it to at most `max_width` dots
#[instrument(skip(encoded), fields(encoded_len = encoded.len()))]
pub fn decode_bitmap(encoded: &str, max_width: u32) -> PrintResult<Raster> {
    // Accept data URLs as produced by web/mobile front ends
    let payload = encoded
        .split_once("base64,")
        .map(|(_, data)| data)
        .unwrap_or(encoded)
        .trim();

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| PrintError::InvalidArgument(format!("bitmap is not valid base64: {}", e)))?;

    let img = image::load_from_memory(&bytes)
        .map_err(|e| PrintError::InvalidArgument(format!("bitmap decode failed: {}", e)))?;

    debug!(dimensions = ?img.dimensions(), "bitmap decoded");
    Ok(rasterize(&img, max_width))
}

/// Convert an image to a 1-bit raster
///
/// The image is:
/// - Resized to fit `max_width` dots (aspect ratio kept)
/// - Converted to 1-bit monochrome (transparent pixels are white)
pub fn rasterize(img: &DynamicImage, max_width: u32) -> Raster {
    let (w, h) = img.dimensions();
    let max_width = max_width.max(1);

    let (new_w, new_h) = if w > max_width {
        let ratio = max_width as f64 / w as f64;
        (max_width, ((h as f64 * ratio) as u32).max(1))
    } else {
        (w.max(1), h.max(1))
    };
    let new_h = new_h.min(u16::MAX as u32);

    let resized = img.resize_exact(new_w, new_h, image::imageops::FilterType::Nearest);
    let rgba = resized.to_rgba8();

    let x_bytes = new_w.div_ceil(8);
    let mut data = Vec::with_capacity((x_bytes * new_h) as usize);

    for y in 0..new_h {
        for x_byte in 0..x_bytes {
            let mut byte = 0u8;
            for bit in 0..8 {
                let x = x_byte * 8 + bit;
                if x < new_w {
                    let pixel = rgba.get_pixel(x, y);
                    if pixel[3] >= 128 {
                        let luma = (0.299 * pixel[0] as f32
                            + 0.587 * pixel[1] as f32
                            + 0.114 * pixel[2] as f32) as u8;
                        if luma < 128 {
                            byte |= 1 << (7 - bit);
                        }
                    }
                }
            }
            data.push(byte);
        }
    }

    Raster {
        width_bytes: x_bytes as u16,
        height: new_h as u16,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checker(w: u32, h: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(w, h, |x, _| {
            if x % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_rasterize_bits() {
        let raster = rasterize(&checker(10, 2), 384);
        assert_eq!(raster.width_bytes, 2);
        assert_eq!(raster.height, 2);
        // columns 0,2,4,6 black -> 0b1010_1010; column 8 black -> 0b1000_0000
        assert_eq!(raster.data, vec![0xAA, 0x80, 0xAA, 0x80]);
    }

    #[test]
    fn test_rasterize_scales_down() {
        let raster = rasterize(&checker(800, 100), 384);
        assert_eq!(raster.width_bytes, 48);
        assert_eq!(raster.height, 48);
    }

    #[test]
    fn test_transparent_is_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 1, Rgba([0, 0, 0, 0])));
        assert_eq!(rasterize(&img, 384).data, vec![0x00]);
    }

    #[test]
    fn test_decode_bitmap_rejects_garbage() {
        assert!(matches!(
            decode_bitmap("not base64 !!", 384),
            Err(PrintError::InvalidArgument(_))
        ));
    }
}
