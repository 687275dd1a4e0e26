//! # Atkinson Error Diffusion
//!
//! This module converts photos to the 1-bit bitmaps the printer takes.
//!
//! ## Pipeline
//!
//! 1. Resize to the target width with Lanczos3, keeping the aspect ratio
//! 2. Convert to 8-bit luma
//! 3. Atkinson dithering
//! 4. Pack rows MSB first (see [`pack_row`])
//!
//! ## Atkinson Dithering
//!
//! Each pixel is thresholded at 50% gray, and the quantization error is
//! spread to six neighbours, 1/8 each:
//!
//! ```text
//!           X   1/8 1/8
//!      1/8 1/8 1/8
//!          1/8
//! ```
//!
//! Only 6/8 of the error is passed on. The lost quarter keeps highlights and
//! shadows clean, which suits thermal paper where a stray dot in a white
//! area is very visible.
//!
//! ## Usage Example
//!
//! ```
//! use image::{DynamicImage, GrayImage, Luma};
//! use thermalprinter::render::dither;
//!
//! let gray = GrayImage::from_pixel(64, 32, Luma([0u8]));
//! let bitmap = dither::image_to_bitmap(&DynamicImage::ImageLuma8(gray), 32)?;
//! assert_eq!((bitmap.width, bitmap.height), (32, 16));
//! assert!(bitmap.data.iter().all(|&b| b == 0xFF));
//! # Ok::<(), thermalprinter::PrinterError>(())
//! ```

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;

use crate::error::PrinterError;
use crate::printer::Bitmap;
use crate::protocol::graphics::MAX_WIDTH_DOTS;

/// Luma at or above which a pixel stays white
pub const THRESHOLD: i16 = 128;

/// Neighbour offsets (dx, dy) receiving 1/8 of the error each
const ATKINSON: [(isize, usize); 6] = [(1, 0), (2, 0), (-1, 1), (0, 1), (1, 1), (0, 2)];

/// Pack a row of boolean pixel values into bytes.
///
/// - Bit 7 (MSB) = leftmost pixel
/// - 1 = black (print dot), 0 = white
///
/// A row that isn't a multiple of 8 is padded with white on the right.
///
/// ```
/// use thermalprinter::render::dither::pack_row;
///
/// let row = vec![true, true, false, false, true, false, true, false];
/// assert_eq!(pack_row(&row), vec![0xCA]);
///
/// assert_eq!(pack_row(&[true; 12]), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];
    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 0x80 >> (i % 8);
        }
    }
    bytes
}

/// Dither 8-bit luma values (row-major, 255 = white) to black/white.
///
/// Returns one bool per pixel, `true` for black.
pub fn atkinson(luma: &[u8], width: usize, height: usize) -> Vec<bool> {
    let mut levels: Vec<i16> = luma.iter().map(|&v| i16::from(v)).collect();
    levels.resize(width * height, 255);
    let mut out = vec![false; width * height];

    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            let old = levels[i];
            let (black, new) = if old < THRESHOLD { (true, 0) } else { (false, 255) };
            out[i] = black;

            let share = (old - new) / 8;
            if share == 0 {
                continue;
            }
            for (dx, dy) in ATKINSON {
                let Some(nx) = x.checked_add_signed(dx) else {
                    continue;
                };
                let ny = y + dy;
                if nx < width && ny < height {
                    levels[ny * width + nx] += share;
                }
            }
        }
    }
    out
}

/// Resize, dither and pack an image for printing.
///
/// `width` is capped at the 384-dot head width. The height follows the
/// source aspect ratio.
pub fn image_to_bitmap(image: &DynamicImage, width: usize) -> Result<Bitmap, PrinterError> {
    let width = width.clamp(1, MAX_WIDTH_DOTS);
    if image.width() == 0 || image.height() == 0 {
        return Err(PrinterError::Image("image has no pixels".to_string()));
    }

    let height = ((image.height() as f64 * width as f64 / image.width() as f64).round() as u32).max(1);
    let gray = image
        .resize_exact(width as u32, height, FilterType::Lanczos3)
        .to_luma8();
    let (w, h) = (gray.width() as usize, gray.height() as usize);

    let pixels = atkinson(gray.as_raw(), w, h);
    let data: Vec<u8> = pixels.chunks(w).flat_map(pack_row).collect();
    Bitmap::new(w, h, data)
}

/// Open an image file and convert it with [`image_to_bitmap`].
pub fn load_bitmap<P: AsRef<Path>>(path: P, width: usize) -> Result<Bitmap, PrinterError> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|e| PrinterError::Image(format!("Failed to open {}: {}", path.display(), e)))?;
    image_to_bitmap(&image, width)
}

// ============================================================================
// TESTS
// ============================================================================
