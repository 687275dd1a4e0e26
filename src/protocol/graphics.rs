//! # Raster Graphics Commands
//!
//! This module implements the raster bit image command and the geometry
//! limits that govern how bitmaps are split into chunks.
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ## Print Head Limits
//!
//! | Property | Value |
//! |----------|-------|
//! | Max print width | 384 dots (48 bytes) |
//! | Rows per raster command | 1-255 |

use super::commands::DC2;

/// Maximum printable width in dots
pub const MAX_WIDTH_DOTS: usize = 384;

/// Maximum printable width in bytes
pub const MAX_ROW_BYTES: usize = MAX_WIDTH_DOTS / 8;

/// The row count field of the raster header is a single byte
pub const MAX_CHUNK_ROWS: usize = 255;

/// Bytes needed to hold one row of `width` dots.
///
/// ```
/// use thermalprinter::protocol::graphics::row_bytes;
///
/// assert_eq!(row_bytes(384), 48);
/// assert_eq!(row_bytes(385), 49);
/// ```
#[inline]
pub fn row_bytes(width: usize) -> usize {
    width.div_ceil(8)
}

/// # Print Raster Bit Image (DC2 * r n d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | DC2 * r n d1...dk |
/// | Hex     | 12 2A r n d1...dk |
///
/// ## Parameters
///
/// - `r`: Number of rows in this chunk (1-255)
/// - `n`: Width in bytes (1-48)
/// - `d1...dk`: k = r × n bytes, row-major
///
/// This builds the 4-byte header only. The payload is streamed separately
/// so wide source rows can be clipped without copying the image.
///
/// ```
/// use thermalprinter::protocol::graphics::raster_header;
///
/// assert_eq!(raster_header(2, 48), [0x12, 0x2A, 0x02, 0x30]);
/// ```
#[inline]
pub fn raster_header(rows: u8, width_bytes: u8) -> [u8; 4] {
    [DC2, b'*', rows, width_bytes]
}

// ============================================================================
// TESTS
// ============================================================================
