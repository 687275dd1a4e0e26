//! # Raster Bitmap Transfer
//!
//! Sends 1-bit images with `DC2 * r n`, split into bands the printer can
//! take in one command.
//!
//! ## Bitmap Layout
//!
//! - Row-major, `ceil(width / 8)` bytes per row
//! - MSB first: bit 7 of the first byte is the leftmost pixel
//! - A set bit prints a black dot
//!
//! Rows wider than the 384-dot head are clipped: the extra bytes of each
//! row are skipped, not sent.
//!
//! ## Chunking
//!
//! | `line_at_a_time` | Rows per chunk | Trade-off |
//! |------------------|----------------|-----------|
//! | `false` | up to 255 | fewer headers, may leave feed gaps on tall images |
//! | `true` | 1 | smoother feed, more command overhead |

use tracing::debug;

use super::config::RasterPacing;
use super::session::PrinterSession;
use super::timing::Clock;
use crate::error::PrinterError;
use crate::protocol::commands::LF;
use crate::protocol::graphics::{MAX_CHUNK_ROWS, MAX_ROW_BYTES, raster_header, row_bytes};
use crate::transport::Transport;

/// A packed 1-bit image ready for the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Packed rows, `ceil(width / 8) * height` bytes
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Wrap packed data, checking it covers every row.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, PrinterError> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Bytes per packed row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        row_bytes(self.width)
    }
}

fn check_len(width: usize, height: usize, len: usize) -> Result<(), PrinterError> {
    let needed = row_bytes(width) * height;
    if len < needed {
        return Err(PrinterError::Bitmap(format!(
            "{}x{} bitmap needs {} bytes, got {}",
            width, height, needed, len
        )));
    }
    Ok(())
}

impl<T: Transport, C: Clock> PrinterSession<T, C> {
    /// Print a packed bitmap.
    ///
    /// ## Errors
    ///
    /// Fails before sending anything if `data` is shorter than
    /// `ceil(width / 8) * height`, and mid-transfer on transport errors.
    pub fn print_bitmap(
        &mut self,
        width: usize,
        height: usize,
        data: &[u8],
        line_at_a_time: bool,
    ) -> Result<(), PrinterError> {
        check_len(width, height, data.len())?;
        if width == 0 || height == 0 {
            return Ok(());
        }

        let row_bytes = row_bytes(width);
        let clipped = row_bytes.min(MAX_ROW_BYTES);
        let max_chunk = if line_at_a_time { 1 } else { MAX_CHUNK_ROWS };

        let mut row_start = 0;
        while row_start < height {
            let chunk_rows = (height - row_start).min(max_chunk);
            debug!(
                row_bytes,
                clipped,
                height,
                chunk_rows,
                row_start,
                "raster chunk"
            );

            let mut payload = Vec::with_capacity(chunk_rows * clipped);
            for row in data[row_start * row_bytes..]
                .chunks(row_bytes)
                .take(chunk_rows)
            {
                payload.extend_from_slice(&row[..clipped]);
            }

            // Both values fit in a byte: chunk_rows <= 255, clipped <= 48.
            let header = raster_header(chunk_rows as u8, clipped as u8);
            let byte_time = self.timing.byte_time();
            let busy = match self.config.raster_pacing {
                RasterPacing::HeaderOnly => header.len() as f64 * byte_time,
                RasterPacing::FullChunk => {
                    (header.len() + payload.len()) as f64 * byte_time
                        + chunk_rows as f64 * self.dot_print_time
                }
            };
            self.transmit(&header, busy)?;
            self.transport.write_all(&payload)?;

            row_start += chunk_rows;
        }

        self.state.prev_byte = LF;
        self.state.column = 0;
        Ok(())
    }

    /// Print a [`Bitmap`].
    pub fn print_image(&mut self, bitmap: &Bitmap, line_at_a_time: bool) -> Result<(), PrinterError> {
        self.print_bitmap(bitmap.width, bitmap.height, &bitmap.data, line_at_a_time)
    }
}

// ============================================================================
// TESTS
// ============================================================================
