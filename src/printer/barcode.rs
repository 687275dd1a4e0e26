//! # Barcode Transfer
//!
//! The printer renders barcodes itself; the driver only sends the
//! symbology preamble and the literal data. Printing a barcode keeps the
//! mechanism busy for roughly `(barcode_height + 40)` dot rows, the extra 40
//! covering the label printed underneath.

use tracing::debug;

use super::session::PrinterSession;
use super::timing::Clock;
use crate::error::PrinterError;
use crate::protocol::barcode::{self, BarcodeType};
use crate::protocol::commands::LF;
use crate::transport::Transport;

/// Dot rows taken by the human readable label
const LABEL_ROWS: u16 = 40;

/// Lines fed after each barcode
const FEED_AFTER: u8 = 2;

impl<T: Transport, C: Clock> PrinterSession<T, C> {
    /// Print `text` as a barcode of the given symbology.
    ///
    /// The text is sent as-is; the printer decides whether it is valid for
    /// the symbology.
    pub fn print_barcode(&mut self, text: &str, barcode_type: BarcodeType) -> Result<(), PrinterError> {
        debug!(%barcode_type, text, "barcode");
        self.write_bytes(&barcode::header(barcode_type))?;

        let rows = f64::from(self.state.barcode_height + LABEL_ROWS);
        self.transmit(text.as_bytes(), rows * self.dot_print_time)?;
        self.state.prev_byte = LF;
        self.state.column = 0;

        self.feed(FEED_AFTER)
    }

    /// Set the barcode height in dot rows. Zero is raised to 1.
    pub fn set_barcode_height(&mut self, height: u8) -> Result<(), PrinterError> {
        let height = height.max(1);
        self.state.barcode_height = u16::from(height);
        self.write_bytes(&barcode::height(height))
    }
}

// ============================================================================
// TESTS
// ============================================================================
