//! # Printer Transport Layer
//!
//! This module provides the byte channels a printer session writes to.
//!
//! ## Available Transports
//!
//! - [`serial`]: Serial port (UART, USB-serial adapters) without flow control
//! - `Vec<u8>`: Captures the byte stream in memory (dry runs, tests)
//!
//! A transport only has to move bytes. Pacing is the session's job, so a
//! transport must not buffer writes for later; each call either puts all
//! bytes on the wire or fails.

pub mod serial;

pub use serial::SerialTransport;

use crate::error::PrinterError;

/// A write-only byte channel to the printer.
pub trait Transport {
    /// Write every byte of `data` or fail.
    ///
    /// ## Errors
    ///
    /// Returns an error if the underlying channel rejects the write. Bytes
    /// written before the failure stay written.
    fn write_all(&mut self, data: &[u8]) -> Result<(), PrinterError>;
}

impl Transport for Vec<u8> {
    fn write_all(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        self.extend_from_slice(data);
        Ok(())
    }
}
