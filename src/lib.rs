//! # Thermalprinter - Paced Serial Thermal Printer Driver
//!
//! Thermalprinter drives small serial thermal printers (CSN-A2 and clones)
//! that have no hardware flow control. It provides:
//!
//! - **Protocol implementation**: ESC/POS-style command builders
//! - **Paced session**: predicts how long the printer is busy and never
//!   sends faster than it can print
//! - **Raster and barcode transfer**: chunked bitmap upload, printer-side
//!   barcodes
//! - **Dithering**: Atkinson error diffusion for photos
//! - **Transport**: serial port, or an in-memory buffer for dry runs
//!
//! ## Quick Start
//!
//! ```no_run
//! use thermalprinter::{
//!     PrinterConfig, PrinterSession, SerialTransport,
//!     protocol::{barcode::BarcodeType, text::{Alignment, TextSize}},
//!     render::dither,
//! };
//!
//! // Open the port and start a session (wakes and resets the printer)
//! let config = PrinterConfig::CSN_A2;
//! let transport = SerialTransport::open("/dev/serial0", config.baud)?;
//! let mut printer = PrinterSession::open(transport, config)?;
//!
//! printer.justify(Alignment::Center)?;
//! printer.set_size(TextSize::Large)?;
//! printer.println("Hello")?;
//! printer.set_size(TextSize::Small)?;
//!
//! printer.print_barcode("ADAFRUT", BarcodeType::Code39)?;
//!
//! let bitmap = dither::load_bitmap("photo.jpg", 384)?;
//! printer.print_image(&bitmap, false)?;
//! printer.feed(2)?;
//!
//! # Ok::<(), thermalprinter::PrinterError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Command builders |
//! | [`printer`] | Session, timing model and transfers |
//! | [`render`] | Image dithering |
//! | [`transport`] | Communication backends |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Currently tested with:
//! - CSN-A2 (58mm paper, 384 dots, TTL serial at 19200 baud)
//!
//! Other printers with the same command set should work after tuning the
//! dot print and feed times in [`PrinterConfig`].

pub mod error;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use error::PrinterError;
pub use printer::{PrinterConfig, PrinterSession};
pub use transport::SerialTransport;
