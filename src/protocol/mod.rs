//! # Printer Protocol Implementation
//!
//! This module provides low-level command builders for the byte protocol
//! spoken by small serial thermal printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Control commands (init, online, sleep, feed, heat settings)
//! - [`text`]: Print mode, justification and character size
//! - [`graphics`]: Raster bit image header and width limits
//! - [`barcode`]: 1D barcode symbologies and commands
//!
//! Builders here are pure: they only produce bytes. Pacing, state tracking
//! and transmission live in [`crate::printer`].
//!
//! ## Usage Example
//!
//! ```
//! use thermalprinter::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::justify(text::Alignment::Center));
//! data.extend(text::print_mode(text::PrintMode::BOLD));
//! data.extend(b"RECEIPT\n");
//! assert_eq!(data.len(), 2 + 3 + 3 + 8);
//! ```

pub mod barcode;
pub mod commands;
pub mod graphics;
pub mod text;
