//! # Barcode Commands
//!
//! This module implements the 1D barcode commands.
//!
//! ## Print Sequence
//!
//! A barcode is printed by configuring it, selecting the symbology, and then
//! sending the literal barcode text:
//!
//! ```
//! use thermalprinter::protocol::barcode::{self, BarcodeType};
//!
//! let mut data = Vec::new();
//! data.extend(barcode::header(BarcodeType::Code39));
//! data.extend(b"ADAFRUIT");
//! assert_eq!(&data[..9], &[0x1D, 0x48, 0x02, 0x1D, 0x77, 0x03, 0x1D, 0x6B, 0x04]);
//! ```
//!
//! Barcode height is a separate, persistent setting (`GS h n`).

use std::fmt;
use std::str::FromStr;

use super::commands::GS;

/// Barcode symbologies, numbered as the firmware expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BarcodeType {
    /// UPC-A (11-12 digits)
    UpcA = 0,
    /// UPC-E (11-12 digits, compressed)
    UpcE = 1,
    /// EAN-13 / JAN-13
    Ean13 = 2,
    /// EAN-8 / JAN-8
    Ean8 = 3,
    /// Code 39 (A-Z, 0-9, space, -.$/%+)
    Code39 = 4,
    /// Interleaved 2 of 5
    I25 = 5,
    /// Codabar / NW-7
    Codabar = 6,
    /// Code 93
    Code93 = 7,
    /// Code 128
    Code128 = 8,
    /// Code 11
    Code11 = 9,
    /// MSI Plessey
    Msi = 10,
}

impl BarcodeType {
    /// All symbologies in wire order.
    pub const ALL: [Self; 11] = [
        Self::UpcA,
        Self::UpcE,
        Self::Ean13,
        Self::Ean8,
        Self::Code39,
        Self::I25,
        Self::Codabar,
        Self::Code93,
        Self::Code128,
        Self::Code11,
        Self::Msi,
    ];

    /// Short lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::UpcA => "upc-a",
            Self::UpcE => "upc-e",
            Self::Ean13 => "ean13",
            Self::Ean8 => "ean8",
            Self::Code39 => "code39",
            Self::I25 => "i25",
            Self::Codabar => "codabar",
            Self::Code93 => "code93",
            Self::Code128 => "code128",
            Self::Code11 => "code11",
            Self::Msi => "msi",
        }
    }
}

impl fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BarcodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|t| t.name() == wanted || t.name().replace('-', "") == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown barcode type '{}'. Expected one of: {}",
                    s,
                    Self::ALL.map(Self::name).join(", ")
                )
            })
    }
}

/// Print the human readable label below the barcode (GS H 2)
#[inline]
pub fn label_below() -> Vec<u8> {
    vec![GS, b'H', 2]
}

/// Barcode module width (GS w n), 3 is the firmware default
#[inline]
pub fn module_width(n: u8) -> Vec<u8> {
    vec![GS, b'w', n]
}

/// Select symbology and start a barcode (GS k m)
#[inline]
pub fn select(barcode_type: BarcodeType) -> Vec<u8> {
    vec![GS, b'k', barcode_type as u8]
}

/// The 9-byte preamble sent before barcode text: label, width, symbology.
pub fn header(barcode_type: BarcodeType) -> Vec<u8> {
    let mut cmd = Vec::with_capacity(9);
    cmd.extend(label_below());
    cmd.extend(module_width(3));
    cmd.extend(select(barcode_type));
    cmd
}

/// # Barcode Height (GS h n)
///
/// Height in dot rows, 1-255.
#[inline]
pub fn height(n: u8) -> Vec<u8> {
    vec![GS, b'h', n]
}

// ============================================================================
// TESTS
// ============================================================================
