//! # Printer Control Commands
//!
//! This module implements the fixed control sequences understood by small
//! serial thermal printers (CSN-A2 and compatible ESC/POS-like firmware).
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`, `FF`, the wake byte `0xFF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC J n`, `ESC 7 n1 n2 n3`
//!
//! Every builder returns an owned byte vector so callers can hand it to the
//! paced writer as one unit.

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for size, barcode and raster-unrelated extended settings.
pub const GS: u8 = 0x1D;

/// DC2 (Device Control 2) - Raster and density command prefix
pub const DC2: u8 = 0x12;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

/// FF (Form Feed) - Print whatever is buffered
pub const FF: u8 = 0x0C;

/// DC3 (XOFF) - Never transmitted by the paced writer
///
/// Some firmware interprets this byte as a software flow-control request,
/// so it is stripped from printed text.
pub const XOFF: u8 = 0x13;

/// First byte of the wake sequence
///
/// The printer ignores 0xFF while idle but it is enough to bring it out of
/// low-power mode.
pub const WAKE: u8 = 0xFF;

/// Number of ESC bytes sent after [`WAKE`] to flush the input parser
pub const WAKE_ESC_COUNT: usize = 10;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## Example
///
/// ```
/// use thermalprinter::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Select Online/Offline (ESC = n)
///
/// While offline the printer ignores print commands until brought back
/// online.
///
/// | Hex        | Effect  |
/// |------------|---------|
/// | `1B 3D 01` | Online  |
/// | `1B 3D 00` | Offline |
#[inline]
pub fn online() -> Vec<u8> {
    vec![ESC, b'=', 1]
}

/// Take the printer offline (ESC = 0). See [`online`].
#[inline]
pub fn offline() -> Vec<u8> {
    vec![ESC, b'=', 0]
}

/// # Sleep After Idle (ESC 8 n)
///
/// Puts the printer to sleep after `seconds` of inactivity. A sleeping
/// printer must be woken with the wake sequence before it accepts data.
#[inline]
pub fn sleep_after(seconds: u8) -> Vec<u8> {
    vec![ESC, b'8', seconds]
}

/// Print buffered data (FF)
#[inline]
pub fn flush() -> Vec<u8> {
    vec![FF]
}

// ============================================================================
// PAPER FEED COMMANDS
// ============================================================================

/// # Feed Dot Rows (ESC J n)
///
/// Feeds paper forward by `n` dot rows without printing.
///
/// ## Example
///
/// ```
/// use thermalprinter::protocol::commands;
///
/// assert_eq!(commands::feed_rows(12), vec![0x1B, 0x4A, 12]);
/// ```
#[inline]
pub fn feed_rows(n: u8) -> Vec<u8> {
    vec![ESC, b'J', n]
}

/// # Set Line Height (ESC 3 n)
///
/// Sets the total line pitch in dots. The firmware does not take the current
/// character height into account, so this behaves like inter-line spacing
/// plus the 24-dot base character height. The power-on pitch is 32.
#[inline]
pub fn line_height(n: u8) -> Vec<u8> {
    vec![ESC, b'3', n]
}

/// # Underline (ESC - n)
///
/// - `0`: no underline
/// - `1`: normal underline
/// - `2`: thick underline
#[inline]
pub fn underline(weight: u8) -> Vec<u8> {
    vec![ESC, b'-', weight]
}

// ============================================================================
// PRINT HEAD SETTINGS
// ============================================================================

/// # Heating Parameters (ESC 7 n1 n2 n3)
///
/// | Param | Unit | Meaning |
/// |-------|------|---------|
/// | n1 | 8 dots | Max heating dots (peak current vs. speed) |
/// | n2 | 10 µs | Heating time (density vs. speed, min 3) |
/// | n3 | 10 µs | Heating interval (clarity vs. speed) |
#[inline]
pub fn heat_config(max_dots: u8, heat_time: u8, heat_interval: u8) -> Vec<u8> {
    vec![ESC, b'7', max_dots, heat_time, heat_interval]
}

/// # Print Density (DC2 # n)
///
/// Bits 0-4 select the density (50% + 5% per step), bits 5-7 the break
/// time in units of 250 µs. Out of range arguments are masked to their
/// field width.
///
/// ```
/// use thermalprinter::protocol::commands;
///
/// // 120% density, 500us break
/// assert_eq!(commands::print_density(14, 4), vec![0x12, 0x23, 0x8E]);
/// ```
#[inline]
pub fn print_density(density: u8, break_time: u8) -> Vec<u8> {
    vec![DC2, b'#', ((break_time & 0x07) << 5) | (density & 0x1F)]
}

// ============================================================================
// TESTS
// ============================================================================
