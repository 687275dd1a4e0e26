//! # Text Styling Commands
//!
//! This module implements text formatting commands: alignment, character
//! size and the combined print-mode byte.
//!
//! ## Print Mode
//!
//! The printer keeps its text style flags in a single mode byte set with
//! `ESC ! n`. Each style occupies one bit and they combine freely:
//!
//! | Bit | Flag | Effect |
//! |-----|------|--------|
//! | 1 | `INVERSE` | White on black |
//! | 2 | `UPSIDE_DOWN` | 180° rotation |
//! | 3 | `BOLD` | Emphasized |
//! | 4 | `DOUBLE_HEIGHT` | 2x vertical size |
//! | 5 | `DOUBLE_WIDTH` | 2x horizontal size |
//! | 6 | `STRIKE` | Strike-through |
//!
//! ## Lenient Selectors
//!
//! Alignment and size selectors are usually typed by humans ("L", "c",
//! "r"). Anything unrecognized falls back to left / small instead of being
//! rejected, mirroring how the firmware treats unknown parameters.

use bitflags::bitflags;

use super::commands::{ESC, GS, LF};

// ============================================================================
// PRINT MODE
// ============================================================================

bitflags! {
    /// Text style flags sent as the `ESC !` mode byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PrintMode: u8 {
        const INVERSE = 1 << 1;
        const UPSIDE_DOWN = 1 << 2;
        const BOLD = 1 << 3;
        const DOUBLE_HEIGHT = 1 << 4;
        const DOUBLE_WIDTH = 1 << 5;
        const STRIKE = 1 << 6;
    }
}

/// # Select Print Mode (ESC ! n)
///
/// ```
/// use thermalprinter::protocol::text::{print_mode, PrintMode};
///
/// let cmd = print_mode(PrintMode::BOLD | PrintMode::DOUBLE_HEIGHT);
/// assert_eq!(cmd, vec![0x1B, 0x21, 0x18]);
/// ```
#[inline]
pub fn print_mode(mode: PrintMode) -> Vec<u8> {
    vec![ESC, b'!', mode.bits()]
}

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

impl From<&str> for Alignment {
    /// Parse "L", "C" or "R" case-insensitively. Anything else is left.
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "C" => Self::Center,
            "R" => Self::Right,
            _ => Self::Left,
        }
    }
}

/// # Set Justification (ESC a n)
///
/// | n | Alignment |
/// |---|-----------|
/// | 0 | Left |
/// | 1 | Center |
/// | 2 | Right |
///
/// ```
/// use thermalprinter::protocol::text::{justify, Alignment};
///
/// assert_eq!(justify(Alignment::from("c")), vec![0x1B, 0x61, 0x01]);
/// ```
#[inline]
pub fn justify(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// Character size presets
///
/// | Size | GS ! value | Char height | Columns |
/// |------|------------|-------------|---------|
/// | Small | 0x00 | 24 | 32 |
/// | Medium | 0x01 | 48 | 32 |
/// | Large | 0x11 | 48 | 16 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl TextSize {
    /// The `GS !` parameter byte.
    pub fn code(self) -> u8 {
        match self {
            Self::Small => 0x00,
            Self::Medium => 0x01,
            Self::Large => 0x11,
        }
    }

    /// Character height in dot rows.
    pub fn char_height(self) -> u16 {
        match self {
            Self::Small => 24,
            Self::Medium | Self::Large => 48,
        }
    }

    /// Characters per line.
    pub fn max_column(self) -> u16 {
        match self {
            Self::Small | Self::Medium => 32,
            Self::Large => 16,
        }
    }
}

impl From<&str> for TextSize {
    /// Parse "S", "M" or "L" case-insensitively. Anything else is small.
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "M" => Self::Medium,
            "L" => Self::Large,
            _ => Self::Small,
        }
    }
}

/// # Set Character Size (GS ! n), followed by LF
///
/// The size only applies from the next line, so a line feed is appended to
/// start a fresh line immediately.
#[inline]
pub fn set_size(size: TextSize) -> Vec<u8> {
    vec![GS, b'!', size.code(), LF]
}

// ============================================================================
// TESTS
// ============================================================================
