//! # Formatting State
//!
//! Mirror of the printer's text style and line geometry, kept so the paced
//! writer can predict how long each line takes to print.
//!
//! | Field | Values | Derived from |
//! |-------|--------|--------------|
//! | `char_height` | 24 / 48 | double height flag |
//! | `max_column` | 32 / 16 | double width flag |
//! | `column` | 0..=max_column | characters on the current line |
//! | `line_spacing` | dots | line height minus 24 |
//!
//! `char_height` only feeds the timing prediction; the printer decides the
//! real glyph geometry itself.

use crate::protocol::commands::LF;
use crate::protocol::text::{PrintMode, TextSize};

/// Base character height in dot rows
pub const CHAR_HEIGHT: u16 = 24;

/// Characters per line at normal width
pub const COLUMNS: u16 = 32;

/// Gap between lines at the power-on line height of 32
pub const LINE_SPACING: u16 = 8;

/// Power-on barcode height in dot rows
pub const BARCODE_HEIGHT: u16 = 50;

/// The printer's text style and line geometry as last sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattingState {
    pub(crate) print_mode: PrintMode,
    pub(crate) prev_byte: u8,
    pub(crate) column: u16,
    pub(crate) max_column: u16,
    pub(crate) char_height: u16,
    pub(crate) line_spacing: u16,
    pub(crate) barcode_height: u16,
}

impl Default for FormattingState {
    fn default() -> Self {
        Self {
            print_mode: PrintMode::empty(),
            prev_byte: LF,
            column: 0,
            max_column: COLUMNS,
            char_height: CHAR_HEIGHT,
            line_spacing: LINE_SPACING,
            barcode_height: BARCODE_HEIGHT,
        }
    }
}

impl FormattingState {
    /// Current style flags.
    #[inline]
    pub fn print_mode(&self) -> PrintMode {
        self.print_mode
    }

    /// Last byte the paced writer processed (wraps count as a newline).
    #[inline]
    pub fn prev_byte(&self) -> u8 {
        self.prev_byte
    }

    /// Characters printed on the current line.
    #[inline]
    pub fn column(&self) -> u16 {
        self.column
    }

    /// Characters that fit on one line.
    #[inline]
    pub fn max_column(&self) -> u16 {
        self.max_column
    }

    /// Character height in dot rows.
    #[inline]
    pub fn char_height(&self) -> u16 {
        self.char_height
    }

    /// Extra feed between lines in dot rows.
    #[inline]
    pub fn line_spacing(&self) -> u16 {
        self.line_spacing
    }

    /// Barcode height in dot rows.
    #[inline]
    pub fn barcode_height(&self) -> u16 {
        self.barcode_height
    }

    /// Restore the state the printer has after `ESC @`.
    ///
    /// The previous line counts as blank.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn set_mode(&mut self, mode: PrintMode) {
        self.print_mode.insert(mode);
        self.recompute_geometry();
    }

    pub(crate) fn clear_mode(&mut self, mode: PrintMode) {
        self.print_mode.remove(mode);
        self.recompute_geometry();
    }

    pub(crate) fn clear_all_modes(&mut self) {
        self.print_mode = PrintMode::empty();
        self.recompute_geometry();
    }

    /// Apply a `GS !` size preset, which also ends the current line.
    pub(crate) fn apply_size(&mut self, size: TextSize) {
        self.char_height = size.char_height();
        self.max_column = size.max_column();
        self.column = 0;
        self.prev_byte = LF;
    }

    /// `line_height` is the full pitch sent with `ESC 3`.
    pub(crate) fn set_line_height(&mut self, line_height: u8) {
        self.line_spacing = u16::from(line_height).saturating_sub(CHAR_HEIGHT);
    }

    fn recompute_geometry(&mut self) {
        self.char_height = if self.print_mode.contains(PrintMode::DOUBLE_HEIGHT) {
            CHAR_HEIGHT * 2
        } else {
            CHAR_HEIGHT
        };
        self.max_column = if self.print_mode.contains(PrintMode::DOUBLE_WIDTH) {
            COLUMNS / 2
        } else {
            COLUMNS
        };
        self.column = self.column.min(self.max_column);
    }
}

// ============================================================================
// TESTS
// ============================================================================
