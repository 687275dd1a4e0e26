//! # Paced Text Writer
//!
//! Streams text one byte at a time and predicts how long the printer needs
//! for each byte from the mirrored line geometry.
//!
//! ## Busy Window per Byte
//!
//! | Byte | Previous byte | Charged |
//! |------|---------------|---------|
//! | printable, line not full | any | `byte_time` |
//! | LF or wrap | LF (blank line) | `byte_time + (char_height + line_spacing) * dot_feed_time` |
//! | LF or wrap | text | `byte_time + char_height * dot_print_time + line_spacing * dot_feed_time` |
//!
//! A wrap (the line already holds `max_column` characters) is treated as an
//! LF from then on. XOFF (0x13) bytes are dropped before anything else
//! happens, since the printer would read them as flow control.

use super::session::PrinterSession;
use super::timing::Clock;
use crate::error::PrinterError;
use crate::protocol::commands::{LF, XOFF};
use crate::transport::Transport;

/// Lines fed by [`PrinterSession::feed`] when no count is given
pub const DEFAULT_FEED_LINES: u8 = 1;

/// Outcome of feeding one byte through the line model.
struct Step {
    busy: f64,
    column: u16,
    prev_byte: u8,
}

impl<T: Transport, C: Clock> PrinterSession<T, C> {
    /// Print raw bytes with paced timing.
    ///
    /// Line state is only updated after each byte has been written, so a
    /// transport error leaves it describing exactly what the printer got.
    pub fn write(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        for &byte in data {
            if byte == XOFF {
                continue;
            }
            let step = self.step(byte);
            self.transmit(&[byte], step.busy)?;
            self.state.column = step.column;
            self.state.prev_byte = step.prev_byte;
        }
        Ok(())
    }

    /// Print text without a trailing newline.
    pub fn print(&mut self, text: &str) -> Result<(), PrinterError> {
        self.write(text.as_bytes())
    }

    /// Print text followed by a newline.
    pub fn println(&mut self, text: &str) -> Result<(), PrinterError> {
        self.write(text.as_bytes())?;
        self.write(&[LF])
    }

    /// Feed `lines` text lines by printing newlines.
    pub fn feed(&mut self, lines: u8) -> Result<(), PrinterError> {
        for _ in 0..lines {
            self.write(&[LF])?;
        }
        Ok(())
    }

    fn step(&self, byte: u8) -> Step {
        let state = &self.state;
        let mut busy = self.timing.byte_time();

        if byte != LF && state.column < state.max_column {
            return Step {
                busy,
                column: state.column + 1,
                prev_byte: byte,
            };
        }

        let height = f64::from(state.char_height);
        let spacing = f64::from(state.line_spacing);
        if state.prev_byte == LF {
            busy += (height + spacing) * self.dot_feed_time;
            Step {
                busy,
                column: state.column,
                prev_byte: byte,
            }
        } else {
            busy += height * self.dot_print_time + spacing * self.dot_feed_time;
            Step {
                busy,
                column: 0,
                prev_byte: LF,
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
