//! # Printer Configuration
//!
//! This module defines the link and timing parameters of supported printers.
//!
//! ## Supported Printers
//!
//! | Model | Width (dots) | Baud | Dot print | Dot feed |
//! |-------|--------------|------|-----------|----------|
//! | CSN-A2 | 384 | 19200 | 30 ms | 2.1 ms |
//!
//! ## Timing Constants
//!
//! The printer has no flow control, so the driver predicts how long each
//! operation keeps the mechanism busy:
//!
//! ```text
//! byte_time      = 11 / baud          (8 data + start + stop + idle margin)
//! text line      = char_height * dot_print_time + line_spacing * dot_feed_time
//! blank line     = (char_height + line_spacing) * dot_feed_time
//! ```
//!
//! ## Loading
//!
//! ```
//! use thermalprinter::printer::PrinterConfig;
//!
//! let config = PrinterConfig::from_json(r#"{ "baud": 9600 }"#)?;
//! assert_eq!(config.baud, 9600);
//! assert_eq!(config.dot_feed_time, PrinterConfig::CSN_A2.dot_feed_time);
//! # Ok::<(), thermalprinter::PrinterError>(())
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PrinterError;

/// Bits on the wire per byte: 8 data bits, start, stop, and one idle bit
/// of margin.
pub const BITS_PER_BYTE: f64 = 11.0;

/// How raster payload bytes are accounted in the busy window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterPacing {
    /// Only the 4-byte chunk header is charged; payload is sent as fast as
    /// the link allows.
    #[default]
    HeaderOnly,
    /// The whole chunk (header + payload transmission + printing its rows)
    /// is charged before the chunk is sent.
    FullChunk,
}

/// # Printer Configuration
///
/// Link speed and timing model parameters for one printer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Printer model name
    #[serde(skip)]
    pub name: &'static str,

    /// Serial baud rate
    pub baud: u32,

    /// Seconds to print one dot row
    pub dot_print_time: f64,

    /// Seconds to feed one blank dot row
    pub dot_feed_time: f64,

    /// Seconds the printer needs after power up before it accepts data
    pub boot_delay: f64,

    /// Granularity of the ready-wait loop, in seconds
    pub poll_interval: f64,

    /// Raster payload accounting
    pub raster_pacing: RasterPacing,
}

impl PrinterConfig {
    /// # CSN-A2 Mini Thermal Printer
    ///
    /// 58mm paper, 384-dot head, TTL serial at 19200 baud.
    pub const CSN_A2: Self = Self {
        name: "CSN-A2",
        baud: 19200,
        dot_print_time: 0.03,
        dot_feed_time: 0.0021,
        boot_delay: 0.5,
        poll_interval: 0.1,
        raster_pacing: RasterPacing::HeaderOnly,
    };

    /// Seconds to transmit one byte at the configured baud rate.
    ///
    /// ```
    /// use thermalprinter::printer::PrinterConfig;
    ///
    /// let t = PrinterConfig::CSN_A2.byte_time();
    /// assert!((t - 5.7292e-4).abs() < 1e-7);
    /// ```
    #[inline]
    pub fn byte_time(&self) -> f64 {
        BITS_PER_BYTE / f64::from(self.baud)
    }

    /// Poll interval as a [`Duration`]. An unusable interval polls in a
    /// single step.
    #[inline]
    pub fn poll_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.poll_interval).unwrap_or(Duration::ZERO)
    }

    /// Parse a JSON configuration. Missing fields keep their CSN-A2 values.
    pub fn from_json(json: &str) -> Result<Self, PrinterError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PrinterError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PrinterError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PrinterError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Check the baud rate is non-zero and every time is within
    /// `0..=MAX_TIMING_SECONDS`.
    pub fn validate(&self) -> Result<(), PrinterError> {
        if self.baud == 0 {
            return Err(PrinterError::Config("baud must be non-zero".to_string()));
        }
        check_seconds("dot_print_time", self.dot_print_time)?;
        check_seconds("dot_feed_time", self.dot_feed_time)?;
        check_seconds("boot_delay", self.boot_delay)?;
        check_seconds("poll_interval", self.poll_interval)
    }
}

/// Upper bound for any configured time, in seconds
pub const MAX_TIMING_SECONDS: f64 = 60.0;

/// Reject times that are negative, not finite, or above [`MAX_TIMING_SECONDS`].
pub(crate) fn check_seconds(field: &str, value: f64) -> Result<(), PrinterError> {
    if !(0.0..=MAX_TIMING_SECONDS).contains(&value) {
        return Err(PrinterError::Config(format!(
            "{} must be between 0 and {} seconds, got {}",
            field, MAX_TIMING_SECONDS, value
        )));
    }
    Ok(())
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::CSN_A2
    }
}

// ============================================================================
// TESTS
// ============================================================================
