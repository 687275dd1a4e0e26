//! # Error Types
//!
//! This module defines error types used throughout the thermalprinter library.

use thiserror::Error;

/// Main error type for printer operations
#[derive(Debug, Error)]
pub enum PrinterError {
    /// Transport-level errors (open, write, flush)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Bitmap dimensions don't match the supplied buffer
    #[error("Bitmap error: {0}")]
    Bitmap(String),

    /// Image decoding or conversion error
    #[error("Image error: {0}")]
    Image(String),

    /// Malformed configuration
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
