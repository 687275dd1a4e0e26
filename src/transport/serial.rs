//! # Serial Port Transport
//!
//! This module provides communication with a thermal printer over a plain
//! serial line (the printer's TTL UART, usually wired to a Raspberry Pi's
//! `/dev/ttyAMA0` / `/dev/serial0`, or a USB-serial adapter).
//!
//! ## Line Settings
//!
//! | Setting | Value |
//! |---------|-------|
//! | Data bits | 8 |
//! | Parity | None |
//! | Stop bits | 1 |
//! | Flow control | **None** |
//!
//! Flow control is explicitly off: these printers don't drive a CTS line
//! and XON/XOFF would corrupt raster data. Overrun protection comes from the
//! session's timing model instead.

use std::io::Write;
use std::time::Duration;

use tracing::{error, info};

use super::Transport;
use crate::error::PrinterError;

/// Default serial device on a Raspberry Pi
pub const DEFAULT_PORT: &str = "/dev/serial0";

/// Default baud rate of CSN-A2 printers
pub const DEFAULT_BAUD: u32 = 19200;

/// Write timeout. Writes only stall if the OS buffer is full.
const WRITE_TIMEOUT_MS: u64 = 5000;

/// # Serial Printer Transport
///
/// ## Example
///
/// ```no_run
/// use thermalprinter::transport::{SerialTransport, Transport};
///
/// let mut transport = SerialTransport::open("/dev/ttyAMA0", 19200)?;
/// transport.write_all(&[0x1B, 0x40])?;
/// # Ok::<(), thermalprinter::PrinterError>(())
/// ```
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port", &self.port.name())
            .finish()
    }
}

impl SerialTransport {
    /// Open a serial port to the printer.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need the dialout group)
    /// - The line settings can't be applied
    pub fn open(port: &str, baud: u32) -> Result<Self, PrinterError> {
        let port_handle = serialport::new(port, baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(WRITE_TIMEOUT_MS))
            .open()
            .map_err(|e| {
                error!("Failed to open serial port {}: {}", port, e);
                PrinterError::Transport(format!("Failed to open {}: {}", port, e))
            })?;

        info!(port, baud, "serial port open");
        Ok(Self { port: port_handle })
    }

    /// Open the default port at the default baud rate.
    pub fn open_default() -> Result<Self, PrinterError> {
        Self::open(DEFAULT_PORT, DEFAULT_BAUD)
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        Write::write_all(&mut self.port, data)
            .map_err(|e| PrinterError::Transport(format!("Write failed: {}", e)))?;
        Write::flush(&mut self.port)
            .map_err(|e| PrinterError::Transport(format!("Flush failed: {}", e)))
    }
}

/// List serial ports that could have a printer attached.
pub fn list_ports() -> Result<Vec<String>, PrinterError> {
    let ports = serialport::available_ports().map_err(|e| {
        error!("Failed to enumerate serial ports: {}", e);
        PrinterError::Transport(format!("Failed to enumerate ports: {}", e))
    })?;

    Ok(ports
        .into_iter()
        .map(|p| p.port_name)
        .filter(|name| is_printer_port(name))
        .collect())
}

/// Check if a port name looks like a UART or USB-serial device.
///
/// Accepted patterns:
/// - Raspberry Pi UART: `/dev/serial*`, `/dev/ttyAMA*`, `/dev/ttyS*`
/// - USB adapters: `/dev/ttyUSB*`, `/dev/ttyACM*`, `/dev/cu.usbserial-*`
/// - Windows: `COM<n>`
pub fn is_printer_port(port_name: &str) -> bool {
    if let Some(num) = port_name.strip_prefix("COM") {
        return !num.is_empty() && num.chars().all(|c| c.is_ascii_digit());
    }

    [
        "/dev/serial",
        "/dev/ttyAMA",
        "/dev/ttyS",
        "/dev/ttyUSB",
        "/dev/ttyACM",
        "/dev/cu.usbserial-",
    ]
    .iter()
    .any(|prefix| port_name.starts_with(prefix))
}

// ============================================================================
// TESTS
// ============================================================================
