//! # Printer Session
//!
//! A [`PrinterSession`] owns the transport to one printer together with the
//! timing model and the mirrored formatting state. Every operation goes
//! through it, so there is exactly one place that knows when the printer is
//! busy.
//!
//! ## Write Ordering
//!
//! Every transmission follows the same three steps:
//!
//! 1. wait until the previous busy window has elapsed
//! 2. charge the busy window for the bytes about to be sent
//! 3. transmit
//!
//! ## Example
//!
//! ```
//! use thermalprinter::printer::{PrinterConfig, PrinterSession};
//! use thermalprinter::printer::timing::ManualClock;
//! use thermalprinter::protocol::text::Alignment;
//!
//! let clock = ManualClock::new();
//! let mut printer = PrinterSession::with_clock(Vec::new(), PrinterConfig::CSN_A2, clock)?;
//! printer.justify(Alignment::from("C"))?;
//! printer.bold_on()?;
//! printer.println("Hello")?;
//! printer.bold_off()?;
//!
//! let bytes = printer.into_transport();
//! assert!(bytes.ends_with(b"Hello\n\x1b!\x00"));
//! # Ok::<(), thermalprinter::PrinterError>(())
//! ```
//!
//! The session is not meant to be shared. Callers that need to print from
//! several threads must put the whole session behind one lock.

use tracing::debug;

use super::config::{PrinterConfig, check_seconds};
use super::state::FormattingState;
use super::timing::{Clock, SystemClock, TimingModel};
use crate::error::PrinterError;
use crate::protocol::commands::{self, ESC, WAKE, WAKE_ESC_COUNT};
use crate::protocol::text::{self, Alignment, PrintMode, TextSize};
use crate::transport::Transport;

/// Line height restored by `set_line_height` without an explicit value
pub const DEFAULT_LINE_HEIGHT: u8 = 24;

/// Line height used by [`PrinterSession::set_default`]
pub const STANDARD_LINE_HEIGHT: u8 = 32;

/// Idle seconds before the printer sleeps, when not specified
pub const DEFAULT_SLEEP_SECONDS: u8 = 1;

/// Busy window after each ESC of the wake sequence
const WAKE_STEP_SECONDS: f64 = 0.1;

/// Heating parameters for `ESC 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatConfig {
    /// Max heating dots, in units of 8 dots
    pub max_dots: u8,
    /// Heating time, in units of 10 µs
    pub heat_time: u8,
    /// Heating interval, in units of 10 µs
    pub heat_interval: u8,
}

impl Default for HeatConfig {
    /// Balances darkness against paper jams.
    fn default() -> Self {
        Self {
            max_dots: 20,
            heat_time: 60,
            heat_interval: 250,
        }
    }
}

/// # Printer Session
///
/// Owns the transport, the busy-window timing model and the formatting
/// state of one connected printer.
#[derive(Debug)]
pub struct PrinterSession<T: Transport, C: Clock = SystemClock> {
    pub(crate) transport: T,
    pub(crate) timing: TimingModel<C>,
    pub(crate) state: FormattingState,
    pub(crate) config: PrinterConfig,
    pub(crate) dot_print_time: f64,
    pub(crate) dot_feed_time: f64,
}

impl<T: Transport> PrinterSession<T> {
    /// Connect to a printer using the real clock.
    ///
    /// Waits out the cold-boot delay, wakes the printer and resets it.
    pub fn open(transport: T, config: PrinterConfig) -> Result<Self, PrinterError> {
        Self::with_clock(transport, config, SystemClock)
    }
}

impl<T: Transport, C: Clock> PrinterSession<T, C> {
    /// Connect to a printer, reading time from `clock`.
    ///
    /// Fails with [`PrinterError::Config`] if `config` does not validate.
    pub fn with_clock(transport: T, config: PrinterConfig, clock: C) -> Result<Self, PrinterError> {
        config.validate()?;
        let timing = TimingModel::new(clock, config.byte_time(), config.poll_duration());
        let mut session = Self {
            transport,
            timing,
            state: FormattingState::default(),
            config,
            dot_print_time: config.dot_print_time,
            dot_feed_time: config.dot_feed_time,
        };

        debug!(printer = config.name, baud = config.baud, "starting session");
        // The printer needs a moment after power up before it listens.
        session.timing.charge_busy(config.boot_delay);
        session.wake()?;
        session.reset()?;
        Ok(session)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// Mirrored formatting state.
    #[inline]
    pub fn state(&self) -> &FormattingState {
        &self.state
    }

    /// Busy-window timing model.
    #[inline]
    pub fn timing(&self) -> &TimingModel<C> {
        &self.timing
    }

    /// Configuration the session was opened with.
    #[inline]
    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Seconds to print one dot row.
    #[inline]
    pub fn dot_print_time(&self) -> f64 {
        self.dot_print_time
    }

    /// Seconds to feed one blank dot row.
    #[inline]
    pub fn dot_feed_time(&self) -> f64 {
        self.dot_feed_time
    }

    /// The underlying transport.
    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport. Bytes written here bypass pacing.
    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Close the session and hand back the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    // ========================================================================
    // RAW WRITES
    // ========================================================================

    /// Wait until ready, charge `busy_seconds`, then transmit `data`.
    pub(crate) fn transmit(&mut self, data: &[u8], busy_seconds: f64) -> Result<(), PrinterError> {
        self.timing.wait_until_ready();
        self.timing.charge_busy(busy_seconds);
        self.transport.write_all(data)
    }

    /// Send a command, charging only its transmission time.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        let busy = data.len() as f64 * self.timing.byte_time();
        self.transmit(data, busy)
    }

    // ========================================================================
    // DEVICE CONTROL
    // ========================================================================

    /// Reset the printer (ESC @) and the mirrored state.
    pub fn reset(&mut self) -> Result<(), PrinterError> {
        self.state.reset();
        self.write_bytes(&commands::init())
    }

    /// Restore the usual defaults without a full reset.
    pub fn set_default(&mut self) -> Result<(), PrinterError> {
        self.online()?;
        self.justify(Alignment::Left)?;
        self.inverse_off()?;
        self.double_height_off()?;
        self.set_line_height(STANDARD_LINE_HEIGHT)?;
        self.bold_off()?;
        self.underline_off()?;
        self.set_barcode_height(super::state::BARCODE_HEIGHT as u8)?;
        self.set_size(TextSize::Small)
    }

    /// Bring the printer out of sleep.
    ///
    /// Sends 0xFF followed by ten ESC bytes, 100 ms apart, which also
    /// flushes any half-received command from the printer's parser. A busy
    /// window still pending, such as the boot delay, is waited out first.
    pub fn wake(&mut self) -> Result<(), PrinterError> {
        self.write_bytes(&[WAKE])?;
        for _ in 0..WAKE_ESC_COUNT {
            self.write_bytes(&[ESC])?;
            self.timing.charge_busy(WAKE_STEP_SECONDS);
        }
        Ok(())
    }

    /// Sleep after `seconds` of inactivity. Call [`wake`](Self::wake)
    /// before printing again.
    pub fn sleep(&mut self, seconds: u8) -> Result<(), PrinterError> {
        self.write_bytes(&commands::sleep_after(seconds))
    }

    /// Accept print commands again.
    pub fn online(&mut self) -> Result<(), PrinterError> {
        self.write_bytes(&commands::online())
    }

    /// Ignore print commands until [`online`](Self::online) is called.
    pub fn offline(&mut self) -> Result<(), PrinterError> {
        self.write_bytes(&commands::offline())
    }

    /// Print whatever the printer has buffered (FF).
    pub fn flush(&mut self) -> Result<(), PrinterError> {
        self.write_bytes(&commands::flush())
    }

    /// Feed `rows` dot rows without printing.
    pub fn feed_rows(&mut self, rows: u8) -> Result<(), PrinterError> {
        self.write_bytes(&commands::feed_rows(rows))?;
        self.timing.charge_busy(f64::from(rows) * self.dot_feed_time);
        Ok(())
    }

    /// Replace the per-dot-row print and feed times.
    ///
    /// Both must lie in `0..=MAX_TIMING_SECONDS`; on error neither changes.
    pub fn set_times(&mut self, dot_print_time: f64, dot_feed_time: f64) -> Result<(), PrinterError> {
        check_seconds("dot_print_time", dot_print_time)?;
        check_seconds("dot_feed_time", dot_feed_time)?;
        self.dot_print_time = dot_print_time;
        self.dot_feed_time = dot_feed_time;
        Ok(())
    }

    /// Tune the print head heating (ESC 7).
    pub fn set_heat_config(&mut self, heat: HeatConfig) -> Result<(), PrinterError> {
        self.write_bytes(&commands::heat_config(
            heat.max_dots,
            heat.heat_time,
            heat.heat_interval,
        ))
    }

    /// Set print density and break time (DC2 #).
    pub fn set_print_density(&mut self, density: u8, break_time: u8) -> Result<(), PrinterError> {
        self.write_bytes(&commands::print_density(density, break_time))
    }

    // ========================================================================
    // TEXT FORMATTING
    // ========================================================================

    /// Turn on `mode` flags, leaving the others as they are.
    pub fn set_print_mode(&mut self, mode: PrintMode) -> Result<(), PrinterError> {
        self.state.set_mode(mode);
        self.write_print_mode()
    }

    /// Turn off `mode` flags, leaving the others as they are.
    pub fn clear_print_mode(&mut self, mode: PrintMode) -> Result<(), PrinterError> {
        self.state.clear_mode(mode);
        self.write_print_mode()
    }

    /// Clear every print mode flag.
    pub fn normal(&mut self) -> Result<(), PrinterError> {
        self.state.clear_all_modes();
        self.write_print_mode()
    }

    fn write_print_mode(&mut self) -> Result<(), PrinterError> {
        self.write_bytes(&text::print_mode(self.state.print_mode))
    }

    /// White on black.
    pub fn inverse_on(&mut self) -> Result<(), PrinterError> {
        self.set_print_mode(PrintMode::INVERSE)
    }

    /// Back to black on white.
    pub fn inverse_off(&mut self) -> Result<(), PrinterError> {
        self.clear_print_mode(PrintMode::INVERSE)
    }

    /// Rotate text 180°.
    pub fn upside_down_on(&mut self) -> Result<(), PrinterError> {
        self.set_print_mode(PrintMode::UPSIDE_DOWN)
    }

    /// Print text upright again.
    pub fn upside_down_off(&mut self) -> Result<(), PrinterError> {
        self.clear_print_mode(PrintMode::UPSIDE_DOWN)
    }

    /// Emphasized text.
    pub fn bold_on(&mut self) -> Result<(), PrinterError> {
        self.set_print_mode(PrintMode::BOLD)
    }

    /// Turn off [`bold_on`](Self::bold_on).
    pub fn bold_off(&mut self) -> Result<(), PrinterError> {
        self.clear_print_mode(PrintMode::BOLD)
    }

    /// Double character height (48 dot rows).
    pub fn double_height_on(&mut self) -> Result<(), PrinterError> {
        self.set_print_mode(PrintMode::DOUBLE_HEIGHT)
    }

    /// Turn off [`double_height_on`](Self::double_height_on).
    pub fn double_height_off(&mut self) -> Result<(), PrinterError> {
        self.clear_print_mode(PrintMode::DOUBLE_HEIGHT)
    }

    /// Double character width (16 columns).
    pub fn double_width_on(&mut self) -> Result<(), PrinterError> {
        self.set_print_mode(PrintMode::DOUBLE_WIDTH)
    }

    /// Turn off [`double_width_on`](Self::double_width_on).
    pub fn double_width_off(&mut self) -> Result<(), PrinterError> {
        self.clear_print_mode(PrintMode::DOUBLE_WIDTH)
    }

    /// Strike-through text.
    pub fn strike_on(&mut self) -> Result<(), PrinterError> {
        self.set_print_mode(PrintMode::STRIKE)
    }

    /// Turn off [`strike_on`](Self::strike_on).
    pub fn strike_off(&mut self) -> Result<(), PrinterError> {
        self.clear_print_mode(PrintMode::STRIKE)
    }

    /// Set justification for following lines.
    pub fn justify(&mut self, alignment: Alignment) -> Result<(), PrinterError> {
        self.write_bytes(&text::justify(alignment))
    }

    /// Select a character size preset. Starts a new line.
    pub fn set_size(&mut self, size: TextSize) -> Result<(), PrinterError> {
        self.state.apply_size(size);
        self.write_bytes(&text::set_size(size))
    }

    /// Set the line pitch in dots ([`DEFAULT_LINE_HEIGHT`] is the firmware
    /// minimum for unspaced lines).
    pub fn set_line_height(&mut self, line_height: u8) -> Result<(), PrinterError> {
        self.state.set_line_height(line_height);
        self.write_bytes(&commands::line_height(line_height))
    }

    /// Underline with the given weight (1 normal, 2 thick, 0 off).
    pub fn underline_on(&mut self, weight: u8) -> Result<(), PrinterError> {
        self.write_bytes(&commands::underline(weight))
    }

    pub fn underline_off(&mut self) -> Result<(), PrinterError> {
        self.underline_on(0)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::timing::ManualClock;
    use crate::protocol::commands::LF;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn session() -> (ManualClock, PrinterSession<Vec<u8>, ManualClock>) {
        let clock = ManualClock::new();
        let mut session =
            PrinterSession::with_clock(Vec::new(), PrinterConfig::CSN_A2, clock.clone()).unwrap();
        session.transport_mut().clear();
        (clock, session)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_construction_wakes_then_resets() {
        let clock = ManualClock::new();
        let session =
            PrinterSession::with_clock(Vec::new(), PrinterConfig::CSN_A2, clock.clone()).unwrap();
        let bt = session.timing().byte_time();

        let mut expected = vec![0xFF];
        expected.extend([0x1B; 10]);
        expected.extend([0x1B, 0x40]);
        assert_eq!(session.transport(), &expected);

        // boot delay, the wake byte, then ten 100ms steps
        assert!(approx(clock.elapsed().as_secs_f64(), 0.5 + bt + 1.0));
        assert!(approx(session.timing().busy_remaining().as_secs_f64(), 2.0 * bt));
        assert_eq!(session.state(), &FormattingState::default());
    }

    #[test]
    fn test_wake_sequence() {
        let (clock, mut session) = session();
        let bt = session.timing().byte_time();
        let start = clock.elapsed();

        session.wake().unwrap();

        let mut expected = vec![0xFF];
        expected.extend([0x1B; 10]);
        assert_eq!(session.transport(), &expected);
        assert_eq!(session.transport().len(), 11);

        // Waited out the reset (2 bytes), the wake byte, and nine of the ten
        // 100ms windows. The tenth is still pending.
        let waited = (clock.elapsed() - start).as_secs_f64();
        assert!(approx(waited, 3.0 * bt + 0.9), "waited {}", waited);
        assert!(approx(session.timing().busy_remaining().as_secs_f64(), 0.1));
    }

    #[test]
    fn test_write_bytes_charges_transmission_time() {
        let (_, mut session) = session();
        let bt = session.timing().byte_time();
        session.write_bytes(&[1, 2, 3, 4, 5]).unwrap();
        assert!(approx(session.timing().busy_remaining().as_secs_f64(), 5.0 * bt));
    }

    #[test]
    fn test_write_waits_for_previous_window() {
        let (clock, mut session) = session();
        session.feed_rows(100).unwrap();
        let deadline = session.timing().resume_time();
        session.online().unwrap();
        assert!(clock.now() >= deadline);
    }

    #[test]
    fn test_reset_restores_geometry() {
        let (_, mut session) = session();
        session.double_width_on().unwrap();
        session.set_line_height(50).unwrap();
        session.print("abc").unwrap();
        session.transport_mut().clear();

        session.reset().unwrap();
        assert_eq!(session.transport(), &vec![0x1B, 0x40]);
        assert_eq!(session.state().column(), 0);
        assert_eq!(session.state().max_column(), 32);
        assert_eq!(session.state().char_height(), 24);
        assert_eq!(session.state().line_spacing(), 8);
        assert_eq!(session.state().barcode_height(), 50);
        assert_eq!(session.state().prev_byte(), LF);
    }

    #[test]
    fn test_print_mode_commands() {
        let (_, mut session) = session();
        session.bold_on().unwrap();
        session.double_height_on().unwrap();
        session.bold_off().unwrap();
        session.strike_on().unwrap();
        session.normal().unwrap();
        assert_eq!(
            session.transport(),
            &vec![
                0x1B, 0x21, 0x08, // bold
                0x1B, 0x21, 0x18, // bold + double height
                0x1B, 0x21, 0x10, // double height
                0x1B, 0x21, 0x50, // double height + strike
                0x1B, 0x21, 0x00, // normal
            ]
        );
        assert_eq!(session.state().char_height(), 24);
    }

    #[test]
    fn test_double_height_toggle() {
        let (_, mut session) = session();
        session.double_height_on().unwrap();
        session.double_height_on().unwrap();
        assert_eq!(session.state().char_height(), 48);
        assert_eq!(session.state().print_mode(), PrintMode::DOUBLE_HEIGHT);
        session.double_height_off().unwrap();
        session.double_height_off().unwrap();
        assert_eq!(session.state().char_height(), 24);
        assert!(session.state().print_mode().is_empty());
    }

    #[test]
    fn test_double_width_columns() {
        let (_, mut session) = session();
        session.double_width_on().unwrap();
        assert_eq!(session.state().max_column(), 16);
        session.inverse_on().unwrap();
        session.upside_down_on().unwrap();
        assert_eq!(session.state().max_column(), 16);
        session.double_width_off().unwrap();
        assert_eq!(session.state().max_column(), 32);
        session.inverse_off().unwrap();
        session.upside_down_off().unwrap();
        assert!(session.state().print_mode().is_empty());
    }

    #[test]
    fn test_justify_is_lenient() {
        let (_, mut session) = session();
        for selector in ["r", "R", "x"] {
            session.justify(Alignment::from(selector)).unwrap();
        }
        assert_eq!(
            session.transport(),
            &vec![0x1B, 0x61, 2, 0x1B, 0x61, 2, 0x1B, 0x61, 0]
        );
    }

    #[test]
    fn test_set_size_geometry() {
        let (_, mut session) = session();
        session.print("abc").unwrap();

        session.set_size(TextSize::from("L")).unwrap();
        assert_eq!((session.state().char_height(), session.state().max_column()), (48, 16));
        assert_eq!(session.state().prev_byte(), LF);
        assert_eq!(session.state().column(), 0);

        session.set_size(TextSize::from("m")).unwrap();
        assert_eq!((session.state().char_height(), session.state().max_column()), (48, 32));

        session.set_size(TextSize::from("?")).unwrap();
        assert_eq!((session.state().char_height(), session.state().max_column()), (24, 32));

        assert!(session.transport().ends_with(&[0x1D, 0x21, 0x00, 0x0A]));
    }

    #[test]
    fn test_line_height() {
        let (_, mut session) = session();
        session.set_line_height(50).unwrap();
        assert_eq!(session.state().line_spacing(), 26);
        session.set_line_height(DEFAULT_LINE_HEIGHT).unwrap();
        assert_eq!(session.state().line_spacing(), 0);
        assert_eq!(session.transport(), &vec![0x1B, 0x33, 50, 0x1B, 0x33, 24]);
    }

    #[test]
    fn test_simple_commands() {
        let (_, mut session) = session();
        session.underline_on(1).unwrap();
        session.underline_off().unwrap();
        session.online().unwrap();
        session.offline().unwrap();
        session.sleep(DEFAULT_SLEEP_SECONDS).unwrap();
        session.flush().unwrap();
        assert_eq!(
            session.transport(),
            &vec![
                0x1B, 0x2D, 1, 0x1B, 0x2D, 0, 0x1B, 0x3D, 1, 0x1B, 0x3D, 0, 0x1B, 0x38, 1, 0x0C
            ]
        );
    }

    #[test]
    fn test_feed_rows_charges_feed_time() {
        let (_, mut session) = session();
        session.feed_rows(40).unwrap();
        assert_eq!(session.transport(), &vec![0x1B, 0x4A, 40]);
        let expected = 40.0 * session.dot_feed_time();
        assert!(approx(session.timing().busy_remaining().as_secs_f64(), expected));
    }

    #[test]
    fn test_heat_and_density() {
        let (_, mut session) = session();
        session.set_heat_config(HeatConfig::default()).unwrap();
        session.set_print_density(14, 4).unwrap();
        assert_eq!(
            session.transport(),
            &vec![0x1B, 0x37, 20, 60, 250, 0x12, 0x23, 0x8E]
        );
    }

    #[test]
    fn test_set_times() {
        let (_, mut session) = session();
        session.set_times(0.1, 0.05).unwrap();
        assert_eq!(session.dot_print_time(), 0.1);
        assert_eq!(session.dot_feed_time(), 0.05);
    }

    #[test]
    fn test_set_times_rejects_unusable_values() {
        let (_, mut session) = session();
        for (print, feed) in [(1e300, 0.0021), (0.03, f64::INFINITY), (-0.01, 0.0021), (f64::NAN, 0.0)] {
            let result = session.set_times(print, feed);
            assert!(matches!(result, Err(PrinterError::Config(_))));
        }
        assert_eq!(session.dot_print_time(), 0.03);
        assert_eq!(session.dot_feed_time(), 0.0021);

        // The session keeps printing with the old times.
        session.println("x").unwrap();
        assert_eq!(session.transport(), &b"x\n".to_vec());
    }

    #[test]
    fn test_with_clock_rejects_invalid_config() {
        let bad = [
            PrinterConfig { poll_interval: f64::INFINITY, ..PrinterConfig::CSN_A2 },
            PrinterConfig { dot_print_time: 1e300, ..PrinterConfig::CSN_A2 },
            PrinterConfig { baud: 0, ..PrinterConfig::CSN_A2 },
        ];
        for config in bad {
            let result = PrinterSession::with_clock(Vec::new(), config, ManualClock::new());
            assert!(matches!(result, Err(PrinterError::Config(_))));
        }
    }

    #[test]
    fn test_set_default_sequence() {
        let (_, mut session) = session();
        session.inverse_on().unwrap();
        session.transport_mut().clear();

        session.set_default().unwrap();
        assert_eq!(
            session.transport(),
            &vec![
                0x1B, 0x3D, 0x01, // online
                0x1B, 0x61, 0x00, // justify left
                0x1B, 0x21, 0x00, // inverse off
                0x1B, 0x21, 0x00, // double height off
                0x1B, 0x33, 32, // line height
                0x1B, 0x21, 0x00, // bold off
                0x1B, 0x2D, 0x00, // underline off
                0x1D, 0x68, 50, // barcode height
                0x1D, 0x21, 0x00, 0x0A, // size small
            ]
        );
        assert_eq!(session.state().line_spacing(), 8);
    }

    #[test]
    fn test_open_with_system_clock_waits() {
        let config = PrinterConfig {
            boot_delay: 0.0,
            poll_interval: 0.001,
            ..PrinterConfig::CSN_A2
        };
        let started = std::time::Instant::now();
        let session = PrinterSession::open(Vec::new(), config).unwrap();
        // Ten 100ms wake steps must elapse in real time.
        assert!(started.elapsed() >= Duration::from_millis(900));
        assert_eq!(session.transport().len(), 13);
    }
}
