//! Integration tests for the paced printer session.
//!
//! Every test drives a session over an in-memory transport with a simulated
//! clock, so byte streams and busy windows are exact.

use pretty_assertions::assert_eq;
use std::time::Duration;

use thermalprinter::printer::timing::{Clock, ManualClock};
use thermalprinter::printer::{Bitmap, PrinterConfig, PrinterSession, RasterPacing};
use thermalprinter::protocol::barcode::BarcodeType;
use thermalprinter::protocol::text::{Alignment, PrintMode, TextSize};
use thermalprinter::transport::Transport;
use thermalprinter::PrinterError;

type TestSession = PrinterSession<Vec<u8>, ManualClock>;

fn open() -> (ManualClock, TestSession) {
    let clock = ManualClock::new();
    let mut session =
        PrinterSession::with_clock(Vec::new(), PrinterConfig::CSN_A2, clock.clone()).unwrap();
    session.transport_mut().clear();
    (clock, session)
}

fn assert_close(actual: Duration, expected: f64) {
    let actual = actual.as_secs_f64();
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {:.6}s, got {:.6}s",
        expected,
        actual
    );
}

// ============================================================================
// TIMING
// ============================================================================

#[test]
fn test_byte_time_for_common_bauds() {
    for baud in [9600u32, 19200, 57600, 115_200] {
        let config = PrinterConfig {
            baud,
            ..PrinterConfig::CSN_A2
        };
        let session =
            PrinterSession::with_clock(Vec::new(), config, ManualClock::new()).unwrap();
        assert!((session.timing().byte_time() - 11.0 / f64::from(baud)).abs() < 1e-12);
    }
}

#[test]
fn test_no_write_before_resume_time() {
    // Record the simulated time at which each write lands.
    struct Stamped {
        clock: ManualClock,
        writes: Vec<std::time::Instant>,
    }
    impl Transport for Stamped {
        fn write_all(&mut self, _data: &[u8]) -> Result<(), PrinterError> {
            self.writes.push(self.clock.now());
            Ok(())
        }
    }

    let clock = ManualClock::new();
    let transport = Stamped {
        clock: clock.clone(),
        writes: Vec::new(),
    };
    let mut session = PrinterSession::with_clock(transport, PrinterConfig::CSN_A2, clock).unwrap();

    let mut deadlines = Vec::new();
    for text in ["first line", "", "second"] {
        deadlines.push(session.timing().resume_time());
        session.println(text).unwrap();
    }
    deadlines.push(session.timing().resume_time());
    session.feed_rows(10).unwrap();

    let writes = &session.transport().writes;
    let last = *writes.last().unwrap();
    assert!(last >= *deadlines.last().unwrap());
    assert!(writes.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_println_full_line_charge() {
    let (_, mut session) = open();
    session.println(&"x".repeat(32)).unwrap();

    let expected = session.timing().byte_time()
        + 24.0 * session.dot_print_time()
        + 8.0 * session.dot_feed_time();
    assert_close(session.timing().busy_remaining(), expected);
    assert_eq!(session.state().column(), 0);
}

#[test]
fn test_blank_line_charge() {
    let (_, mut session) = open();
    session.print("text\n\n").unwrap();
    let expected = session.timing().byte_time() + 32.0 * session.dot_feed_time();
    assert_close(session.timing().busy_remaining(), expected);
}

#[test]
fn test_set_times_changes_prediction() {
    let (_, mut session) = open();
    session.set_times(0.1, 0.01).unwrap();
    session.println("x").unwrap();
    let expected = session.timing().byte_time() + 24.0 * 0.1 + 8.0 * 0.01;
    assert_close(session.timing().busy_remaining(), expected);
}

#[test]
fn test_job_duration_estimate() {
    let (clock, mut session) = open();
    let start = clock.elapsed();
    session.println("one").unwrap();
    session.println("two").unwrap();
    let total = clock.elapsed() - start + session.timing().busy_remaining();

    let bt = session.timing().byte_time();
    let line = 24.0 * session.dot_print_time() + 8.0 * session.dot_feed_time();
    // reset leftover, then 8 bytes with two line charges
    let expected = 2.0 * bt + 8.0 * bt + 2.0 * line;
    assert_close(total, expected);
}

// ============================================================================
// COMMANDS
// ============================================================================

#[test]
fn test_wake_is_eleven_bytes() {
    let (clock, mut session) = open();
    let start = clock.elapsed();
    session.wake().unwrap();

    assert_eq!(session.transport().len(), 11);
    assert_eq!(session.transport()[0], 0xFF);
    assert!(session.transport()[1..].iter().all(|&b| b == 0x1B));

    // ten 100ms windows: nine waited out, one pending
    let spent = clock.elapsed() - start + session.timing().busy_remaining();
    let bt = session.timing().byte_time();
    assert_close(spent, 3.0 * bt + 1.0);
}

#[test]
fn test_justify_selectors() {
    let (_, mut session) = open();
    for selector in ["r", "R", "x", "c", ""] {
        session.justify(Alignment::from(selector)).unwrap();
    }
    let positions: Vec<u8> = session.transport().chunks(3).map(|c| c[2]).collect();
    assert_eq!(positions, vec![2, 2, 0, 1, 0]);
}

#[test]
fn test_double_height_idempotent() {
    let (_, mut session) = open();
    session.double_height_on().unwrap();
    session.double_height_on().unwrap();
    assert_eq!(session.state().char_height(), 48);
    session.double_height_off().unwrap();
    session.double_height_off().unwrap();
    assert_eq!(session.state().char_height(), 24);
}

#[test]
fn test_mode_flags_combine() {
    let (_, mut session) = open();
    session.set_print_mode(PrintMode::BOLD | PrintMode::UPSIDE_DOWN).unwrap();
    session.strike_on().unwrap();
    session.clear_print_mode(PrintMode::UPSIDE_DOWN).unwrap();
    assert_eq!(session.state().print_mode(), PrintMode::BOLD | PrintMode::STRIKE);
    assert_eq!(&session.transport()[6..], &[0x1B, 0x21, 0x48]);
}

#[test]
fn test_size_ends_line_and_sets_geometry() {
    let (_, mut session) = open();
    session.print("half a line").unwrap();
    session.set_size(TextSize::Large).unwrap();
    assert_eq!(session.state().column(), 0);
    assert_eq!(session.state().max_column(), 16);

    // A text line right after the size change prints at 48 rows.
    session.println("big").unwrap();
    let expected = session.timing().byte_time()
        + 48.0 * session.dot_print_time()
        + 8.0 * session.dot_feed_time();
    assert_close(session.timing().busy_remaining(), expected);
}

#[test]
fn test_xoff_never_sent() {
    let (_, mut session) = open();
    session.print("a\u{13}b").unwrap();
    session.write(&[0x13, 0x13]).unwrap();
    assert_eq!(session.transport(), &b"ab".to_vec());
    assert_eq!(session.state().column(), 2);
}

#[test]
fn test_xoff_never_timed() {
    let (plain_clock, mut plain) = open();
    plain.print("a").unwrap();

    let (xoff_clock, mut with_xoff) = open();
    with_xoff.print("a\u{13}\u{13}").unwrap();

    assert_eq!(with_xoff.transport(), plain.transport());
    assert_eq!(with_xoff.timing().busy_remaining(), plain.timing().busy_remaining());
    assert_eq!(xoff_clock.elapsed(), plain_clock.elapsed());
}

// ============================================================================
// TRANSFERS
// ============================================================================

#[test]
fn test_bitmap_single_and_line_modes() {
    let data: Vec<u8> = (0..96u8).collect();

    let (_, mut chunked) = open();
    chunked.print_bitmap(384, 2, &data, false).unwrap();
    let mut expected = vec![0x12, 0x2A, 0x02, 0x30];
    expected.extend(&data);
    assert_eq!(chunked.transport(), &expected);

    let (_, mut lines) = open();
    lines.print_bitmap(384, 2, &data, true).unwrap();
    let mut expected = vec![0x12, 0x2A, 0x01, 0x30];
    expected.extend(&data[..48]);
    expected.extend([0x12, 0x2A, 0x01, 0x30]);
    expected.extend(&data[48..]);
    assert_eq!(lines.transport(), &expected);
}

#[test]
fn test_print_image() {
    let (_, mut session) = open();
    let bitmap = Bitmap::new(16, 2, vec![0xAA, 0x55, 0x55, 0xAA]).unwrap();
    session.print_image(&bitmap, false).unwrap();
    assert_eq!(
        session.transport(),
        &vec![0x12, 0x2A, 2, 2, 0xAA, 0x55, 0x55, 0xAA]
    );
}

#[test]
fn test_full_chunk_pacing_waits_for_rows() {
    let config = PrinterConfig {
        raster_pacing: RasterPacing::FullChunk,
        ..PrinterConfig::CSN_A2
    };
    let clock = ManualClock::new();
    let mut session = PrinterSession::with_clock(Vec::new(), config, clock.clone()).unwrap();
    session.print_bitmap(8, 300, &[0xFF; 300], false).unwrap();

    let deadline = session.timing().resume_time();
    session.println("after").unwrap();
    assert!(clock.now() >= deadline);
    // The second chunk had to wait for all 255 rows of the first.
    assert!(clock.elapsed().as_secs_f64() > 300.0 * session.dot_print_time());
}

#[test]
fn test_barcode_stream() {
    let (_, mut session) = open();
    session.set_barcode_height(0).unwrap();
    session.print_barcode("123456789123", BarcodeType::UpcA).unwrap();

    let mut expected = vec![0x1D, 0x68, 0x01];
    expected.extend([0x1D, 0x48, 0x02, 0x1D, 0x77, 0x03, 0x1D, 0x6B, 0x00]);
    expected.extend(b"123456789123\n\n");
    assert_eq!(session.transport(), &expected);
    assert_eq!(session.state().barcode_height(), 1);
}

#[test]
fn test_barcode_type_parsing() {
    assert_eq!("code39".parse::<BarcodeType>().unwrap(), BarcodeType::Code39);
    assert_eq!("UPC-A".parse::<BarcodeType>().unwrap(), BarcodeType::UpcA);
    assert!("qr".parse::<BarcodeType>().is_err());
}

// ============================================================================
// ERRORS
// ============================================================================

/// Accepts `budget` writes, then fails every write after that.
struct Flaky {
    budget: usize,
    sent: Vec<u8>,
}

impl Transport for Flaky {
    fn write_all(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        if self.budget == 0 {
            return Err(PrinterError::Transport("line dropped".to_string()));
        }
        self.budget -= 1;
        self.sent.extend_from_slice(data);
        Ok(())
    }
}

#[test]
fn test_open_fails_on_dead_transport() {
    let transport = Flaky {
        budget: 0,
        sent: Vec::new(),
    };
    let result = PrinterSession::with_clock(transport, PrinterConfig::CSN_A2, ManualClock::new());
    assert!(matches!(result, Err(PrinterError::Transport(_))));
}

#[test]
fn test_write_error_keeps_state_up_to_failure() {
    // wake (11 writes) + reset (1), then three text bytes get through
    let transport = Flaky {
        budget: 12 + 3,
        sent: Vec::new(),
    };
    let mut session =
        PrinterSession::with_clock(transport, PrinterConfig::CSN_A2, ManualClock::new()).unwrap();

    let err = session.print("hello").unwrap_err();
    assert_eq!(err.to_string(), "Transport error: line dropped");
    assert_eq!(session.state().column(), 3);
    assert_eq!(session.state().prev_byte(), b'l');
    assert!(session.transport().sent.ends_with(b"hel"));
}

#[test]
fn test_bitmap_error_stops_transfer() {
    let transport = Flaky {
        budget: 12 + 1,
        sent: Vec::new(),
    };
    let mut session =
        PrinterSession::with_clock(transport, PrinterConfig::CSN_A2, ManualClock::new()).unwrap();
    session.print("ab").unwrap_err();

    // State still says the line has one character; the bitmap never starts.
    assert_eq!(session.state().column(), 1);
    let result = session.print_bitmap(8, 1, &[0xFF], false);
    assert!(result.is_err());
    assert_eq!(session.state().column(), 1);
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("thermalprinter-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"baud": 9600, "dot_print_time": 0.05}"#).unwrap();
    let config = PrinterConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.baud, 9600);
    assert_eq!(config.dot_print_time, 0.05);
    assert_eq!(config.boot_delay, 0.5);
    assert!(PrinterConfig::load("/nonexistent/printer.json").is_err());
}
