//! # Thermalprinter CLI
//!
//! Command-line interface for serial thermal printers.
//!
//! ## Usage
//!
//! ```bash
//! # Print the style test sheet
//! thermalprinter demo
//!
//! # Print a photo, one raster row per command
//! thermalprinter --port /dev/ttyUSB0 image --line-at-a-time photo.jpg
//!
//! # Print some lines of text, centered and bold
//! thermalprinter text --align c --bold "Hello" "World"
//!
//! # Print a barcode
//! thermalprinter barcode --type code39 ADAFRUT
//!
//! # Capture the byte stream instead of printing, and estimate the duration
//! thermalprinter --dry-run out.bin image photo.jpg
//!
//! # List serial ports
//! thermalprinter ports
//! ```
//!
//! Set `RUST_LOG=thermalprinter=debug` to see raster chunking and
//! `RUST_LOG=thermalprinter=trace` for every busy-window charge.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use thermalprinter::{
    PrinterConfig, PrinterError, PrinterSession, SerialTransport,
    printer::session::{DEFAULT_LINE_HEIGHT, DEFAULT_SLEEP_SECONDS},
    printer::timing::{Clock, ManualClock},
    printer::writer::DEFAULT_FEED_LINES,
    protocol::{
        barcode::BarcodeType,
        text::{Alignment, TextSize},
    },
    render::dither,
    transport::{Transport, serial},
};

/// Thermalprinter - paced serial thermal printer utility
#[derive(Parser, Debug)]
#[command(name = "thermalprinter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Serial device the printer is attached to
    #[arg(long, global = true, default_value = serial::DEFAULT_PORT)]
    port: String,

    /// Baud rate (overrides the config)
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// JSON printer config (defaults to CSN-A2)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the byte stream to FILE with a simulated clock instead of printing
    #[arg(long, global = true, value_name = "FILE")]
    dry_run: Option<PathBuf>,

    /// Seconds to print one dot row
    #[arg(long, global = true)]
    print_time: Option<f64>,

    /// Seconds to feed one blank dot row
    #[arg(long, global = true)]
    feed_time: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the style test sheet
    Demo,

    /// Dither and print an image
    Image {
        /// Image file (PNG, JPEG, GIF, ...)
        file: PathBuf,

        /// Send one raster row per command (smoother feed on large images)
        #[arg(long)]
        line_at_a_time: bool,

        /// Print width in dots (max 384)
        #[arg(long, default_value = "384")]
        width: usize,
    },

    /// Print lines of text
    Text {
        /// Lines to print
        #[arg(required = true)]
        lines: Vec<String>,

        /// Justification: L, C or R
        #[arg(long, default_value = "L")]
        align: String,

        /// Character size: S, M or L
        #[arg(long, default_value = "S")]
        size: String,

        /// Bold text
        #[arg(long)]
        bold: bool,
    },

    /// Print a barcode
    Barcode {
        /// Barcode data
        data: String,

        /// Symbology
        #[arg(long = "type", default_value = "code128")]
        barcode_type: BarcodeType,

        /// Height in dot rows
        #[arg(long, default_value = "50")]
        height: u8,
    },

    /// List serial ports that may have a printer attached
    Ports,
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn run() -> Result<(), PrinterError> {
    let cli = Cli::parse();

    if let Commands::Ports = cli.command {
        let ports = serial::list_ports()?;
        if ports.is_empty() {
            println!("No serial ports found");
        }
        for port in ports {
            println!("  {}", port);
        }
        return Ok(());
    }

    let config = resolve_config(&cli)?;

    if let Some(path) = &cli.dry_run {
        let clock = ManualClock::new();
        let mut printer = PrinterSession::with_clock(Vec::new(), config, clock.clone())?;
        execute(&mut printer, &cli.command)?;

        let total = clock.elapsed() + printer.timing().busy_remaining();
        let bytes = printer.into_transport();
        std::fs::write(path, &bytes)?;
        println!(
            "Wrote {} bytes to {}, estimated print time {:.1}s",
            bytes.len(),
            path.display(),
            total.as_secs_f64()
        );
        return Ok(());
    }

    let transport = SerialTransport::open(&cli.port, config.baud)?;
    let mut printer = PrinterSession::open(transport, config)?;
    execute(&mut printer, &cli.command)?;
    println!("Printed successfully!");
    Ok(())
}

/// Load the config file (or CSN-A2) and apply the command-line overrides.
fn resolve_config(cli: &Cli) -> Result<PrinterConfig, PrinterError> {
    let mut config = match &cli.config {
        Some(path) => PrinterConfig::load(path)?,
        None => PrinterConfig::CSN_A2,
    };
    if let Some(baud) = cli.baud {
        config.baud = baud;
    }
    if let Some(t) = cli.print_time {
        config.dot_print_time = t;
    }
    if let Some(t) = cli.feed_time {
        config.dot_feed_time = t;
    }
    config.validate()?;
    Ok(config)
}

fn execute<T: Transport, C: Clock>(
    printer: &mut PrinterSession<T, C>,
    command: &Commands,
) -> Result<(), PrinterError> {
    match command {
        Commands::Demo => demo(printer),
        Commands::Image {
            file,
            line_at_a_time,
            width,
        } => {
            let bitmap = dither::load_bitmap(file, *width)?;
            println!("Printing {} ({}x{})...", file.display(), bitmap.width, bitmap.height);
            printer.flush()?;
            printer.print_image(&bitmap, *line_at_a_time)?;
            printer.feed(2)
        }
        Commands::Text {
            lines,
            align,
            size,
            bold,
        } => {
            printer.justify(Alignment::from(align.as_str()))?;
            printer.set_size(TextSize::from(size.as_str()))?;
            if *bold {
                printer.bold_on()?;
            }
            for line in lines {
                printer.println(line)?;
            }
            printer.set_default()?;
            printer.feed(2)
        }
        Commands::Barcode {
            data,
            barcode_type,
            height,
        } => {
            printer.set_barcode_height(*height)?;
            printer.print_barcode(data, *barcode_type)
        }
        Commands::Ports => Ok(()),
    }
}

/// Exercise every text style, two barcodes and the sleep/wake cycle.
fn demo<T: Transport, C: Clock>(printer: &mut PrinterSession<T, C>) -> Result<(), PrinterError> {
    printer.inverse_on()?;
    printer.println("Inverse ON")?;
    printer.inverse_off()?;

    printer.double_height_on()?;
    printer.println("Double Height ON")?;
    printer.double_height_off()?;

    for (selector, label) in [("R", "Right justified"), ("C", "Center justified"), ("L", "Left justified")] {
        printer.justify(Alignment::from(selector))?;
        printer.println(label)?;
    }

    printer.bold_on()?;
    printer.println("Bold text")?;
    printer.bold_off()?;

    printer.underline_on(1)?;
    printer.println("Underlined text")?;
    printer.underline_off()?;

    for (selector, label) in [("L", "Large"), ("M", "Medium"), ("S", "Small")] {
        printer.set_size(TextSize::from(selector))?;
        printer.println(label)?;
    }

    printer.justify(Alignment::Center)?;
    printer.println("normal\nline\nspacing")?;
    printer.set_line_height(50)?;
    printer.println("Taller\nline\nspacing")?;
    printer.set_line_height(DEFAULT_LINE_HEIGHT)?;
    printer.justify(Alignment::Left)?;

    printer.feed(DEFAULT_FEED_LINES)?;
    printer.print_barcode("ADAFRUT", BarcodeType::Code39)?;
    printer.set_barcode_height(100)?;
    printer.print_barcode("123456789123", BarcodeType::UpcA)?;

    printer.sleep(DEFAULT_SLEEP_SECONDS)?;
    printer.wake()?;
    printer.set_default()
}
