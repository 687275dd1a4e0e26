//! # Printer Module
//!
//! A paced session over one connected printer.
//!
//! ## Modules
//!
//! - [`config`]: Link speed and timing parameters per printer model
//! - [`timing`]: Busy-window model and clocks
//! - [`state`]: Mirrored text style and line geometry
//! - [`session`]: The session itself and its command operations
//! - [`writer`]: Paced text output
//! - [`bitmap`]: Raster image transfer
//! - [`barcode`]: Barcode transfer

pub mod barcode;
pub mod bitmap;
pub mod config;
pub mod session;
pub mod state;
pub mod timing;
pub mod writer;

pub use bitmap::Bitmap;
pub use config::{PrinterConfig, RasterPacing};
pub use session::{HeatConfig, PrinterSession};
pub use state::FormattingState;
pub use timing::{Clock, ManualClock, SystemClock, TimingModel};
