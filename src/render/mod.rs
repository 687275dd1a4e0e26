//! # Rendering Module
//!
//! Image preprocessing for the raster transfer.
//!
//! ## Modules
//!
//! - [`dither`]: Resize, Atkinson dithering and MSB-first row packing
//!
//! ## Usage Example
//!
//! ```no_run
//! use thermalprinter::render::dither;
//!
//! let bitmap = dither::load_bitmap("photo.jpg", 384)?;
//! println!("{}x{}", bitmap.width, bitmap.height);
//! # Ok::<(), thermalprinter::PrinterError>(())
//! ```

pub mod dither;
