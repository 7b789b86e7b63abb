//! hclpix - BMP codec and RGB/HCL color pipeline
//!
//! # Overview
//!
//! hclpix reads and writes uncompressed 24/32-bit BMP files into planar
//! channel buffers and provides:
//!
//! - Image I/O with four data formats: RGB and HCL, as `f64` or `u8`
//! - Batch RGB <-> HCL (hue, chroma, luma) conversion
//! - Level equalization of an 8-bit channel
//! - Perceptual difference rendering of two RGB images
//!
//! # Example
//!
//! ```
//! use hclpix::{DataFormat, Image};
//! use std::io::Cursor;
//!
//! let image = Image::from_channels(2, 1, vec![255u8, 0], vec![0, 255], vec![0, 0], None).unwrap();
//!
//! let mut bmp = Vec::new();
//! hclpix::io::write_bmp_image(&mut bmp, DataFormat::RgbBytes, &image).unwrap();
//! assert_eq!(bmp.len(), 54 + 8);
//!
//! let limits = hclpix::io::ReadLimits::default();
//! let hcl: Image<u8> = hclpix::io::read_bmp(Cursor::new(bmp), DataFormat::HclBytes, &limits).unwrap();
//! assert_eq!(hcl.channel(1), &[255, 255]);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use hclpix_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use hclpix_color as colorspace;
pub use hclpix_filter as filter;
pub use hclpix_io as io;
