//! hclpix Core - Basic data structures and color math
//!
//! This crate provides the pieces shared by every other hclpix crate:
//!
//! - [`Image`] / [`Planes`] / [`PlanesMut`] - Planar channel buffers
//! - [`Sample`] - `f64` or `u8` channel elements
//! - [`DataFormat`] - RGB / HCL, float / byte selector
//! - [`color`] - Packed pixel words, quantization and RGB <-> HCL math
//! - [`ResultCode`] / [`Error`] - The result-code taxonomy

pub mod color;
pub mod error;
pub mod format;
pub mod image;
pub mod sample;

pub use color::{Hcl, hcl_to_rgb, rgb_to_hcl};
pub use error::{Error, HasResultCode, Result, ResultCode};
pub use format::{ColorModel, DataFormat, SampleKind};
pub use image::{Image, Planes, PlanesMut, pixel_count};
pub use sample::Sample;
