//! hclpix-color - Color model conversion
//!
//! This crate converts whole images and plane sets between additive RGB and
//! the hue/chroma/luma (HCL) model:
//!
//! - **Image conversion** ([`colorspace`]): [`convert_rgb_to_hcl`],
//!   [`convert_hcl_to_rgb`]
//! - **Plane conversion** ([`colorspace`]): [`convert_planes_rgb_to_hcl`],
//!   [`convert_planes_hcl_to_rgb`] over caller-owned buffers
//!
//! Both `f64` and `u8` samples are supported; byte hue is scaled from
//! 0..6 onto 0..=255. Per-pixel math lives in [`hclpix_core::color`].

pub mod colorspace;
pub mod error;

// Re-export core types
pub use hclpix_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export conversions
pub use colorspace::{
    convert_hcl_to_rgb, convert_planes_hcl_to_rgb, convert_planes_rgb_to_hcl, convert_rgb_to_hcl,
};
pub use hclpix_core::color::{Hcl, hcl_to_rgb, rgb_to_hcl};
