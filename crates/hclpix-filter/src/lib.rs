//! hclpix-filter - Pixel-wise batch transforms
//!
//! This crate provides transforms over planar buffers. Neither does any
//! file I/O.
//!
//! - **Level equalization** ([`equalize`]): Redistribute an 8-bit channel so
//!   every level holds (almost) the same number of pixels
//! - **Image difference** ([`diff`]): Visualize where two RGB images differ,
//!   tinting the difference magenta or green over a gray base

pub mod diff;
pub mod equalize;
pub mod error;

// Re-export core types
pub use hclpix_core;

// Re-export error types
pub use error::{FilterError, FilterResult};

pub use diff::{diff_pixel, image_diff, image_diff_planes, pixel_distance};
pub use equalize::{LEVELS, equalize_image_channel, equalize_levels, level_histogram};
