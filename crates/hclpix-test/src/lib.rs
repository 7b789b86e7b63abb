//! hclpix-test - Regression test framework for hclpix
//!
//! This crate provides a small regression test framework supporting two
//! modes:
//!
//! - **Compare**: Check results and remove the files a test wrote (default)
//! - **Display**: Check results and keep written files for inspection
//!
//! # Usage
//!
//! ```ignore
//! use hclpix_test::{RegParams, synth};
//!
//! let mut rp = RegParams::new("bmpio");
//! let image = synth::gradient_rgb(64, 32);
//! rp.write_image_and_check(&image, DataFormat::RgbBytes, 0.0)?;
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use std::path::PathBuf;

/// Get the path to the workspace root
fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // hclpix-test is at crates/hclpix-test, so go up two directories
    PathBuf::from(manifest_dir).join("../..")
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> PathBuf {
    workspace_root().join("tests").join("regout")
}

/// Path of output file `index` of regression test `test_name`
///
/// Files are named `<test_name>.<index>.<ext>` with a two-digit index.
pub fn regout_path(test_name: &str, index: usize, ext: &str) -> PathBuf {
    regout_dir().join(format!("{}.{:02}.{}", test_name, index, ext))
}
