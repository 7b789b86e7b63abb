//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::{regout_dir, regout_path};
use hclpix_core::{DataFormat, Image, Sample};
use hclpix_io::{ReadLimits, read_image, write_image};
use std::fs;
use std::path::PathBuf;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Check results and remove written files (default)
    #[default]
    Compare,
    /// Check results and keep written files
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "bmpio")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
    /// Files written by this run
    written: Vec<PathBuf>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "bmpio")
    ///
    /// # Returns
    ///
    /// A new `RegParams` instance configured from the `REGTEST_MODE`
    /// environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ))
        } else {
            true
        }
    }

    /// Compare two byte arrays for exact equality
    pub fn compare_bytes(&mut self, expected: &[u8], actual: &[u8]) -> bool {
        self.index += 1;

        if expected != actual {
            let first = expected
                .iter()
                .zip(actual)
                .position(|(a, b)| a != b)
                .unwrap_or(expected.len().min(actual.len()));
            self.fail(format!(
                "Failure in {}_reg: byte comparison for index {}\n\
                 sizes: {} vs {}, first difference at {}",
                self.test_name,
                self.index,
                expected.len(),
                actual.len(),
                first
            ))
        } else {
            true
        }
    }

    /// Compare two channel planes element by element
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected samples
    /// * `actual` - Actual samples
    /// * `delta` - Maximum allowed difference per element
    ///
    /// # Returns
    ///
    /// `true` if the planes have equal length and every element matches
    /// within delta.
    pub fn compare_channels<T>(&mut self, expected: &[T], actual: &[T], delta: f64) -> bool
    where
        T: Copy + Into<f64>,
    {
        self.index += 1;

        if expected.len() != actual.len() {
            return self.fail(format!(
                "Failure in {}_reg: channel comparison for index {} - length {} vs {}",
                self.test_name,
                self.index,
                expected.len(),
                actual.len()
            ));
        }

        let mismatch = expected
            .iter()
            .zip(actual)
            .enumerate()
            .find_map(|(i, (&e, &a))| {
                let (e, a): (f64, f64) = (e.into(), a.into());
                ((e - a).abs() > delta).then_some((i, e, a))
            });

        match mismatch {
            Some((i, e, a)) => self.fail(format!(
                "Failure in {}_reg: channel comparison for index {} - element {}: \
                 expected {}, actual {}, allowed delta {}",
                self.test_name, self.index, i, e, a, delta
            )),
            None => true,
        }
    }

    /// Compare two images: dimensions, all three channels and alpha
    ///
    /// Counts as a single check.
    pub fn compare_images<T>(&mut self, expected: &Image<T>, actual: &Image<T>, delta: f64) -> bool
    where
        T: Sample + Into<f64>,
    {
        if expected.width() != actual.width() || expected.height() != actual.height() {
            self.index += 1;
            return self.fail(format!(
                "Failure in {}_reg: image comparison for index {} - {}x{} vs {}x{}",
                self.test_name,
                self.index,
                expected.width(),
                expected.height(),
                actual.width(),
                actual.height()
            ));
        }

        if expected.has_alpha() != actual.has_alpha() {
            self.index += 1;
            return self.fail(format!(
                "Failure in {}_reg: image comparison for index {} - alpha presence differs",
                self.test_name, self.index
            ));
        }

        let start = self.index;
        let mut same = true;
        for ch in 0..3 {
            same &= self.compare_channels(expected.channel(ch), actual.channel(ch), delta);
        }
        if let (Some(e), Some(a)) = (expected.alpha(), actual.alpha()) {
            same &= self.compare_channels(e, a, delta);
        }
        self.index = start + 1;
        same
    }

    /// Write an image to the regout directory, read it back and compare
    ///
    /// # Arguments
    ///
    /// * `image` - Image to write
    /// * `format` - Data format for both the write and the read
    /// * `delta` - Allowed per-sample difference after the round trip
    ///
    /// # Returns
    ///
    /// The image as read back.
    pub fn write_image_and_check<T>(
        &mut self,
        image: &Image<T>,
        format: DataFormat,
        delta: f64,
    ) -> TestResult<Image<T>>
    where
        T: Sample + Into<f64>,
    {
        let path = self.next_output_path("bmp")?;
        let shown = path.display().to_string();

        write_image(&path, "", format, image).map_err(|source| TestError::ImageWrite {
            path: shown.clone(),
            source,
        })?;
        self.written.push(path.clone());

        let back = read_image::<T, _>(&path, "", format, &ReadLimits::default())
            .map_err(|source| TestError::ImageRead { path: shown, source })?;

        self.compare_images(image, &back, delta);
        Ok(back)
    }

    /// Path of the next numbered output file; does not advance the index
    pub fn next_output_path(&self, ext: &str) -> TestResult<PathBuf> {
        let dir = regout_dir();
        fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(regout_path(&self.test_name, self.index + 1, ext))
    }

    /// Clean up and report results
    ///
    /// Outside display mode, removes every file this run wrote.
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if !self.display() {
            for path in &self.written {
                let _ = fs::remove_file(path);
            }
        }

        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_env() {
        let mode = RegTestMode::from_env();
        assert!(matches!(mode, RegTestMode::Compare | RegTestMode::Display));
    }

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.index(), 3);
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_channels() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_channels(&[1u8, 2, 3], &[1u8, 3, 3], 1.0));
        assert!(!rp.compare_channels(&[1u8, 2, 3], &[1u8, 2], 0.0));
        assert!(!rp.compare_channels(&[0.5f64], &[0.75f64], 0.1));
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_images_counts_once() {
        let mut rp = RegParams::new("test");
        let a = Image::<u8>::new(2, 2).unwrap();
        let mut b = a.clone();
        assert!(rp.compare_images(&a, &b, 0.0));
        assert_eq!(rp.index(), 1);
        b.set(1, 1, [0, 9, 0]).unwrap();
        assert!(!rp.compare_images(&a, &b, 0.0));
        assert_eq!(rp.index(), 2);
    }

    #[test]
    fn test_compare_bytes() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_bytes(b"abc", b"abc"));
        assert!(!rp.compare_bytes(b"abc", b"abd"));
    }
}
