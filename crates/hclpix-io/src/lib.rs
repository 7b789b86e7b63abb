//! hclpix-io - Image I/O for hclpix
//!
//! This crate reads and writes planar images in the uncompressed BMP
//! container.
//!
//! # Data formats
//!
//! Every read and write names a [`DataFormat`] that selects the channel
//! layout of the caller's buffers:
//!
//! - [`DataFormat::Rgb`] / [`DataFormat::Hcl`] with `f64` samples
//! - [`DataFormat::RgbBytes`] / [`DataFormat::HclBytes`] with `u8` samples
//!
//! # File types
//!
//! - BMP (feature `bmp`, enabled by default)
//!
//! The file type comes from an explicit type hint or, when the hint is empty,
//! from the file extension.

pub mod bmp;
mod error;
pub mod format;
pub mod header;
pub mod pixel;

pub use bmp::{BmpDecoder, BmpEncoder, BmpHeader, read_bmp, read_bmp_into, write_bmp, write_bmp_image};
pub use error::{IoError, IoResult};
pub use format::{FileFormat, resolve_format};
pub use header::{ImageHeader, read_bmp_header, read_image_header, read_image_header_mem};
pub use hclpix_core::{DataFormat, Image, Planes, PlanesMut, Sample};

use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Upper bounds on the dimensions a read will accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    /// Maximum image width in pixels
    pub max_width: u32,
    /// Maximum image height in pixels
    pub max_height: u32,
}

impl ReadLimits {
    /// Default bound for both sides
    pub const DEFAULT_MAX_DIMENSION: u32 = 65536;

    /// Limits of `max_width x max_height`.
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Set the maximum width.
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    /// Set the maximum height.
    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = max_height;
        self
    }
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DIMENSION, Self::DEFAULT_MAX_DIMENSION)
    }
}

/// The handle closes when the reader drops. `File` reports no error on
/// close, so a read never yields [`ResultCode::FcloseFailed`](hclpix_core::ResultCode::FcloseFailed).
fn open_for_read(path: &Path) -> IoResult<BufReader<File>> {
    let file = File::open(path).map_err(IoError::Open)?;
    Ok(BufReader::new(file))
}

/// Run `write` against a newly created file, then flush and sync it.
///
/// A failure to flush or sync is reported as [`IoError::Close`], and only
/// when `write` itself succeeded.
fn write_file<F>(path: &Path, write: F) -> IoResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> IoResult<()>,
{
    let file = File::create(path).map_err(IoError::Open)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;

    writer.flush().map_err(IoError::Close)?;
    let file = writer
        .into_inner()
        .map_err(|e| IoError::Close(e.into_error()))?;
    file.sync_all().map_err(IoError::Close)
}

/// Read an image file into a newly allocated [`Image`].
///
/// The file is closed when decoding returns, on success and failure alike.
/// Closing a file opened for reading cannot report an error, so unlike the
/// write functions this never returns [`IoError::Close`].
///
/// # Arguments
///
/// * `path` - File to read
/// * `type_hint` - File type name such as `"bmp"`; empty to use the extension
/// * `format` - Channel layout of the result; must match `T`
/// * `limits` - Largest accepted dimensions
///
/// # Errors
///
/// - [`IoError::InvalidArgument`] if `format` does not match `T`
/// - [`IoError::UnsupportedFormat`] if the file type is not recognized
/// - [`IoError::Open`] if the file cannot be opened
/// - any decoding error; see [`BmpDecoder::decode`]
pub fn read_image<T: Sample, P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    format: DataFormat,
    limits: &ReadLimits,
) -> IoResult<Image<T>> {
    let path = path.as_ref();
    match resolve_format(path, type_hint)? {
        FileFormat::Bmp => {
            let mut decoder = BmpDecoder::<T>::new(format)?;
            let image = decoder.decode(open_for_read(path)?, limits)?;
            debug!(
                "Read {}x{} image from {}",
                image.width(),
                image.height(),
                path.display()
            );
            Ok(image)
        }
    }
}

/// Read an image file into caller-supplied planes.
///
/// Absent planes are skipped; present planes must hold at least
/// `width * height` samples.
///
/// # Returns
///
/// The image's `(width, height)`.
///
/// # Errors
///
/// As for [`read_image`], plus [`IoError::BadDimension`] if a plane is too
/// small. As there, the file is closed on return and a close failure is
/// never reported.
pub fn read_image_into<T: Sample, P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    format: DataFormat,
    limits: &ReadLimits,
    planes: PlanesMut<'_, T>,
) -> IoResult<(u32, u32)> {
    let path = path.as_ref();
    match resolve_format(path, type_hint)? {
        FileFormat::Bmp => {
            let mut decoder = BmpDecoder::<T>::new(format)?;
            decoder.decode_into(open_for_read(path)?, limits, planes)
        }
    }
}

/// Write an [`Image`] to a file.
///
/// The image's alpha plane, if any, selects 32 bpp output.
///
/// # Errors
///
/// - [`IoError::InvalidArgument`] if `format` does not match `T`
/// - [`IoError::UnsupportedFormat`] if the file type is not recognized
/// - [`IoError::Open`] if the file cannot be created
/// - [`IoError::Write`] on a short write
/// - [`IoError::Close`] if the file cannot be flushed to disk
pub fn write_image<T: Sample, P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    format: DataFormat,
    image: &Image<T>,
) -> IoResult<()> {
    write_image_from(
        path,
        type_hint,
        format,
        image.width(),
        image.height(),
        image.planes(),
    )
}

/// Write caller-supplied planes to a file.
///
/// All input is validated before the file is created.
///
/// # Errors
///
/// As for [`write_image`], plus the input errors of [`BmpEncoder::new`].
pub fn write_image_from<T: Sample, P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    format: DataFormat,
    width: u32,
    height: u32,
    planes: Planes<'_, T>,
) -> IoResult<()> {
    let path = path.as_ref();
    match resolve_format(path, type_hint)? {
        FileFormat::Bmp => {
            let mut encoder = BmpEncoder::new(format, width, height, planes)?;
            write_file(path, |writer| encoder.encode(writer))?;
            debug!(
                "Wrote {}x{} image to {}",
                width,
                height,
                path.display()
            );
            Ok(())
        }
    }
}

/// Read an image file as floating-point RGB.
pub fn read_image_rgb<P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    limits: &ReadLimits,
) -> IoResult<Image<f64>> {
    read_image(path, type_hint, DataFormat::Rgb, limits)
}

/// Read an image file as floating-point HCL.
pub fn read_image_hcl<P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    limits: &ReadLimits,
) -> IoResult<Image<f64>> {
    read_image(path, type_hint, DataFormat::Hcl, limits)
}

/// Read an image file as 8-bit RGB.
pub fn read_image_bytes_rgb<P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    limits: &ReadLimits,
) -> IoResult<Image<u8>> {
    read_image(path, type_hint, DataFormat::RgbBytes, limits)
}

/// Read an image file as 8-bit HCL, with hue scaled to 0..=255.
pub fn read_image_bytes_hcl<P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    limits: &ReadLimits,
) -> IoResult<Image<u8>> {
    read_image(path, type_hint, DataFormat::HclBytes, limits)
}

/// Write a floating-point RGB image.
pub fn write_image_rgb<P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    image: &Image<f64>,
) -> IoResult<()> {
    write_image(path, type_hint, DataFormat::Rgb, image)
}

/// Write a floating-point HCL image.
pub fn write_image_hcl<P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    image: &Image<f64>,
) -> IoResult<()> {
    write_image(path, type_hint, DataFormat::Hcl, image)
}

/// Write an 8-bit RGB image.
pub fn write_image_bytes_rgb<P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    image: &Image<u8>,
) -> IoResult<()> {
    write_image(path, type_hint, DataFormat::RgbBytes, image)
}

/// Write an 8-bit HCL image.
pub fn write_image_bytes_hcl<P: AsRef<Path>>(
    path: P,
    type_hint: &str,
    image: &Image<u8>,
) -> IoResult<()> {
    write_image(path, type_hint, DataFormat::HclBytes, image)
}
