//! Image header reading
//!
//! Provides metadata extraction from image files without decoding pixel data.

use crate::bmp::BmpHeader;
use crate::format::{FileFormat, resolve_format};
use crate::{IoError, IoResult};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// Image metadata read without decoding pixel data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHeader {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per pixel (24 or 32)
    pub bits_per_pixel: u16,
    /// Whether pixels carry an alpha byte
    pub has_alpha: bool,
    /// Offset of the pixel data from the start of the file
    pub pixel_offset: u32,
    /// Declared total file size
    pub file_size: u32,
    /// Declared pixel data size
    pub bitmap_size: u32,
    /// Horizontal resolution in pixels per meter
    pub x_resolution: i32,
    /// Vertical resolution in pixels per meter
    pub y_resolution: i32,
    /// Container format
    pub format: FileFormat,
}

impl From<BmpHeader> for ImageHeader {
    fn from(header: BmpHeader) -> Self {
        Self {
            width: header.width(),
            height: header.height(),
            bits_per_pixel: header.bits_per_pixel,
            has_alpha: header.bits_per_pixel == 32,
            pixel_offset: header.pixel_offset,
            file_size: header.file_size,
            bitmap_size: header.bitmap_size,
            x_resolution: header.x_pixels_per_meter,
            y_resolution: header.y_pixels_per_meter,
            format: FileFormat::Bmp,
        }
    }
}

/// Read BMP metadata from a stream.
///
/// The header is validated as on a full read, except that no size limit
/// applies.
///
/// # Errors
///
/// See [`BmpHeader::read_from`] and [`BmpHeader::validate`].
pub fn read_bmp_header<R: Read>(mut reader: R) -> IoResult<ImageHeader> {
    let header = BmpHeader::read_from(&mut reader)?;
    header.validate(None)?;
    Ok(header.into())
}

/// Read image metadata from a file path without decoding pixel data.
///
/// The format is resolved from the extension.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for an unknown extension,
/// [`IoError::Open`] if the file cannot be opened, or any header error.
pub fn read_image_header<P: AsRef<Path>>(path: P) -> IoResult<ImageHeader> {
    let path = path.as_ref();
    match resolve_format(path, "")? {
        FileFormat::Bmp => {
            let file = File::open(path).map_err(IoError::Open)?;
            read_bmp_header(BufReader::new(file))
        }
    }
}

/// Read image metadata from bytes without decoding pixel data.
pub fn read_image_header_mem(data: &[u8]) -> IoResult<ImageHeader> {
    read_bmp_header(Cursor::new(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hclpix_core::ResultCode;

    #[test]
    fn test_header_mem() {
        let mut data = BmpHeader::for_image(5, 7, 32).unwrap().to_bytes().to_vec();
        // The probe never touches pixel data.
        data.truncate(54);
        let header = read_image_header_mem(&data).unwrap();
        assert_eq!((header.width, header.height), (5, 7));
        assert_eq!(header.bits_per_pixel, 32);
        assert!(header.has_alpha);
        assert_eq!(header.pixel_offset, 54);
        assert_eq!(header.bitmap_size, 140);
        assert_eq!(header.file_size, 194);
        assert_eq!(header.x_resolution, 4000);
        assert_eq!(header.format, FileFormat::Bmp);
    }

    #[test]
    fn test_header_mem_errors() {
        let err = read_image_header_mem(b"PK\x03\x04").unwrap_err();
        assert_eq!(err.code(), ResultCode::InvalidFormat);

        let mut data = BmpHeader::for_image(1, 1, 24).unwrap().to_bytes();
        data[28] = 8;
        let err = read_image_header_mem(&data).unwrap_err();
        assert_eq!(err.code(), ResultCode::UnsupportedFormat);
    }

    #[test]
    fn test_header_unknown_extension() {
        let err = read_image_header("image.tif").unwrap_err();
        assert_eq!(err.code(), ResultCode::UnsupportedFormat);
    }
}
