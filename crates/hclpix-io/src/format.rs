//! Image file type resolution
//!
//! The file type comes from an explicit type hint or, when the hint is
//! empty, from the path's extension. Only BMP is recognized, and only while
//! the `bmp` feature is enabled.

use crate::{IoError, IoResult};
use std::path::Path;

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Windows bitmap, uncompressed 24/32 bpp
    Bmp,
}

impl FileFormat {
    /// Canonical file extension
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Bmp => "bmp",
        }
    }

    /// Match a type name such as `"bmp"` or `"BMP"`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        if cfg!(feature = "bmp") && name.eq_ignore_ascii_case("bmp") {
            Some(FileFormat::Bmp)
        } else {
            None
        }
    }
}

/// Text after the last `.` of the path, if any.
pub fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str()).filter(|e| !e.is_empty())
}

/// Resolve the file format for a read or write.
///
/// An empty `type_hint` selects the format from the extension of `path`.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] when neither the hint nor the
/// extension names a supported format.
pub fn resolve_format(path: &Path, type_hint: &str) -> IoResult<FileFormat> {
    let name = if type_hint.is_empty() {
        extension_of(path).unwrap_or("")
    } else {
        type_hint
    };

    FileFormat::from_type_name(name).ok_or_else(|| {
        IoError::UnsupportedFormat(if name.is_empty() {
            format!("cannot determine file type of {}", path.display())
        } else {
            format!("unknown file type: {}", name)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hclpix_core::ResultCode;

    #[test]
    fn test_resolve_from_extension() {
        assert_eq!(
            resolve_format(Path::new("a/b/photo.bmp"), "").unwrap(),
            FileFormat::Bmp
        );
        assert_eq!(
            resolve_format(Path::new("PHOTO.BMP"), "").unwrap(),
            FileFormat::Bmp
        );
        assert_eq!(
            resolve_format(Path::new("photo.Bmp"), "").unwrap(),
            FileFormat::Bmp
        );
    }

    #[test]
    fn test_hint_overrides_extension() {
        assert_eq!(
            resolve_format(Path::new("photo.dat"), "bmp").unwrap(),
            FileFormat::Bmp
        );
        let err = resolve_format(Path::new("photo.bmp"), "png").unwrap_err();
        assert_eq!(err.code(), ResultCode::UnsupportedFormat);
    }

    #[test]
    fn test_unresolvable() {
        for path in ["photo", "photo.", "photo.png", ".hidden"] {
            let err = resolve_format(Path::new(path), "").unwrap_err();
            assert_eq!(err.code(), ResultCode::UnsupportedFormat, "{path}");
        }
    }
}
