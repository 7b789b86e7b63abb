//! I/O error types
//!
//! Provides a unified error type for all image I/O operations. Every variant
//! maps onto exactly one [`ResultCode`], so callers that only want the code
//! can use [`IoError::code`] or [`ResultCode::of`].

use hclpix_core::{HasResultCode, ResultCode};
use thiserror::Error;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Bad data-format selector or sample type
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The streaming buffer could not be allocated
    #[error("failed to allocate {0} byte pixel buffer")]
    AllocFailed(usize),

    /// The file could not be opened
    #[error("failed to open file: {0}")]
    Open(#[source] std::io::Error),

    /// The file could not be flushed and closed
    #[error("failed to close file: {0}")]
    Close(#[source] std::io::Error),

    /// Missing or corrupt file signature
    #[error("invalid image data: {0}")]
    InvalidFormat(String),

    /// The file type, header size, bit depth or compression is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Short read while streaming pixel data
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),

    /// Short write
    #[error("write error: {0}")]
    Write(#[source] std::io::Error),

    /// Seeking to the pixel data failed
    #[error("seek error: {0}")]
    Seek(#[source] std::io::Error),

    /// Declared size exceeds the caller's limit, or buffers are too small
    #[error("bad dimension: {0}")]
    BadDimension(String),

    /// An error from the core library
    #[error("core error: {0}")]
    Core(#[from] hclpix_core::Error),
}

impl HasResultCode for IoError {
    fn code(&self) -> ResultCode {
        match self {
            IoError::InvalidArgument(_) => ResultCode::InvalidArgument,
            IoError::AllocFailed(_) => ResultCode::AllocFailed,
            IoError::Open(_) => ResultCode::FopenFailed,
            IoError::Close(_) => ResultCode::FcloseFailed,
            IoError::InvalidFormat(_) => ResultCode::InvalidFormat,
            IoError::UnsupportedFormat(_) => ResultCode::UnsupportedFormat,
            IoError::Read(_) => ResultCode::ReadError,
            IoError::Write(_) => ResultCode::WriteError,
            IoError::Seek(_) => ResultCode::SeekError,
            IoError::BadDimension(_) => ResultCode::BadDimension,
            IoError::Core(e) => e.code(),
        }
    }
}

impl IoError {
    /// The result code this error reports.
    pub fn code(&self) -> ResultCode {
        HasResultCode::code(self)
    }
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
