//! Error types for hclpix-core
//!
//! Provides the closed result-code taxonomy shared by every crate in the
//! workspace, plus the error type for core operations. Each crate defines its
//! own error enum that wraps this one and maps onto a [`ResultCode`].

use thiserror::Error;

/// Outcome of a library operation.
///
/// The set is closed: every fallible operation maps to exactly one code.
/// The integer values are stable and may be handed to foreign callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ResultCode {
    /// Operation succeeded
    Ok = 0,
    /// Bad data-format selector or mismatched argument
    InvalidArgument = -2,
    /// Streaming buffer could not be allocated
    AllocFailed = -3,
    /// File could not be opened
    FopenFailed = -4,
    /// Missing or wrong file signature
    InvalidFormat = -5,
    /// Unrecognized file type, sub-header size, bit depth or compression
    UnsupportedFormat = -6,
    /// Short read
    ReadError = -7,
    /// Seek to the pixel data failed
    SeekError = -8,
    /// Short write
    WriteError = -9,
    /// Stream ended before all pixel rows were read
    IncompleteRead = -10,
    /// Stream accepted fewer pixel rows than requested
    IncompleteWrite = -11,
    /// Dimension out of range or mismatched between images
    BadDimension = -12,
    /// File could not be closed cleanly
    FcloseFailed = -13,
    /// Catch-all
    #[default]
    Unspecified = -1000,
}

impl ResultCode {
    /// Integer value of the code.
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Look up a code from its integer value.
    pub fn from_value(value: i32) -> Option<Self> {
        Some(match value {
            0 => Self::Ok,
            -2 => Self::InvalidArgument,
            -3 => Self::AllocFailed,
            -4 => Self::FopenFailed,
            -5 => Self::InvalidFormat,
            -6 => Self::UnsupportedFormat,
            -7 => Self::ReadError,
            -8 => Self::SeekError,
            -9 => Self::WriteError,
            -10 => Self::IncompleteRead,
            -11 => Self::IncompleteWrite,
            -12 => Self::BadDimension,
            -13 => Self::FcloseFailed,
            -1000 => Self::Unspecified,
            _ => return None,
        })
    }

    /// Whether this code signals success.
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// Collapse a result into its code.
    pub fn of<T, E: HasResultCode>(result: &std::result::Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => e.code(),
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::InvalidArgument => "invalid argument",
            Self::AllocFailed => "allocation failed",
            Self::FopenFailed => "fopen failed",
            Self::InvalidFormat => "invalid format",
            Self::UnsupportedFormat => "unsupported format",
            Self::ReadError => "read error",
            Self::SeekError => "seek error",
            Self::WriteError => "write error",
            Self::IncompleteRead => "incomplete read",
            Self::IncompleteWrite => "incomplete write",
            Self::BadDimension => "bad dimension",
            Self::FcloseFailed => "fclose failed",
            Self::Unspecified => "unspecified",
        };
        write!(f, "{} ({})", name, self.value())
    }
}

/// Errors that can be reduced to a [`ResultCode`].
pub trait HasResultCode {
    /// The result code this error reports.
    fn code(&self) -> ResultCode;
}

/// hclpix-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// A channel buffer does not hold `width*height` elements
    #[error("channel {channel} has {actual} elements, expected {expected}")]
    ChannelLength {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    /// Image dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Memory allocation failed
    #[error("memory allocation failed")]
    AllocationFailed,
}

impl HasResultCode for Error {
    fn code(&self) -> ResultCode {
        match self {
            Error::InvalidDimension { .. }
            | Error::ChannelLength { .. }
            | Error::DimensionMismatch { .. } => ResultCode::BadDimension,
            Error::IndexOutOfBounds { .. } | Error::InvalidParameter(_) => {
                ResultCode::InvalidArgument
            }
            Error::AllocationFailed => ResultCode::AllocFailed,
        }
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
