//! Error types for hclpix-color

use hclpix_core::{HasResultCode, ResultCode};
use thiserror::Error;

/// Errors that can occur during color conversion
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] hclpix_core::Error),

    /// A required plane was not supplied
    #[error("missing {0} plane")]
    MissingPlane(&'static str),

    /// Planes of one conversion differ in length
    #[error("plane length mismatch: expected {expected}, got {actual}")]
    PlaneLength { expected: usize, actual: usize },
}

impl HasResultCode for ColorError {
    fn code(&self) -> ResultCode {
        match self {
            ColorError::Core(e) => e.code(),
            ColorError::MissingPlane(_) => ResultCode::InvalidArgument,
            ColorError::PlaneLength { .. } => ResultCode::BadDimension,
        }
    }
}

impl ColorError {
    /// The result code this error reports.
    pub fn code(&self) -> ResultCode {
        HasResultCode::code(self)
    }
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;
