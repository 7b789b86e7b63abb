//! Error types for hclpix-filter

use hclpix_core::{HasResultCode, ResultCode};
use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] hclpix_core::Error),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

impl HasResultCode for FilterError {
    fn code(&self) -> ResultCode {
        match self {
            FilterError::Core(e) => e.code(),
            FilterError::InvalidParameters(_) => ResultCode::InvalidArgument,
        }
    }
}

impl FilterError {
    /// The result code this error reports.
    pub fn code(&self) -> ResultCode {
        HasResultCode::code(self)
    }
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
