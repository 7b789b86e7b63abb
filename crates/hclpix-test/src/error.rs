//! Error types for the test framework

use hclpix_core::{HasResultCode, ResultCode};
use hclpix_io::IoError;
use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to read back an image
    #[error("failed to read image '{path}': {source}")]
    ImageRead {
        path: String,
        #[source]
        source: IoError,
    },

    /// Failed to write an image
    #[error("failed to write image '{path}': {source}")]
    ImageWrite {
        path: String,
        #[source]
        source: IoError,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {message}")]
    DirectoryCreate { path: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HasResultCode for TestError {
    fn code(&self) -> ResultCode {
        match self {
            TestError::ImageRead { source, .. } | TestError::ImageWrite { source, .. } => {
                source.code()
            }
            TestError::DirectoryCreate { .. } => ResultCode::FopenFailed,
            TestError::Io(_) => ResultCode::Unspecified,
        }
    }
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
