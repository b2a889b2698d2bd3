//! Extraction errors.

use super::error_code::{self, MeshtraceErrorCode};

/// Errors raised while building an extraction strategy.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Invalid pattern {name}: {message}")]
    InvalidPattern { name: String, message: String },

    #[error("Invalid path template {template}: {message}")]
    InvalidTemplate { template: String, message: String },
}

impl MeshtraceErrorCode for ExtractionError {
    fn error_code(&self) -> &'static str {
        error_code::EXTRACTION_ERROR
    }
}
