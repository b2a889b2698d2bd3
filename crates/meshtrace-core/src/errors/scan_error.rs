//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, MeshtraceErrorCode};

/// Errors that can occur while discovering services and reading sources.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("IO error scanning {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Required input not found: {path}")]
    MissingInput { path: PathBuf },

    #[error("Walk error under {root}: {message}")]
    WalkFailed { root: PathBuf, message: String },

    #[error("File too large: {path} ({size} bytes, max {max})")]
    MaxFileSizeExceeded { path: PathBuf, size: u64, max: u64 },
}

impl MeshtraceErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => error_code::MISSING_INPUT,
            _ => error_code::SCAN_ERROR,
        }
    }
}
