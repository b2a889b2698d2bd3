//! Pipeline errors and non-fatal error collection.

use std::path::PathBuf;

use super::error_code::{self, MeshtraceErrorCode};
use super::{ConfigError, ExtractionError, ScanError};

/// Errors that can occur during pipeline execution.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read artifact {path}: {message}")]
    ArtifactRead { path: PathBuf, message: String },

    #[error("Failed to write artifact {path}: {message}")]
    ArtifactWrite { path: PathBuf, message: String },
}

impl MeshtraceErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Extraction(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::ArtifactRead { .. } | Self::ArtifactWrite { .. } => error_code::ARTIFACT_ERROR,
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some files fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the pipeline run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new pipeline result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: impl Into<PipelineError>) {
        self.errors.push(error.into());
    }

    /// Move the non-fatal errors of another stage into this result.
    pub fn absorb_errors<U: Default>(&mut self, other: &mut PipelineResult<U>) {
        self.errors.append(&mut other.errors);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
