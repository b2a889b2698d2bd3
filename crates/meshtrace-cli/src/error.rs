//! Errors surfaced by the `meshtrace` binary.

use meshtrace_core::errors::error_code::{self, MeshtraceErrorCode};
use meshtrace_core::errors::ConfigError;
use meshtrace_core::PipelineError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Failed to render report: {0}")]
    Render(String),
}

impl MeshtraceErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Pipeline(e) => e.error_code(),
            Self::Render(_) => error_code::PIPELINE_ERROR,
        }
    }
}
