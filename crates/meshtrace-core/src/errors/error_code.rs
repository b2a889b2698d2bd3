//! MeshtraceErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable
/// code alongside its human-readable message.
pub trait MeshtraceErrorCode {
    /// Returns the error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn display_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const MISSING_INPUT: &str = "MISSING_INPUT";
pub const EXTRACTION_ERROR: &str = "EXTRACTION_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const ARTIFACT_ERROR: &str = "ARTIFACT_ERROR";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
