//! Scanner configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for service discovery and source-file enumeration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Source root segment looked up below each service. Default: "src/main/java".
    pub source_root: Option<String>,
    /// Extension of scanned source files. Default: "java".
    pub source_extension: Option<String>,
    /// File name suffix of endpoint-declaring units. Default: "Controller.java".
    pub endpoint_file_suffix: Option<String>,
    /// Files containing this marker are skipped when extracting call sites. Default: "Test".
    pub excluded_file_marker: Option<String>,
    /// Service directory prefix. Default: "ts-".
    pub service_prefix: Option<String>,
    /// Service directory suffix. Default: "-service".
    pub service_suffix: Option<String>,
    /// Maximum file size in bytes. Default: 1MB.
    pub max_file_size: Option<u64>,
    /// Number of threads (0 = auto). Default: 0.
    pub threads: Option<usize>,
    /// Honour .gitignore files while walking. Default: false.
    pub respect_gitignore: Option<bool>,
}

impl ScanConfig {
    pub fn effective_source_root(&self) -> &str {
        self.source_root
            .as_deref()
            .unwrap_or(constants::DEFAULT_SOURCE_ROOT)
    }

    pub fn effective_source_extension(&self) -> &str {
        self.source_extension
            .as_deref()
            .unwrap_or(constants::DEFAULT_SOURCE_EXTENSION)
    }

    pub fn effective_endpoint_file_suffix(&self) -> &str {
        self.endpoint_file_suffix
            .as_deref()
            .unwrap_or(constants::DEFAULT_ENDPOINT_FILE_SUFFIX)
    }

    pub fn effective_excluded_file_marker(&self) -> &str {
        self.excluded_file_marker
            .as_deref()
            .unwrap_or(constants::DEFAULT_EXCLUDED_FILE_MARKER)
    }

    pub fn effective_service_prefix(&self) -> &str {
        self.service_prefix
            .as_deref()
            .unwrap_or(constants::DEFAULT_SERVICE_PREFIX)
    }

    pub fn effective_service_suffix(&self) -> &str {
        self.service_suffix
            .as_deref()
            .unwrap_or(constants::DEFAULT_SERVICE_SUFFIX)
    }

    /// Returns the effective max file size, defaulting to 1MB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(constants::DEFAULT_MAX_FILE_SIZE)
    }

    /// Returns the effective thread count, defaulting to 0 (auto).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(constants::DEFAULT_THREADS)
    }

    pub fn effective_respect_gitignore(&self) -> bool {
        self.respect_gitignore.unwrap_or(false)
    }
}
