//! Top-level meshtrace configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{MatchPolicy, MatchingConfig, OutputConfig, ScanConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`MESHTRACE_*`)
/// 3. Project config (`meshtrace.toml` in the analysis root, or an explicit file)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MeshtraceConfig {
    pub scan: ScanConfig,
    pub matching: MatchingConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub match_policy: Option<MatchPolicy>,
    pub scan_threads: Option<usize>,
    pub scan_max_file_size: Option<u64>,
    pub analyzed_services_file: Option<String>,
    pub interactions_file: Option<String>,
    pub chains_file: Option<String>,
}

impl MeshtraceConfig {
    /// Load configuration from `meshtrace.toml` in `root` (if present),
    /// then environment variables, then CLI flags.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::finish(config, cli_overrides)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_file(path: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        Self::merge_toml_file(&mut config, path)?;
        Self::finish(config, cli_overrides)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn finish(mut config: Self, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &MeshtraceConfig) -> Result<(), ConfigError> {
        if config.scan.effective_source_root().trim_matches('/').is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "scan.source_root".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if config.scan.effective_source_extension().trim_start_matches('.').is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "scan.source_extension".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if config.scan.effective_max_file_size() == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.scan.effective_service_prefix().is_empty()
            && config.scan.effective_service_suffix().is_empty()
        {
            return Err(ConfigError::ValidationFailed {
                field: "scan.service_prefix".to_string(),
                message: "service prefix and suffix cannot both be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut MeshtraceConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: MeshtraceConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut MeshtraceConfig, other: &MeshtraceConfig) {
        // Scan
        if other.scan.source_root.is_some() {
            base.scan.source_root = other.scan.source_root.clone();
        }
        if other.scan.source_extension.is_some() {
            base.scan.source_extension = other.scan.source_extension.clone();
        }
        if other.scan.endpoint_file_suffix.is_some() {
            base.scan.endpoint_file_suffix = other.scan.endpoint_file_suffix.clone();
        }
        if other.scan.excluded_file_marker.is_some() {
            base.scan.excluded_file_marker = other.scan.excluded_file_marker.clone();
        }
        if other.scan.service_prefix.is_some() {
            base.scan.service_prefix = other.scan.service_prefix.clone();
        }
        if other.scan.service_suffix.is_some() {
            base.scan.service_suffix = other.scan.service_suffix.clone();
        }
        if other.scan.max_file_size.is_some() {
            base.scan.max_file_size = other.scan.max_file_size;
        }
        if other.scan.threads.is_some() {
            base.scan.threads = other.scan.threads;
        }
        if other.scan.respect_gitignore.is_some() {
            base.scan.respect_gitignore = other.scan.respect_gitignore;
        }

        // Matching
        if other.matching.policy.is_some() {
            base.matching.policy = other.matching.policy;
        }

        // Output
        if other.output.analyzed_services_file.is_some() {
            base.output.analyzed_services_file = other.output.analyzed_services_file.clone();
        }
        if other.output.interactions_file.is_some() {
            base.output.interactions_file = other.output.interactions_file.clone();
        }
        if other.output.chains_file.is_some() {
            base.output.chains_file = other.output.chains_file.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `MESHTRACE_SCAN_MAX_FILE_SIZE`, `MESHTRACE_MATCHING_POLICY`, etc.
    fn apply_env_overrides(config: &mut MeshtraceConfig) {
        if let Ok(val) = std::env::var("MESHTRACE_SCAN_SOURCE_ROOT") {
            config.scan.source_root = Some(val);
        }
        if let Ok(val) = std::env::var("MESHTRACE_SCAN_SERVICE_PREFIX") {
            config.scan.service_prefix = Some(val);
        }
        if let Ok(val) = std::env::var("MESHTRACE_SCAN_SERVICE_SUFFIX") {
            config.scan.service_suffix = Some(val);
        }
        if let Ok(val) = std::env::var("MESHTRACE_SCAN_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.scan.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MESHTRACE_SCAN_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.scan.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("MESHTRACE_MATCHING_POLICY") {
            match val.parse::<MatchPolicy>() {
                Ok(policy) => config.matching.policy = Some(policy),
                Err(message) => tracing::warn!(%message, "ignoring MESHTRACE_MATCHING_POLICY"),
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut MeshtraceConfig, cli: &CliOverrides) {
        if let Some(v) = cli.match_policy {
            config.matching.policy = Some(v);
        }
        if let Some(v) = cli.scan_threads {
            config.scan.threads = Some(v);
        }
        if let Some(v) = cli.scan_max_file_size {
            config.scan.max_file_size = Some(v);
        }
        if let Some(ref v) = cli.analyzed_services_file {
            config.output.analyzed_services_file = Some(v.clone());
        }
        if let Some(ref v) = cli.interactions_file {
            config.output.interactions_file = Some(v.clone());
        }
        if let Some(ref v) = cli.chains_file {
            config.output.chains_file = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
