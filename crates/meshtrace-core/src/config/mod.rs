//! Configuration system for meshtrace.
//! TOML-based, layered resolution: CLI > env > project > defaults.

pub mod matching_config;
pub mod meshtrace_config;
pub mod output_config;
pub mod scan_config;

pub use matching_config::{MatchPolicy, MatchingConfig};
pub use meshtrace_config::{CliOverrides, MeshtraceConfig};
pub use output_config::OutputConfig;
pub use scan_config::ScanConfig;
