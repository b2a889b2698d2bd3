//! meshtrace-core: shared foundation for the meshtrace analysis engine.
//!
//! - Config: TOML-based, layered resolution (CLI > env > project > defaults)
//! - Errors: one `thiserror` enum per subsystem, stable error codes
//! - Tracing: `tracing-subscriber` setup driven by `MESHTRACE_LOG`
//! - Types: HTTP verbs and fast collection aliases

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::MeshtraceConfig;
pub use errors::{MeshtraceErrorCode, PipelineError, PipelineResult};
pub use types::HttpVerb;
