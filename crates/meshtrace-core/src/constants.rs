//! Shared constants for the meshtrace analysis engine.

/// meshtrace version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Project-level config file name, looked up in the analysis root.
pub const CONFIG_FILE_NAME: &str = "meshtrace.toml";

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "MESHTRACE_LOG";

/// Conventional source root segment below each service directory.
pub const DEFAULT_SOURCE_ROOT: &str = "src/main/java";

/// Extension of scanned source files.
pub const DEFAULT_SOURCE_EXTENSION: &str = "java";

/// File name suffix of endpoint-declaring units.
pub const DEFAULT_ENDPOINT_FILE_SUFFIX: &str = "Controller.java";

/// Files whose name contains this marker are skipped by the outbound call extractor.
pub const DEFAULT_EXCLUDED_FILE_MARKER: &str = "Test";

/// Service directory naming convention: prefix.
pub const DEFAULT_SERVICE_PREFIX: &str = "ts-";

/// Service directory naming convention: suffix.
pub const DEFAULT_SERVICE_SUFFIX: &str = "-service";

/// Maximum file size in bytes for scanning (default: 1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Default number of threads (0 = auto-detect).
pub const DEFAULT_THREADS: usize = 0;

/// Default analyzed-services list, relative to the analysis root.
pub const DEFAULT_ANALYZED_SERVICES_FILE: &str = "analyzed_services.txt";

/// Default interaction results artifact, relative to the analysis root.
pub const DEFAULT_INTERACTIONS_FILE: &str = "interactions_results.json";

/// Default interaction chains artifact, relative to the analysis root.
pub const DEFAULT_CHAINS_FILE: &str = "interaction_chain.json";

/// Placeholder for an enclosing method, package or endpoint that could not be resolved.
pub const UNKNOWN: &str = "unknown";
