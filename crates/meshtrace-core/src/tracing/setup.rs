//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize the meshtrace tracing/logging system.
///
/// Reads the `MESHTRACE_LOG` environment variable for per-module log levels.
/// Format: `MESHTRACE_LOG=meshtrace_analysis::chains=debug,meshtrace_analysis=info`
///
/// Falls back to `meshtrace=info` if `MESHTRACE_LOG` is not set or is invalid.
///
/// This function is idempotent: calling it multiple times is safe.
pub fn init_tracing() {
    init_tracing_with_default("meshtrace=info");
}

/// Same as [`init_tracing`], with a caller-supplied fallback directive.
///
/// Output goes to stderr so JSON artifacts written to stdout stay clean.
pub fn init_tracing_with_default(default_directive: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
