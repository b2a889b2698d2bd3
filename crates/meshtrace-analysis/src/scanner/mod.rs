//! Scanner subsystem: service discovery by directory naming convention and
//! deterministic enumeration of source files below the conventional source root.

pub mod services;
pub mod types;
pub mod walker;

pub use services::{load_analyzed_services, parse_analyzed_services};
pub use types::{ServiceConvention, ServiceSources, SourceFile};
pub use walker::{read_source, SourceWalker};
