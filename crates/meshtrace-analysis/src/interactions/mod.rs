//! Outbound interactions: HTTP client call sites and the aggregated
//! interaction results artifact.

pub mod extractor;
pub mod types;

pub use extractor::OutboundCallExtractor;
pub use types::{InteractionResults, OutboundCallSite, ServiceRelation};
