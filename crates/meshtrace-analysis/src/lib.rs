//! meshtrace-analysis: interaction-chain construction engine.
//!
//! Reconstructs the inter-service call graph of a microservice codebase
//! from source text and derives the chains of HTTP calls that fan out from
//! externally triggered methods.
//!
//! - Scanner: service discovery and deterministic source enumeration
//! - Extraction: pluggable strategy (regex-based Spring/RestTemplate by default)
//! - Catalog: declared endpoints per service
//! - Call graph / Reachability: intra-service method reachability
//! - Interactions: outbound call sites and the interaction results artifact
//! - Matching: call site → declared endpoint resolution
//! - Chains: recursive chain tracing with loop markers and deduplication
//! - Compare: consistency check between chains and interaction results

pub mod artifacts;
pub mod call_graph;
pub mod catalog;
pub mod chains;
pub mod compare;
pub mod extraction;
pub mod interactions;
pub mod matching;
pub mod pipeline;
pub mod reachability;
pub mod scanner;

pub use catalog::{Catalog, DeclaredEndpoint};
pub use chains::{ChainForest, ChainNode, ChainTracer};
pub use extraction::{ExtractionStrategy, SpringRegexStrategy};
pub use interactions::{InteractionResults, OutboundCallSite};
pub use matching::InteractionMatcher;
pub use pipeline::{AnalysisOutput, Pipeline, ServiceModel};
pub use reachability::ReachableIndex;
