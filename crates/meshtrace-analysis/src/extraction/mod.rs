//! Extraction strategies: the pluggable boundary between source text and
//! the structural facts the rest of the engine consumes.

pub mod regex_strategy;

pub use regex_strategy::SpringRegexStrategy;

use std::ops::Range;

use meshtrace_core::HttpVerb;

/// A mapping annotation resolved to the method it decorates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDeclaration {
    /// Declaring unit name, e.g. `OrderController`.
    pub declaring_type: String,
    /// Name of the handler method the annotation decorates.
    pub method_name: String,
    /// Class-level base path joined with the method-level path, slashes
    /// trimmed, `{var}` placeholders kept.
    pub path: String,
    pub verb: HttpVerb,
}

/// A method header together with the byte range of the text attributed to it:
/// from the end of its header to the start of the next header (or end of file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpan {
    pub name: String,
    pub body: Range<usize>,
}

/// An HTTP client invocation found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCallSite {
    /// `package.Unit.method`, or `package.Unit.unknown` when the site precedes
    /// every method header.
    pub source_method: String,
    pub target_service: String,
    pub endpoint: String,
    pub verb: HttpVerb,
}

/// Source-text extraction contract. Implementations must be stateless with
/// respect to the files they read so services can be processed in parallel.
pub trait ExtractionStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Endpoint declarations in one endpoint-declaring unit.
    fn extract_endpoints(&self, source: &str, file_name: &str) -> Vec<EndpointDeclaration>;

    /// Method headers in file order with their attributed text ranges.
    fn extract_methods_and_bodies(&self, source: &str) -> Vec<MethodSpan>;

    /// Every `identifier(` occurrence in a body, in textual order.
    fn extract_call_identifiers(&self, body: &str) -> Vec<String>;

    /// Outbound HTTP client calls in one unit, in textual order.
    fn extract_call_sites(&self, source: &str, file_name: &str) -> Vec<RawCallSite>;
}
