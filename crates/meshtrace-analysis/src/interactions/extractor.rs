//! Attributes HTTP client call sites to their source service.

use super::types::OutboundCallSite;
use crate::extraction::ExtractionStrategy;

pub struct OutboundCallExtractor<'a> {
    strategy: &'a dyn ExtractionStrategy,
    excluded_marker: &'a str,
}

impl<'a> OutboundCallExtractor<'a> {
    pub fn new(strategy: &'a dyn ExtractionStrategy, excluded_marker: &'a str) -> Self {
        Self {
            strategy,
            excluded_marker,
        }
    }

    /// Files whose name carries the exclusion marker (test units) are skipped.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        !self.excluded_marker.is_empty() && file_name.contains(self.excluded_marker)
    }

    /// Call sites of one unit in textual order.
    pub fn extract_source(&self, service: &str, source: &str, file_name: &str) -> Vec<OutboundCallSite> {
        if self.is_excluded(file_name) {
            return Vec::new();
        }
        self.strategy
            .extract_call_sites(source, file_name)
            .into_iter()
            .map(|raw| {
                OutboundCallSite::new(
                    service,
                    raw.source_method,
                    raw.target_service,
                    raw.endpoint,
                    raw.verb,
                )
            })
            .collect()
    }
}
