//! Interaction types. Field names follow the interaction results artifact.

use meshtrace_core::types::collections::FxHashMap;
use meshtrace_core::HttpVerb;
use serde::{Deserialize, Serialize};

/// One HTTP client invocation attributed to a source method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutboundCallSite {
    #[serde(rename = "source")]
    pub source_service: String,
    /// `package.Unit.method`; only the final segment is significant for tracing.
    pub source_method: String,
    #[serde(rename = "target")]
    pub target_service: String,
    /// Path as written at the call site, possibly partial or `unknown`.
    #[serde(rename = "endpoint")]
    pub raw_endpoint: String,
    #[serde(rename = "http_method", default)]
    pub http_verb: HttpVerb,
}

impl OutboundCallSite {
    pub fn new(
        source_service: impl Into<String>,
        source_method: impl Into<String>,
        target_service: impl Into<String>,
        raw_endpoint: impl Into<String>,
        http_verb: HttpVerb,
    ) -> Self {
        Self {
            source_service: source_service.into(),
            source_method: source_method.into(),
            target_service: target_service.into(),
            raw_endpoint: raw_endpoint.into(),
            http_verb,
        }
    }

    /// Final dot-separated segment of `source_method`.
    pub fn source_method_name(&self) -> &str {
        self.source_method
            .rsplit('.')
            .next()
            .unwrap_or(&self.source_method)
    }
}

/// Number of call sites from one service to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRelation {
    pub source: String,
    pub target: String,
    pub count: usize,
}

/// The interaction results artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResults {
    pub total_relations: usize,
    pub relations: Vec<ServiceRelation>,
    pub api_interactions: Vec<OutboundCallSite>,
}

impl InteractionResults {
    /// Aggregate call sites into per-pair relation counts. Relations keep the
    /// order in which each pair first appears.
    pub fn from_call_sites(api_interactions: Vec<OutboundCallSite>) -> Self {
        let mut relations: Vec<ServiceRelation> = Vec::new();
        let mut positions: FxHashMap<(&str, &str), usize> = FxHashMap::default();

        for site in &api_interactions {
            let key = (site.source_service.as_str(), site.target_service.as_str());
            match positions.get(&key) {
                Some(&i) => relations[i].count += 1,
                None => {
                    positions.insert(key, relations.len());
                    relations.push(ServiceRelation {
                        source: site.source_service.clone(),
                        target: site.target_service.clone(),
                        count: 1,
                    });
                }
            }
        }

        Self {
            total_relations: relations.len(),
            relations,
            api_interactions,
        }
    }
}
