//! Call site → declared endpoint resolution.
//!
//! An entry satisfies a call site when the verbs agree and any of:
//! the entry's matcher accepts the raw endpoint (a leading `/` is added when
//! missing), the slash-trimmed forms are equal, or the raw endpoint ends in
//! `/`, the trimmed template starts with the trimmed endpoint, and the
//! template has a placeholder (partial URL concatenated with a variable).

use meshtrace_core::config::MatchPolicy;
use meshtrace_core::HttpVerb;

use crate::catalog::{Catalog, DeclaredEndpoint};
use crate::interactions::OutboundCallSite;

/// Whether `endpoint` satisfies a call to `raw_endpoint` with `verb`.
pub fn endpoint_satisfies(endpoint: &DeclaredEndpoint, raw_endpoint: &str, verb: HttpVerb) -> bool {
    if endpoint.verb != verb {
        return false;
    }

    let raw = raw_endpoint.trim_matches('"');
    let trimmed = raw.trim_matches('/');
    let template = endpoint.path_template.trim_matches('/');

    let matched = if raw.starts_with('/') {
        endpoint.matcher().is_match(raw)
    } else {
        endpoint.matcher().is_match(&format!("/{raw}"))
    };

    matched
        || trimmed == template
        || (raw.ends_with('/') && template.starts_with(trimmed) && endpoint.is_templated())
}

/// Matches call sites against a catalog under a tie-break policy.
#[derive(Clone, Copy)]
pub struct InteractionMatcher<'a> {
    catalog: &'a Catalog,
    policy: MatchPolicy,
}

impl<'a> InteractionMatcher<'a> {
    pub fn new(catalog: &'a Catalog, policy: MatchPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// The catalog entry the call site invokes, or `None` when the target
    /// service has no catalog or nothing satisfies the call.
    pub fn match_call(&self, site: &OutboundCallSite) -> Option<&'a DeclaredEndpoint> {
        let mut candidates = self
            .catalog
            .endpoints(&site.target_service)
            .iter()
            .filter(|ep| endpoint_satisfies(ep, &site.raw_endpoint, site.http_verb));

        match self.policy {
            MatchPolicy::First => candidates.next(),
            MatchPolicy::LongestPrefix => {
                let mut best: Option<&'a DeclaredEndpoint> = None;
                for ep in candidates {
                    // Strictly longer wins so ties keep catalog order.
                    if best.map_or(true, |b| ep.literal_prefix_len() > b.literal_prefix_len()) {
                        best = Some(ep);
                    }
                }
                best
            }
        }
    }
}
