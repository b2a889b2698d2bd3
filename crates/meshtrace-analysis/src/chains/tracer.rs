//! Recursive chain tracing over published stage results.
//!
//! The tracer only reads the call sites, the matcher's catalog and the
//! reachable index. The set of `(service, method)` pairs on the current
//! branch is threaded through recursion as an immutable linked path, so
//! sibling branches never observe each other's visits.

use meshtrace_core::types::collections::{FxHashMap, FxHashSet};
use meshtrace_core::HttpVerb;

use super::canonical::structural_key;
use super::types::{ChainForest, ChainNode};
use crate::catalog::DeclaredEndpoint;
use crate::interactions::OutboundCallSite;
use crate::matching::InteractionMatcher;
use crate::reachability::ReachableIndex;

/// Ancestors of the node being traced, innermost first.
struct PathFrame<'p> {
    service: &'p str,
    method: &'p str,
    parent: Option<&'p PathFrame<'p>>,
}

impl PathFrame<'_> {
    fn contains(frame: Option<&PathFrame<'_>>, service: &str, method: &str) -> bool {
        let mut current = frame;
        while let Some(f) = current {
            if f.service == service && f.method == method {
                return true;
            }
            current = f.parent;
        }
        false
    }
}

/// Matched call sites sharing `(target, endpoint, verb, matched method)`.
struct CallGroup<'a> {
    site: &'a OutboundCallSite,
    endpoint: &'a DeclaredEndpoint,
    count: usize,
}

type GroupKey<'a> = (&'a str, &'a str, HttpVerb, &'a str);

pub struct ChainTracer<'a> {
    sites: &'a [OutboundCallSite],
    reachable: &'a ReachableIndex,
    /// Matched catalog entry per call site, aligned with `sites`.
    resolved: Vec<Option<&'a DeclaredEndpoint>>,
    /// service → bare source method → call-site indices in list order.
    by_method: FxHashMap<&'a str, FxHashMap<&'a str, Vec<usize>>>,
    triggers: Vec<(&'a str, &'a str)>,
}

impl<'a> ChainTracer<'a> {
    pub fn new(
        sites: &'a [OutboundCallSite],
        matcher: InteractionMatcher<'a>,
        reachable: &'a ReachableIndex,
    ) -> Self {
        let resolved: Vec<Option<&'a DeclaredEndpoint>> =
            sites.iter().map(|site| matcher.match_call(site)).collect();

        let mut by_method: FxHashMap<&'a str, FxHashMap<&'a str, Vec<usize>>> = FxHashMap::default();
        for (i, site) in sites.iter().enumerate() {
            by_method
                .entry(site.source_service.as_str())
                .or_default()
                .entry(site.source_method_name())
                .or_default()
                .push(i);
        }

        let targets: FxHashSet<(&'a str, &'a str)> = sites
            .iter()
            .zip(&resolved)
            .filter_map(|(site, ep)| ep.map(|ep| (site.target_service.as_str(), ep.method_name.as_str())))
            .collect();

        let mut seen: FxHashSet<(&'a str, &'a str)> = FxHashSet::default();
        let triggers: Vec<(&'a str, &'a str)> = sites
            .iter()
            .map(|site| (site.source_service.as_str(), site.source_method_name()))
            .filter(|pair| !targets.contains(pair) && seen.insert(*pair))
            .collect();

        let unresolved = resolved.iter().filter(|r| r.is_none()).count();
        tracing::debug!(
            sites = sites.len(),
            unresolved,
            triggers = triggers.len(),
            "chain tracer ready"
        );

        Self {
            sites,
            reachable,
            resolved,
            by_method,
            triggers,
        }
    }

    /// Trigger pairs in first-appearance order of the call-site list.
    pub fn triggers(&self) -> &[(&'a str, &'a str)] {
        &self.triggers
    }

    /// The chain tree rooted at `(service, method)`.
    pub fn trace(&self, service: &str, method: &str) -> ChainNode {
        self.trace_from(service, method, None)
    }

    /// Trace every trigger, drop call-less trees and merge structurally
    /// identical roots into their first occurrence.
    pub fn trace_all(&self) -> ChainForest {
        let mut forest = ChainForest::default();
        let mut seen: FxHashMap<String, usize> = FxHashMap::default();

        for &(service, method) in &self.triggers {
            let root = self.trace(service, method);
            if root.calls.is_empty() {
                continue;
            }
            let key = structural_key(&root);
            match seen.get(&key) {
                Some(&i) => {
                    let existing = &mut forest.roots[i];
                    existing.count = Some(existing.count.unwrap_or(1) + 1);
                }
                None => {
                    seen.insert(key, forest.roots.len());
                    forest.roots.push(root);
                }
            }
        }

        tracing::debug!(roots = forest.len(), "chains traced");
        forest
    }

    fn trace_from(&self, service: &str, method: &str, path: Option<&PathFrame<'_>>) -> ChainNode {
        if PathFrame::contains(path, service, method) {
            return ChainNode::loop_marker(service, method);
        }

        let mut node = ChainNode::new(service, method);
        let frame = PathFrame {
            service,
            method,
            parent: path,
        };

        for group in self.outgoing_groups(service, method) {
            let mut child = self.trace_from(
                &group.site.target_service,
                &group.endpoint.method_name,
                Some(&frame),
            );
            child.endpoint = Some(group.site.raw_endpoint.clone());
            child.http_method = Some(group.site.http_verb);
            child.count = Some(group.count);
            node.calls.push(child);
        }
        node
    }

    /// Matched call sites reachable from `(service, method)`, grouped in
    /// first-occurrence order over sorted reachable names then list order.
    fn outgoing_groups(&self, service: &str, method: &str) -> Vec<CallGroup<'a>> {
        let mut groups: Vec<CallGroup<'a>> = Vec::new();
        let Some(methods) = self.by_method.get(service) else {
            return groups;
        };

        let mut names = self.reachable.reachable_or_self(service, method);
        names.sort_unstable();

        let sites: &'a [OutboundCallSite] = self.sites;
        let mut positions: FxHashMap<GroupKey<'a>, usize> = FxHashMap::default();
        for name in names {
            let Some(indices) = methods.get(name) else {
                continue;
            };
            for &i in indices {
                let Some(endpoint) = self.resolved[i] else {
                    continue;
                };
                let site = &sites[i];
                let key: GroupKey<'a> = (
                    site.target_service.as_str(),
                    site.raw_endpoint.as_str(),
                    site.http_verb,
                    endpoint.method_name.as_str(),
                );
                match positions.get(&key) {
                    Some(&g) => groups[g].count += 1,
                    None => {
                        positions.insert(key, groups.len());
                        groups.push(CallGroup {
                            site,
                            endpoint,
                            count: 1,
                        });
                    }
                }
            }
        }
        groups
    }
}
