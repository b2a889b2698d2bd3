//! Per-service reachable-method sets computed with petgraph DFS.

use meshtrace_core::types::collections::{FxHashMap, FxHashSet};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use rayon::prelude::*;

use crate::call_graph::{CallGraph, ServiceCallGraph};

/// Reachable sets for one service: method → methods reachable from it,
/// itself included.
pub type ServiceReachability = FxHashMap<String, FxHashSet<String>>;

/// Service → method → reachable methods.
#[derive(Debug, Clone, Default)]
pub struct ReachableIndex {
    services: FxHashMap<String, ServiceReachability>,
}

impl ReachableIndex {
    /// Resolve every service of the call graph. Services are independent and
    /// resolved in parallel.
    pub fn resolve(graph: &CallGraph) -> Self {
        let resolved: Vec<(String, ServiceReachability)> = graph
            .iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(service, g)| (service.to_string(), resolve_service(g)))
            .collect();

        let services: FxHashMap<String, ServiceReachability> = resolved.into_iter().collect();
        tracing::debug!(services = services.len(), "reachability resolved");
        Self { services }
    }

    pub fn insert(&mut self, service: impl Into<String>, reachability: ServiceReachability) {
        self.services.insert(service.into(), reachability);
    }

    /// Reachable set of a method, or `None` when the service or method is unknown.
    pub fn get(&self, service: &str, method: &str) -> Option<&FxHashSet<String>> {
        self.services.get(service)?.get(method)
    }

    /// Reachable method names, falling back to just the method itself.
    pub fn reachable_or_self<'a>(&'a self, service: &str, method: &'a str) -> Vec<&'a str> {
        match self.get(service, method) {
            Some(set) => set.iter().map(String::as_str).collect(),
            None => vec![method],
        }
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

/// Reachable sets for every method in the service's universe. Edges leaving
/// the universe are dropped before traversal.
pub fn resolve_service(graph: &ServiceCallGraph) -> ServiceReachability {
    let mut methods: Vec<&str> = graph.universe().iter().map(String::as_str).collect();
    methods.sort_unstable();

    let mut digraph: DiGraph<&str, ()> = DiGraph::with_capacity(methods.len(), graph.edge_count());
    let mut nodes: FxHashMap<&str, NodeIndex> = FxHashMap::default();
    for &method in &methods {
        nodes.insert(method, digraph.add_node(method));
    }
    for &caller in &methods {
        let from = nodes[caller];
        for callee in graph.callees(caller) {
            if let Some(&to) = nodes.get(callee) {
                digraph.add_edge(from, to, ());
            }
        }
    }

    let mut reachable = ServiceReachability::default();
    for &method in &methods {
        let mut visited = FxHashSet::default();
        let mut dfs = Dfs::new(&digraph, nodes[method]);
        while let Some(idx) = dfs.next(&digraph) {
            visited.insert(digraph[idx].to_string());
        }
        reachable.insert(method.to_string(), visited);
    }
    reachable
}
