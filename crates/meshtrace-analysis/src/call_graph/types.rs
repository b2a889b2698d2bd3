//! Call graph types.

use meshtrace_core::types::collections::{FxHashMap, FxHashSet};

/// Name-keyed call edges of one service. Same-named methods across units
/// collapse to a single node; callees may name methods outside the universe.
#[derive(Debug, Clone, Default)]
pub struct ServiceCallGraph {
    edges: FxHashMap<String, FxHashSet<String>>,
    universe: FxHashSet<String>,
}

impl ServiceCallGraph {
    pub fn add_method(&mut self, name: &str) {
        if !self.universe.contains(name) {
            self.universe.insert(name.to_string());
        }
    }

    pub fn add_call(&mut self, caller: &str, callee: &str) {
        let callees = self.edges.entry(caller.to_string()).or_default();
        if !callees.contains(callee) {
            callees.insert(callee.to_string());
        }
    }

    pub fn callees(&self, method: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(method)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Declared method names of the service.
    pub fn universe(&self) -> &FxHashSet<String> {
        &self.universe
    }

    pub fn declares(&self, method: &str) -> bool {
        self.universe.contains(method)
    }

    pub fn method_count(&self) -> usize {
        self.universe.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(FxHashSet::len).sum()
    }
}

/// Service name → call graph.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    services: FxHashMap<String, ServiceCallGraph>,
}

impl CallGraph {
    pub fn insert(&mut self, service: impl Into<String>, graph: ServiceCallGraph) {
        self.services.insert(service.into(), graph);
    }

    pub fn get(&self, service: &str) -> Option<&ServiceCallGraph> {
        self.services.get(service)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceCallGraph)> {
        self.services.iter().map(|(s, g)| (s.as_str(), g))
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}
