//! Populates a service call graph from every source unit of the service.

use super::types::ServiceCallGraph;
use crate::extraction::ExtractionStrategy;

pub struct CallGraphBuilder<'a> {
    strategy: &'a dyn ExtractionStrategy,
}

impl<'a> CallGraphBuilder<'a> {
    pub fn new(strategy: &'a dyn ExtractionStrategy) -> Self {
        Self { strategy }
    }

    /// Register every method header of one unit and the identifiers its
    /// attributed text calls. Returns the number of methods seen.
    pub fn add_source(&self, graph: &mut ServiceCallGraph, source: &str) -> usize {
        let spans = self.strategy.extract_methods_and_bodies(source);
        for span in &spans {
            graph.add_method(&span.name);
            let Some(body) = source.get(span.body.clone()) else {
                continue;
            };
            for callee in self.strategy.extract_call_identifiers(body) {
                graph.add_call(&span.name, &callee);
            }
        }
        spans.len()
    }
}
