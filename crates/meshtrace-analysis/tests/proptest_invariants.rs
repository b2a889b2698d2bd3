//! Property tests for reachability, matching and tracing invariants.

use meshtrace_analysis::call_graph::ServiceCallGraph;
use meshtrace_analysis::catalog::{Catalog, DeclaredEndpoint, PathMatcher};
use meshtrace_analysis::chains::structural_key;
use meshtrace_analysis::matching::endpoint_satisfies;
use meshtrace_analysis::reachability::resolve_service;
use meshtrace_analysis::{ChainNode, ChainTracer, InteractionMatcher, OutboundCallSite, ReachableIndex};
use meshtrace_core::config::MatchPolicy;
use meshtrace_core::types::collections::FxHashSet;
use meshtrace_core::HttpVerb;
use proptest::prelude::*;

fn verb(i: usize) -> HttpVerb {
    HttpVerb::all()[i % HttpVerb::all().len()]
}

fn check_tree(node: &ChainNode, depth: usize, max_depth: usize) -> Result<(), TestCaseError> {
    prop_assert!(depth <= max_depth, "depth {} exceeds {}", depth, max_depth);
    if node.is_loop {
        prop_assert!(node.calls.is_empty());
    }
    for child in &node.calls {
        prop_assert!(child.endpoint.is_some());
        prop_assert!(child.http_method.is_some());
        prop_assert!(child.count.unwrap_or(0) >= 1);
        check_tree(child, depth + 1, max_depth)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn reachable_sets_are_closed(
        n in 1usize..8,
        edges in prop::collection::vec((0usize..10, 0usize..10), 0..24),
    ) {
        let mut graph = ServiceCallGraph::default();
        for i in 0..n {
            graph.add_method(&format!("m{i}"));
        }
        for (a, b) in &edges {
            graph.add_call(&format!("m{}", a % n), &format!("m{b}"));
        }

        let reach = resolve_service(&graph);
        prop_assert_eq!(reach.len(), n);
        for (method, set) in &reach {
            prop_assert!(set.contains(method));
            for member in set {
                prop_assert!(graph.declares(member));
                for callee in graph.callees(member) {
                    if graph.declares(callee) {
                        prop_assert!(set.contains(callee));
                    }
                }
            }
        }
    }

    #[test]
    fn verb_mismatch_never_matches(
        segments in prop::collection::vec("[a-z]{1,6}", 1..5),
        declared in 0usize..5,
        offset in 1usize..5,
    ) {
        let path = segments.join("/");
        let endpoint = DeclaredEndpoint::new("C", "m", path.clone(), verb(declared)).unwrap();
        let called = verb(declared + offset);
        let rooted = format!("/{path}");
        let trailing = format!("/{path}/");
        prop_assert!(endpoint_satisfies(&endpoint, &rooted, verb(declared)));
        prop_assert!(!endpoint_satisfies(&endpoint, &rooted, called));
        prop_assert!(!endpoint_satisfies(&endpoint, &trailing, called));
    }

    #[test]
    fn placeholders_accept_exactly_one_segment(
        parts in prop::collection::vec(("[a-z]{1,6}", any::<bool>(), "[a-z0-9]{1,5}"), 1..5),
    ) {
        let template: Vec<String> = parts
            .iter()
            .map(|(lit, var, _)| if *var { format!("{{{lit}}}") } else { lit.clone() })
            .collect();
        let concrete: Vec<&str> = parts
            .iter()
            .map(|(lit, var, val)| if *var { val.as_str() } else { lit.as_str() })
            .collect();

        let matcher = PathMatcher::compile(&template.join("/")).unwrap();
        let path = concrete.join("/");
        prop_assert!(matcher.is_match(&path));
        let trailing = format!("/{path}/");
        let extra = format!("/{path}/extra");
        prop_assert!(matcher.is_match(&trailing));
        prop_assert!(!matcher.is_match(&extra));
    }

    #[test]
    fn tracing_terminates_with_bounded_trees(
        sites in prop::collection::vec((0usize..3, 0usize..3, 0usize..3, 0usize..3), 0..8),
    ) {
        let mut catalog = Catalog::default();
        for s in 0..3 {
            for m in 0..3 {
                let endpoint =
                    DeclaredEndpoint::new("C", format!("m{m}"), format!("p/s{s}/m{m}"), HttpVerb::Get).unwrap();
                catalog.push(&format!("s{s}"), endpoint);
            }
        }
        let sites: Vec<OutboundCallSite> = sites
            .iter()
            .map(|(ss, sm, ts, tm)| {
                OutboundCallSite::new(
                    format!("s{ss}"),
                    format!("pkg.Unit.m{sm}"),
                    format!("s{ts}"),
                    format!("/p/s{ts}/m{tm}"),
                    HttpVerb::Get,
                )
            })
            .collect();

        let index = ReachableIndex::default();
        let tracer = ChainTracer::new(&sites, InteractionMatcher::new(&catalog, MatchPolicy::First), &index);
        let forest = tracer.trace_all();

        let mut keys = FxHashSet::default();
        for root in forest.iter() {
            prop_assert!(!root.calls.is_empty());
            prop_assert!(root.endpoint.is_none());
            prop_assert!(keys.insert(structural_key(root)));
            check_tree(root, 0, 9)?;
        }
    }
}
