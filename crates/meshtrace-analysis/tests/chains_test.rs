//! Chain tracer behavior over hand-built stage results.

use meshtrace_analysis::call_graph::{CallGraph, ServiceCallGraph};
use meshtrace_analysis::catalog::{Catalog, DeclaredEndpoint};
use meshtrace_analysis::{ChainNode, ChainTracer, InteractionMatcher, OutboundCallSite, ReachableIndex};
use meshtrace_core::config::MatchPolicy;
use meshtrace_core::HttpVerb;

fn endpoint(method: &str, path: &str, verb: HttpVerb) -> DeclaredEndpoint {
    DeclaredEndpoint::new("Controller", method, path, verb).unwrap()
}

fn site(source: &str, method: &str, target: &str, path: &str, verb: HttpVerb) -> OutboundCallSite {
    OutboundCallSite::new(source, format!("pkg.Unit.{method}"), target, path, verb)
}

fn reachable(graphs: &[(&str, &[&str], &[(&str, &str)])]) -> ReachableIndex {
    let mut call_graph = CallGraph::default();
    for (service, methods, calls) in graphs {
        let mut g = ServiceCallGraph::default();
        for m in *methods {
            g.add_method(m);
        }
        for (a, b) in *calls {
            g.add_call(a, b);
        }
        call_graph.insert(*service, g);
    }
    ReachableIndex::resolve(&call_graph)
}

#[test]
fn test_cross_service_cycle_ends_in_loop_marker() {
    let mut catalog = Catalog::default();
    catalog.push("A", endpoint("x", "a/x", HttpVerb::Get));
    catalog.push("B", endpoint("y", "b/y", HttpVerb::Get));
    let sites = vec![
        site("A", "start", "A", "/a/x", HttpVerb::Get),
        site("A", "x", "B", "/b/y", HttpVerb::Get),
        site("B", "y", "A", "/a/x", HttpVerb::Get),
    ];
    let index = ReachableIndex::default();
    let tracer = ChainTracer::new(&sites, InteractionMatcher::new(&catalog, MatchPolicy::First), &index);

    assert_eq!(tracer.triggers(), &[("A", "start")]);
    let forest = tracer.trace_all();
    assert_eq!(forest.len(), 1);

    let x = &forest.roots[0].calls[0];
    assert_eq!((x.service.as_str(), x.method.as_str()), ("A", "x"));
    let y = &x.calls[0];
    assert_eq!((y.service.as_str(), y.method.as_str()), ("B", "y"));
    let again = &y.calls[0];
    assert!(again.is_loop);
    assert_eq!((again.service.as_str(), again.method.as_str()), ("A", "x"));
    assert!(again.calls.is_empty());
    assert_eq!(again.endpoint.as_deref(), Some("/a/x"));
}

#[test]
fn test_sibling_branches_do_not_share_visits() {
    let mut catalog = Catalog::default();
    catalog.push("B", endpoint("one", "b/one", HttpVerb::Get));
    catalog.push("B", endpoint("two", "b/two", HttpVerb::Get));
    catalog.push("C", endpoint("leaf", "c/leaf", HttpVerb::Get));
    let sites = vec![
        site("A", "root", "B", "/b/one", HttpVerb::Get),
        site("A", "root", "B", "/b/two", HttpVerb::Get),
        site("B", "one", "C", "/c/leaf", HttpVerb::Get),
        site("B", "two", "C", "/c/leaf", HttpVerb::Get),
    ];
    let index = ReachableIndex::default();
    let tracer = ChainTracer::new(&sites, InteractionMatcher::new(&catalog, MatchPolicy::First), &index);
    let tree = tracer.trace("A", "root");

    assert_eq!(tree.calls.len(), 2);
    for branch in &tree.calls {
        assert_eq!(branch.calls.len(), 1);
        assert!(!branch.calls[0].is_loop, "C.leaf is visited once per branch");
    }
}

#[test]
fn test_identical_calls_are_grouped_with_count() {
    let mut catalog = Catalog::default();
    catalog.push("B", endpoint("get", "items/{id}", HttpVerb::Get));
    let sites = vec![
        site("A", "run", "B", "/items/1", HttpVerb::Get),
        site("A", "run", "B", "/items/1", HttpVerb::Get),
        site("A", "run", "B", "/items/2", HttpVerb::Get),
    ];
    let index = ReachableIndex::default();
    let tracer = ChainTracer::new(&sites, InteractionMatcher::new(&catalog, MatchPolicy::First), &index);
    let tree = tracer.trace("A", "run");

    let summary: Vec<(Option<&str>, Option<usize>)> = tree
        .calls
        .iter()
        .map(|c| (c.endpoint.as_deref(), c.count))
        .collect();
    assert_eq!(summary, vec![(Some("/items/1"), Some(2)), (Some("/items/2"), Some(1))]);
}

#[test]
fn test_reachable_helpers_contribute_calls_in_name_order() {
    let mut catalog = Catalog::default();
    catalog.push("B", endpoint("first", "b/first", HttpVerb::Get));
    catalog.push("B", endpoint("second", "b/second", HttpVerb::Post));
    let sites = vec![
        site("A", "zeta", "B", "/b/first", HttpVerb::Get),
        site("A", "alpha", "B", "b/second", HttpVerb::Post),
    ];
    let graphs: [(&str, &[&str], &[(&str, &str)]); 1] =
        [("A", &["entry", "alpha", "zeta"], &[("entry", "zeta"), ("entry", "alpha")])];
    let index = reachable(&graphs);
    let tracer = ChainTracer::new(&sites, InteractionMatcher::new(&catalog, MatchPolicy::First), &index);

    let tree = tracer.trace("A", "entry");
    let methods: Vec<&str> = tree.calls.iter().map(|c| c.method.as_str()).collect();
    assert_eq!(methods, vec!["second", "first"]);
}

#[test]
fn test_structurally_identical_triggers_merge() {
    let mut catalog = Catalog::default();
    catalog.push("B", endpoint("get", "items/{id}", HttpVerb::Get));
    let sites = vec![
        site("A", "cron", "B", "/items/1", HttpVerb::Get),
        site("A", "listener", "B", "/items/1", HttpVerb::Get),
        site("A", "listener", "B", "/items/1", HttpVerb::Get),
        site("A", "other", "B", "/items/9", HttpVerb::Get),
        site("A", "third", "B", "/items/1", HttpVerb::Get),
    ];
    let index = ReachableIndex::default();
    let tracer = ChainTracer::new(&sites, InteractionMatcher::new(&catalog, MatchPolicy::First), &index);
    let forest = tracer.trace_all();

    let roots: Vec<(&str, Option<usize>)> = forest.iter().map(|r| (r.method.as_str(), r.count)).collect();
    assert_eq!(roots, vec![("cron", Some(3)), ("other", None)]);
    // The surviving root keeps its own child counts.
    assert_eq!(forest.roots[0].calls[0].count, Some(1));
}

#[test]
fn test_verb_mismatch_and_unresolved_sites_are_dropped() {
    let mut catalog = Catalog::default();
    catalog.push("B", endpoint("create", "items", HttpVerb::Post));
    let sites = vec![
        site("A", "read", "B", "/items", HttpVerb::Get),
        site("A", "ghost", "Nowhere", "/items", HttpVerb::Post),
    ];
    let index = ReachableIndex::default();
    let tracer = ChainTracer::new(&sites, InteractionMatcher::new(&catalog, MatchPolicy::First), &index);

    assert!(tracer.trace("A", "read").calls.is_empty());
    assert!(tracer.trace_all().is_empty());
}

#[test]
fn test_matched_targets_are_not_triggers() {
    let mut catalog = Catalog::default();
    catalog.push("B", endpoint("handle", "b", HttpVerb::Get));
    let sites = vec![
        site("A", "start", "B", "/b", HttpVerb::Get),
        site("B", "handle", "C", "/c", HttpVerb::Get),
    ];
    let index = ReachableIndex::default();
    let tracer = ChainTracer::new(&sites, InteractionMatcher::new(&catalog, MatchPolicy::First), &index);
    assert_eq!(tracer.triggers(), &[("A", "start")]);
}

#[test]
fn test_leaf_node_shape() {
    let leaf = ChainNode::new("svc", "m");
    assert!(leaf.calls.is_empty());
    assert_eq!(leaf.depth(), 0);
    assert_eq!(leaf.node_count(), 1);
}
