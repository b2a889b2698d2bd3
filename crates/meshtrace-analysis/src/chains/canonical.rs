//! Structural keys for root deduplication.
//!
//! The key covers the root service and the nested structure (child services,
//! methods, endpoints, verbs, loop markers). It excludes the root's method
//! name and every count, and sorts children so sibling order is irrelevant.

use serde_json::{json, Value};

use super::types::ChainNode;

pub fn structural_key(root: &ChainNode) -> String {
    shape(root, true).to_string()
}

fn shape(node: &ChainNode, is_root: bool) -> Value {
    let mut children: Vec<String> = node.calls.iter().map(|c| shape(c, false).to_string()).collect();
    children.sort_unstable();
    let method = if is_root {
        Value::Null
    } else {
        Value::from(node.method.as_str())
    };

    json!({
        "service": node.service,
        "method": method,
        "endpoint": node.endpoint,
        "http_method": node.http_method,
        "loop": node.is_loop,
        "calls": children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshtrace_core::HttpVerb;

    fn child(service: &str, method: &str, endpoint: &str, count: usize) -> ChainNode {
        ChainNode {
            endpoint: Some(endpoint.to_string()),
            http_method: Some(HttpVerb::Get),
            count: Some(count),
            ..ChainNode::new(service, method)
        }
    }

    #[test]
    fn root_method_and_counts_are_ignored() {
        let mut a = ChainNode::new("svc", "first");
        a.calls = vec![child("b", "x", "/x", 1), child("c", "y", "/y", 2)];
        let mut b = ChainNode::new("svc", "second");
        b.calls = vec![child("c", "y", "/y", 5), child("b", "x", "/x", 3)];
        b.count = Some(4);
        assert_eq!(structural_key(&a), structural_key(&b));
    }

    #[test]
    fn child_methods_and_root_service_matter() {
        let mut a = ChainNode::new("svc", "m");
        a.calls = vec![child("b", "x", "/x", 1)];
        let mut other_method = a.clone();
        other_method.calls[0].method = "z".into();
        let mut other_service = a.clone();
        other_service.service = "svc2".into();

        assert_ne!(structural_key(&a), structural_key(&other_method));
        assert_ne!(structural_key(&a), structural_key(&other_service));
    }
}
