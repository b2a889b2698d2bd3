//! Chain forest types. Field names follow the interaction chains artifact.

use meshtrace_core::HttpVerb;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One node of an interaction chain.
///
/// Loop markers serialize without a `calls` key; every other node always
/// carries one, empty on leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChainNode {
    pub service: String,
    pub method: String,
    #[serde(default)]
    pub calls: Vec<ChainNode>,
    /// Raw endpoint of the call that reached this node. Absent on roots.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub http_method: Option<HttpVerb>,
    /// Group size on children; occurrence count on merged roots.
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(rename = "loop", default)]
    pub is_loop: bool,
}

impl Serialize for ChainNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChainNode", 7)?;
        state.serialize_field("service", &self.service)?;
        state.serialize_field("method", &self.method)?;
        if self.is_loop {
            state.skip_field("calls")?;
        } else {
            state.serialize_field("calls", &self.calls)?;
        }
        match &self.endpoint {
            Some(endpoint) => state.serialize_field("endpoint", endpoint)?,
            None => state.skip_field("endpoint")?,
        }
        match &self.http_method {
            Some(verb) => state.serialize_field("http_method", verb)?,
            None => state.skip_field("http_method")?,
        }
        match &self.count {
            Some(count) => state.serialize_field("count", count)?,
            None => state.skip_field("count")?,
        }
        if self.is_loop {
            state.serialize_field("loop", &true)?;
        } else {
            state.skip_field("loop")?;
        }
        state.end()
    }
}

impl ChainNode {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            ..Self::default()
        }
    }

    /// Terminal marker for a `(service, method)` already on the current path.
    pub fn loop_marker(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            is_loop: true,
            ..Self::new(service, method)
        }
    }

    /// Total nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.calls.iter().map(ChainNode::node_count).sum::<usize>()
    }

    /// Longest root-to-leaf edge count.
    pub fn depth(&self) -> usize {
        self.calls.iter().map(|c| c.depth() + 1).max().unwrap_or(0)
    }
}

/// Ordered, deduplicated chain roots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainForest {
    pub roots: Vec<ChainNode>,
}

impl ChainForest {
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChainNode> {
        self.roots.iter()
    }
}
