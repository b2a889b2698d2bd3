//! Intra-service call graph: method name → called identifiers, plus the
//! universe of method names each service declares.

pub mod builder;
pub mod types;

pub use builder::CallGraphBuilder;
pub use types::{CallGraph, ServiceCallGraph};
