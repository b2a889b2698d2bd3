//! Reachability resolver: the transitive closure of each service's call
//! graph restricted to the methods the service declares.

pub mod index;

pub use index::{resolve_service, ReachableIndex};
