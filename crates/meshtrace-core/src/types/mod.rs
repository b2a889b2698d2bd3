//! Shared data types for meshtrace.

pub mod collections;
pub mod http;

pub use collections::{FxHashMap, FxHashSet};
pub use http::HttpVerb;
