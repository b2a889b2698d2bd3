//! Interaction matcher: resolves a call site to the catalog entry it invokes.

pub mod matcher;

pub use matcher::{endpoint_satisfies, InteractionMatcher};
