//! Chain tracer: recursive expansion of triggers into interaction chains,
//! with loop markers and structural deduplication of roots.

pub mod canonical;
pub mod tracer;
pub mod types;

pub use canonical::structural_key;
pub use tracer::ChainTracer;
pub use types::{ChainForest, ChainNode};
