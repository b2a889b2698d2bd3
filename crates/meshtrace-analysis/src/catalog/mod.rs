//! Endpoint catalog: the routes each service declares, in declaration order.

pub mod builder;
pub mod types;

pub use builder::CatalogBuilder;
pub use types::{Catalog, DeclaredEndpoint, PathMatcher, ServiceCatalog};
