//! Builds per-service endpoint catalogs from endpoint-declaring units.

use meshtrace_core::errors::PipelineResult;

use super::types::{DeclaredEndpoint, ServiceCatalog};
use crate::extraction::ExtractionStrategy;

pub struct CatalogBuilder<'a> {
    strategy: &'a dyn ExtractionStrategy,
    endpoint_file_suffix: &'a str,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(strategy: &'a dyn ExtractionStrategy, endpoint_file_suffix: &'a str) -> Self {
        Self {
            strategy,
            endpoint_file_suffix,
        }
    }

    /// Only units whose file name carries the endpoint suffix declare routes.
    pub fn is_endpoint_file(&self, file_name: &str) -> bool {
        file_name.ends_with(self.endpoint_file_suffix)
    }

    /// Append the declarations of one unit to `catalog`. Returns the number
    /// of endpoints added; templates that fail to compile are reported as
    /// non-fatal errors and skipped.
    pub fn add_source(
        &self,
        catalog: &mut ServiceCatalog,
        source: &str,
        file_name: &str,
    ) -> PipelineResult<usize> {
        let mut result = PipelineResult::<usize>::default();
        if !self.is_endpoint_file(file_name) {
            return result;
        }

        for decl in self.strategy.extract_endpoints(source, file_name) {
            match DeclaredEndpoint::new(decl.declaring_type, decl.method_name, decl.path, decl.verb) {
                Ok(endpoint) => {
                    catalog.push(endpoint);
                    result.data += 1;
                }
                Err(e) => {
                    tracing::warn!(file = file_name, error = %e, "skipping endpoint declaration");
                    result.add_error(e);
                }
            }
        }
        result
    }
}
