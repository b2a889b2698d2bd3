//! Catalog types.

use meshtrace_core::errors::ExtractionError;
use meshtrace_core::types::collections::FxHashMap;
use meshtrace_core::HttpVerb;
use regex::Regex;

/// Anchored matcher for a declared path template. Each `{...}` placeholder
/// matches exactly one non-empty segment; a single optional leading and
/// trailing `/` are tolerated.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    regex: Regex,
}

impl PathMatcher {
    pub fn compile(template: &str) -> Result<Self, ExtractionError> {
        let mut pattern = String::from("^/?");
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            pattern.push_str(&regex::escape(&rest[..open]));
            match rest[open..].find('}') {
                Some(close) => {
                    pattern.push_str("[^/]+");
                    rest = &rest[open + close + 1..];
                }
                None => {
                    return Err(ExtractionError::InvalidTemplate {
                        template: template.to_string(),
                        message: "unterminated path variable".to_string(),
                    });
                }
            }
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push_str("/?$");

        let regex = Regex::new(&pattern).map_err(|e| ExtractionError::InvalidTemplate {
            template: template.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// One route declared by a service.
#[derive(Debug, Clone)]
pub struct DeclaredEndpoint {
    /// Qualified declaring unit, e.g. `com.acme.OrderController`.
    pub declaring_type: String,
    /// Handler method name.
    pub method_name: String,
    /// Path template without leading/trailing slashes.
    pub path_template: String,
    pub verb: HttpVerb,
    matcher: PathMatcher,
}

impl DeclaredEndpoint {
    pub fn new(
        declaring_type: impl Into<String>,
        method_name: impl Into<String>,
        path_template: impl Into<String>,
        verb: HttpVerb,
    ) -> Result<Self, ExtractionError> {
        let path_template = path_template.into().trim_matches('/').to_string();
        let matcher = PathMatcher::compile(&path_template)?;
        Ok(Self {
            declaring_type: declaring_type.into(),
            method_name: method_name.into(),
            path_template,
            verb,
            matcher,
        })
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    pub fn is_templated(&self) -> bool {
        self.path_template.contains('{')
    }

    /// Length of the template before its first placeholder.
    pub fn literal_prefix_len(&self) -> usize {
        self.path_template.find('{').unwrap_or(self.path_template.len())
    }
}

/// Declared endpoints of one service, append-only, in walk order.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    endpoints: Vec<DeclaredEndpoint>,
}

impl ServiceCatalog {
    pub fn push(&mut self, endpoint: DeclaredEndpoint) {
        self.endpoints.push(endpoint);
    }

    pub fn endpoints(&self) -> &[DeclaredEndpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Service name → declared endpoints.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    services: FxHashMap<String, ServiceCatalog>,
}

impl Catalog {
    pub fn insert(&mut self, service: impl Into<String>, catalog: ServiceCatalog) {
        self.services.insert(service.into(), catalog);
    }

    /// Append one endpoint to a service, creating the service entry on demand.
    pub fn push(&mut self, service: &str, endpoint: DeclaredEndpoint) {
        self.services.entry(service.to_string()).or_default().push(endpoint);
    }

    pub fn get(&self, service: &str) -> Option<&ServiceCatalog> {
        self.services.get(service)
    }

    pub fn endpoints(&self, service: &str) -> &[DeclaredEndpoint] {
        self.get(service).map(ServiceCatalog::endpoints).unwrap_or(&[])
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn endpoint_count(&self) -> usize {
        self.services.values().map(ServiceCatalog::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_matches_one_segment() {
        let m = PathMatcher::compile("orders/{id}").unwrap();
        assert!(m.is_match("/orders/42"));
        assert!(m.is_match("orders/42/"));
        assert!(m.is_match("/orders/{id}"));
        assert!(!m.is_match("/orders"));
        assert!(!m.is_match("/orders/42/items"));
        assert!(!m.is_match("/orders//"));
    }

    #[test]
    fn literal_segments_are_escaped() {
        let m = PathMatcher::compile("files/report.csv").unwrap();
        assert!(m.is_match("/files/report.csv"));
        assert!(!m.is_match("/files/reportXcsv"));
    }

    #[test]
    fn unterminated_placeholder_is_rejected() {
        assert!(matches!(
            PathMatcher::compile("orders/{id"),
            Err(ExtractionError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn literal_prefix_stops_at_first_placeholder() {
        let ep = DeclaredEndpoint::new("C", "m", "/api/orders/{id}/", HttpVerb::Get).unwrap();
        assert_eq!(ep.path_template, "api/orders/{id}");
        assert_eq!(ep.literal_prefix_len(), "api/orders/".len());
        assert!(ep.is_templated());
    }
}
