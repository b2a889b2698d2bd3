//! Scanner types.

use std::path::PathBuf;

use meshtrace_core::config::ScanConfig;
use meshtrace_core::types::collections::BTreeMap;

/// Directory naming convention that identifies a service directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConvention {
    pub prefix: String,
    pub suffix: String,
}

impl ServiceConvention {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(
            config.effective_service_prefix(),
            config.effective_service_suffix(),
        )
    }

    /// Whether a directory name follows the convention.
    pub fn matches(&self, dir_name: &str) -> bool {
        dir_name.starts_with(&self.prefix) && dir_name.ends_with(&self.suffix)
    }
}

/// A source file discovered under a service's source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute (or root-joined) path of the file.
    pub path: PathBuf,
    /// Bare file name, e.g. `OrderController.java`.
    pub file_name: String,
}

/// Source files grouped by service, services in sorted order and files in
/// walk order (sorted by file name within each directory).
#[derive(Debug, Clone, Default)]
pub struct ServiceSources {
    services: BTreeMap<String, Vec<SourceFile>>,
}

impl ServiceSources {
    pub fn push(&mut self, service: &str, file: SourceFile) {
        self.services.entry(service.to_string()).or_default().push(file);
    }

    pub fn files(&self, service: &str) -> &[SourceFile] {
        self.services.get(service).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SourceFile])> {
        self.services.iter().map(|(s, f)| (s.as_str(), f.as_slice()))
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn file_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convention_requires_prefix_and_suffix() {
        let convention = ServiceConvention::new("ts-", "-service");
        assert!(convention.matches("ts-order-service"));
        assert!(!convention.matches("ts-common"));
        assert!(!convention.matches("order-service"));
    }
}
