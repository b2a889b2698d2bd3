//! Deterministic source walker using `ignore`.
//!
//! Entries are sorted by file name within each directory so catalog
//! declaration order and call-site order are stable across runs.

use std::path::{Component, Path};

use ignore::WalkBuilder;
use meshtrace_core::config::ScanConfig;
use meshtrace_core::errors::{PipelineError, PipelineResult, ScanError};

use super::types::{ServiceConvention, ServiceSources, SourceFile};

/// Walks an analysis root and groups source files by service.
pub struct SourceWalker {
    convention: ServiceConvention,
    source_root: String,
    extension: String,
    max_file_size: u64,
    respect_gitignore: bool,
}

impl SourceWalker {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            convention: ServiceConvention::from_config(config),
            source_root: config.effective_source_root().trim_matches('/').to_string(),
            extension: config
                .effective_source_extension()
                .trim_start_matches('.')
                .to_string(),
            max_file_size: config.effective_max_file_size(),
            respect_gitignore: config.effective_respect_gitignore(),
        }
    }

    pub fn convention(&self) -> &ServiceConvention {
        &self.convention
    }

    /// Every source file below a conventional source root, attributed to the
    /// first path component that follows the service naming convention.
    /// Files outside any service directory are not attributed.
    pub fn discover_services(&self, root: &Path) -> PipelineResult<ServiceSources> {
        let mut result = PipelineResult::<ServiceSources>::default();

        for file in self.walk(root, &mut result.errors) {
            let Ok(relative) = file.path.strip_prefix(root) else {
                continue;
            };
            let dirs: Vec<&str> = match relative.parent() {
                Some(parent) => parent
                    .components()
                    .filter_map(|c| match c {
                        Component::Normal(s) => s.to_str(),
                        _ => None,
                    })
                    .collect(),
                None => continue,
            };

            if !self.under_source_root(&dirs) {
                continue;
            }
            let Some(service) = dirs.iter().find(|d| self.convention.matches(d)) else {
                continue;
            };
            let service = service.to_string();
            result.data.push(&service, file);
        }

        tracing::debug!(
            services = result.data.service_count(),
            files = result.data.file_count(),
            "service discovery complete"
        );
        result
    }

    /// Source files below `<root>/<service_dir>/<source_root>`. A service whose
    /// source root does not exist contributes nothing.
    pub fn service_files(&self, root: &Path, service_dir: &str) -> PipelineResult<Vec<SourceFile>> {
        let mut result = PipelineResult::<Vec<SourceFile>>::default();
        let source_dir = root.join(service_dir).join(&self.source_root);
        if !source_dir.is_dir() {
            tracing::warn!(
                service = service_dir,
                path = %source_dir.display(),
                "source root not found, skipping service"
            );
            return result;
        }
        result.data = self.walk(&source_dir, &mut result.errors);
        result
    }

    fn under_source_root(&self, dirs: &[&str]) -> bool {
        let segments: Vec<&str> = self.source_root.split('/').filter(|s| !s.is_empty()).collect();
        !segments.is_empty() && dirs.windows(segments.len()).any(|w| w == segments.as_slice())
    }

    fn walk(&self, dir: &Path, errors: &mut Vec<PipelineError>) -> Vec<SourceFile> {
        let mut builder = WalkBuilder::new(dir);
        builder
            .hidden(false)
            .parents(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    errors.push(
                        ScanError::WalkFailed {
                            root: dir.to_path_buf(),
                            message: e.to_string(),
                        }
                        .into(),
                    );
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            if size > self.max_file_size {
                tracing::warn!(path = %path.display(), size, "skipping oversized source file");
                errors.push(
                    ScanError::MaxFileSizeExceeded {
                        path: path.to_path_buf(),
                        size,
                        max: self.max_file_size,
                    }
                    .into(),
                );
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            files.push(SourceFile {
                path: path.to_path_buf(),
                file_name,
            });
        }
        files
    }
}

/// Read a source file, mapping failures to a non-fatal scan error.
pub fn read_source(file: &SourceFile) -> Result<String, ScanError> {
    std::fs::read_to_string(&file.path).map_err(|source| ScanError::IoError {
        path: file.path.clone(),
        source,
    })
}
