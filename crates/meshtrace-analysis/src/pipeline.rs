//! End-to-end orchestration: interaction extraction, model construction
//! (catalog, call graph, reachability) and chain tracing.
//!
//! Per-service work runs in parallel and is merged in a deterministic order.
//! Missing or unreadable sources degrade to non-fatal errors; only missing
//! required inputs and artifact writes abort a run.

use std::path::Path;

use meshtrace_core::errors::{PipelineError, PipelineResult};
use meshtrace_core::MeshtraceConfig;
use rayon::prelude::*;

use crate::artifacts;
use crate::call_graph::{CallGraph, CallGraphBuilder, ServiceCallGraph};
use crate::catalog::{Catalog, CatalogBuilder, ServiceCatalog};
use crate::chains::{ChainForest, ChainTracer};
use crate::extraction::{ExtractionStrategy, SpringRegexStrategy};
use crate::interactions::{InteractionResults, OutboundCallExtractor, OutboundCallSite};
use crate::matching::InteractionMatcher;
use crate::reachability::ReachableIndex;
use crate::scanner::{load_analyzed_services, read_source, SourceFile, SourceWalker};

/// Published, immutable inputs of the chain tracer.
#[derive(Debug, Default)]
pub struct ServiceModel {
    pub catalog: Catalog,
    pub call_graph: CallGraph,
    pub reachable: ReachableIndex,
}

/// Both artifacts of a full run.
#[derive(Debug, Default)]
pub struct AnalysisOutput {
    pub interactions: InteractionResults,
    pub chains: ChainForest,
}

/// Per-service scan output before merging.
struct ServiceScan {
    service: String,
    catalog: ServiceCatalog,
    graph: ServiceCallGraph,
    errors: Vec<PipelineError>,
}

pub struct Pipeline {
    config: MeshtraceConfig,
    strategy: Box<dyn ExtractionStrategy>,
}

impl Pipeline {
    /// Pipeline with the default Spring/RestTemplate extraction strategy.
    pub fn new(config: MeshtraceConfig) -> Result<Self, PipelineError> {
        let strategy = SpringRegexStrategy::new()?;
        Ok(Self::with_strategy(config, Box::new(strategy)))
    }

    pub fn with_strategy(config: MeshtraceConfig, strategy: Box<dyn ExtractionStrategy>) -> Self {
        Self { config, strategy }
    }

    pub fn config(&self) -> &MeshtraceConfig {
        &self.config
    }

    /// Extract call sites for the services named in the analyzed-services
    /// list. A missing list is fatal.
    pub fn extract_interactions(&self, root: &Path) -> Result<PipelineResult<InteractionResults>, PipelineError> {
        let list = self.config.output.analyzed_services_path(root);
        let services = load_analyzed_services(&list)?;
        tracing::info!(services = services.len(), list = %list.display(), "extracting interactions");
        Ok(self.extract_interactions_for(root, &services))
    }

    /// Extract call sites for `services`, concatenated in list order.
    pub fn extract_interactions_for(&self, root: &Path, services: &[String]) -> PipelineResult<InteractionResults> {
        let _span = tracing::info_span!("extract_interactions").entered();
        let walker = SourceWalker::new(&self.config.scan);
        let extractor = OutboundCallExtractor::new(
            self.strategy.as_ref(),
            self.config.scan.effective_excluded_file_marker(),
        );

        let per_service: Vec<(Vec<OutboundCallSite>, Vec<PipelineError>)> = self.install(|| {
            services
                .par_iter()
                .map(|service| {
                    let files = walker.service_files(root, service);
                    let mut errors = files.errors;
                    let mut sites = Vec::new();
                    for file in &files.data {
                        if extractor.is_excluded(&file.file_name) {
                            continue;
                        }
                        match read_source(file) {
                            Ok(source) => {
                                sites.extend(extractor.extract_source(service, &source, &file.file_name))
                            }
                            Err(e) => errors.push(e.into()),
                        }
                    }
                    (sites, errors)
                })
                .collect()
        });

        let mut result = PipelineResult::<InteractionResults>::default();
        let mut sites = Vec::new();
        for (mut service_sites, mut errors) in per_service {
            sites.append(&mut service_sites);
            result.errors.append(&mut errors);
        }
        result.data = InteractionResults::from_call_sites(sites);
        tracing::info!(
            call_sites = result.data.api_interactions.len(),
            relations = result.data.total_relations,
            errors = result.error_count(),
            "interactions extracted"
        );
        result
    }

    /// Discover services under `root` and build the catalog, call graph and
    /// reachable index.
    pub fn build_model(&self, root: &Path) -> PipelineResult<ServiceModel> {
        let _span = tracing::info_span!("build_model").entered();
        let walker = SourceWalker::new(&self.config.scan);
        let mut discovered = walker.discover_services(root);
        if discovered.data.is_empty() {
            tracing::warn!(root = %root.display(), "no service directories found");
        }

        let services: Vec<(&str, &[SourceFile])> = discovered.data.iter().collect();
        let scans: Vec<ServiceScan> = self.install(|| {
            services
                .into_par_iter()
                .map(|(service, files)| self.scan_service(service, files))
                .collect()
        });

        let mut result = PipelineResult::<ServiceModel>::default();
        result.absorb_errors(&mut discovered);
        for mut scan in scans {
            if scan.catalog.is_empty() {
                tracing::debug!(service = %scan.service, "service declares no endpoints");
            }
            result.errors.append(&mut scan.errors);
            result.data.catalog.insert(scan.service.clone(), scan.catalog);
            result.data.call_graph.insert(scan.service, scan.graph);
        }
        result.data.reachable = ReachableIndex::resolve(&result.data.call_graph);

        tracing::info!(
            services = result.data.call_graph.service_count(),
            endpoints = result.data.catalog.endpoint_count(),
            errors = result.error_count(),
            "service model built"
        );
        result
    }

    /// Trace chains for `sites` against the model built from `root`.
    pub fn build_chains(&self, root: &Path, sites: &[OutboundCallSite]) -> PipelineResult<ChainForest> {
        let mut model = self.build_model(root);
        let _span = tracing::info_span!("trace_chains").entered();

        let matcher = InteractionMatcher::new(&model.data.catalog, self.config.matching.effective_policy());
        let forest = ChainTracer::new(sites, matcher, &model.data.reachable).trace_all();
        tracing::info!(roots = forest.len(), policy = %matcher.policy(), "chains built");

        let mut result = PipelineResult::new(forest);
        result.absorb_errors(&mut model);
        result
    }

    /// Chains from a previously written interaction results artifact.
    pub fn build_chains_from_artifact(&self, root: &Path) -> Result<PipelineResult<ChainForest>, PipelineError> {
        let path = self.config.output.interactions_path(root);
        let interactions = artifacts::read_interactions(&path)?;
        Ok(self.build_chains(root, &interactions.api_interactions))
    }

    /// Both stages in sequence. Nothing is written here.
    pub fn run(&self, root: &Path) -> Result<PipelineResult<AnalysisOutput>, PipelineError> {
        let mut interactions = self.extract_interactions(root)?;
        let mut chains = self.build_chains(root, &interactions.data.api_interactions);

        let mut result = PipelineResult::<AnalysisOutput>::default();
        result.absorb_errors(&mut interactions);
        result.absorb_errors(&mut chains);
        result.data = AnalysisOutput {
            interactions: interactions.data,
            chains: chains.data,
        };
        Ok(result)
    }

    /// Write both artifacts to their configured locations.
    pub fn write_outputs(&self, root: &Path, output: &AnalysisOutput) -> Result<(), PipelineError> {
        artifacts::write_json(&self.config.output.interactions_path(root), &output.interactions)?;
        artifacts::write_json(&self.config.output.chains_path(root), &output.chains)
    }

    fn scan_service(&self, service: &str, files: &[SourceFile]) -> ServiceScan {
        let catalog_builder = CatalogBuilder::new(
            self.strategy.as_ref(),
            self.config.scan.effective_endpoint_file_suffix(),
        );
        let graph_builder = CallGraphBuilder::new(self.strategy.as_ref());

        let mut scan = ServiceScan {
            service: service.to_string(),
            catalog: ServiceCatalog::default(),
            graph: ServiceCallGraph::default(),
            errors: Vec::new(),
        };
        for file in files {
            let source = match read_source(file) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(path = %file.path.display(), error = %e, "unreadable source file");
                    scan.errors.push(e.into());
                    continue;
                }
            };
            let mut added = catalog_builder.add_source(&mut scan.catalog, &source, &file.file_name);
            scan.errors.append(&mut added.errors);
            graph_builder.add_source(&mut scan.graph, &source);
        }
        tracing::debug!(
            service,
            endpoints = scan.catalog.len(),
            methods = scan.graph.method_count(),
            "service scanned"
        );
        scan
    }

    /// Run `op` on a dedicated pool when a thread count is configured,
    /// otherwise on rayon's global pool.
    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        let threads = self.config.scan.effective_threads();
        if threads == 0 {
            return op();
        }
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(op),
            Err(e) => {
                tracing::warn!(threads, error = %e, "falling back to the global thread pool");
                op()
            }
        }
    }
}
