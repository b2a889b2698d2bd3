use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use meshtrace_analysis::{artifacts, compare, Pipeline};
use meshtrace_core::config::{CliOverrides, MatchPolicy};
use meshtrace_core::{MeshtraceConfig, MeshtraceErrorCode, PipelineResult};

mod error;

use error::CliError;

/// Build service-to-service interaction chains from microservice sources.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Explicit config file (defaults to ROOT/meshtrace.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Endpoint selection when several declarations satisfy a call site
    #[arg(long, global = true, value_name = "first|longest-prefix")]
    policy: Option<MatchPolicy>,

    /// Worker threads for per-service scanning (0 = rayon default)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outbound HTTP call sites of the analyzed services
    Interactions {
        /// Directory containing the service directories
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Analyzed-services list (one service directory per line)
        #[arg(long)]
        services: Option<PathBuf>,

        /// Output file for the interaction results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Trace interaction chains from an interaction results artifact
    Chains {
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Interaction results produced by `interactions`
        #[arg(long)]
        interactions: Option<PathBuf>,

        /// Output file for the chain forest
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract interactions and trace chains, writing both artifacts
    Run {
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Check a chain forest against the interaction results it came from
    ///
    /// Exits with status 1 when the two artifacts disagree.
    Compare {
        #[arg(default_value = ".")]
        root: PathBuf,

        #[arg(long)]
        chains: Option<PathBuf>,

        #[arg(long)]
        interactions: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Default to warn for dependencies, our crates follow -v/-q.
    // MESHTRACE_LOG still takes precedence when set.
    let level = cli.verbose.tracing_level_filter();
    meshtrace_core::tracing::init_tracing_with_default(&format!("warn,meshtrace={level}"));

    match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.display_string());
            ExitCode::from(2)
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode, CliError> {
    let mut overrides = CliOverrides {
        match_policy: cli.policy,
        scan_threads: cli.threads,
        ..Default::default()
    };

    match cli.command {
        Commands::Interactions {
            root,
            services,
            output,
        } => {
            overrides.analyzed_services_file = services.as_deref().map(absolute);
            overrides.interactions_file = output.as_deref().map(absolute);
            let pipeline = Pipeline::new(load_config(cli.config.as_deref(), &root, &overrides)?)?;

            let result = pipeline.extract_interactions(&root)?;
            report_errors(&result);
            let path = pipeline.config().output.interactions_path(&root);
            artifacts::write_json(&path, &result.data)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Chains {
            root,
            interactions,
            output,
        } => {
            overrides.interactions_file = interactions.as_deref().map(absolute);
            overrides.chains_file = output.as_deref().map(absolute);
            let pipeline = Pipeline::new(load_config(cli.config.as_deref(), &root, &overrides)?)?;

            let result = pipeline.build_chains_from_artifact(&root)?;
            report_errors(&result);
            let path = pipeline.config().output.chains_path(&root);
            artifacts::write_json(&path, &result.data)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { root } => {
            let pipeline = Pipeline::new(load_config(cli.config.as_deref(), &root, &overrides)?)?;

            let result = pipeline.run(&root)?;
            report_errors(&result);
            pipeline.write_outputs(&root, &result.data)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compare {
            root,
            chains,
            interactions,
            json,
        } => {
            overrides.chains_file = chains.as_deref().map(absolute);
            overrides.interactions_file = interactions.as_deref().map(absolute);
            let config = load_config(cli.config.as_deref(), &root, &overrides)?;

            let forest = artifacts::read_chains(&config.output.chains_path(&root))?;
            let results = artifacts::read_interactions(&config.output.interactions_path(&root))?;
            let report = compare::compare(&forest, &results);

            if json {
                let rendered = serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::Render(e.to_string()))?;
                println!("{rendered}");
            } else {
                print!("{report}");
            }

            if report.is_consistent() {
                Ok(ExitCode::SUCCESS)
            } else {
                tracing::warn!(
                    count_mismatches = report.count_mismatches.len(),
                    missing = report.missing_in_results.len(),
                    extra = report.extra_in_results.len(),
                    "chains and interaction results disagree"
                );
                Ok(ExitCode::from(1))
            }
        }
    }
}

fn load_config(
    explicit: Option<&Path>,
    root: &Path,
    overrides: &CliOverrides,
) -> Result<MeshtraceConfig, CliError> {
    let config = match explicit {
        Some(path) => MeshtraceConfig::load_file(path, Some(overrides))?,
        None => MeshtraceConfig::load(root, Some(overrides))?,
    };
    Ok(config)
}

/// Paths given on the command line are relative to the working directory,
/// while configured paths are relative to the analysis root.
fn absolute(path: &Path) -> String {
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    resolved.display().to_string()
}

fn report_errors<T: Default>(result: &PipelineResult<T>) {
    for e in &result.errors {
        tracing::warn!("{}", e.display_string());
    }
    if !result.is_clean() {
        tracing::warn!(errors = result.error_count(), "completed with non-fatal errors");
    }
}

