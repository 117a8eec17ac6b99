mod cli;

use cli::{Args, Command};
use sbom_depgraph::adapters::outbound::console::StderrProgressReporter;
use sbom_depgraph::adapters::outbound::filesystem::LocalRepositoryProvider;
use sbom_depgraph::adapters::outbound::network::{
    CachingRegistry, CratesIoClient, GitHubProvider, HttpSettings, NpmRegistryClient,
    PyPiRegistryClient, RegistryRouter, RubyGemsClient,
};
use sbom_depgraph::adapters::outbound::notification::LoggingComplianceNotifier;
use sbom_depgraph::adapters::outbound::persistence::InMemoryGraphStore;
use sbom_depgraph::application::dto::{SyncRequest, SyncSummary};
use sbom_depgraph::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use sbom_depgraph::application::use_cases::{SyncDependencies, SyncProductUseCase};
use sbom_depgraph::config::{self, ConfigFile};
use sbom_depgraph::discovery::parsers::LockfileRegistry;
use sbom_depgraph::ports::outbound::{HostingProvider, PackageRegistry, RepositoryRef};
use sbom_depgraph::shared::error::{DepGraphError, ExitCode};
use sbom_depgraph::shared::security::{validate_regular_file, MAX_FILE_SIZE};
use sbom_depgraph::shared::Result;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() {
    // clap exits with code 2 on invalid arguments
    let args = Args::parse_args();
    init_tracing(args.verbose);

    let exit_code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(exit_code.as_i32());
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<ExitCode> {
    if let Some(Command::ParseLockfile { file }) = &args.command {
        parse_lockfile(Path::new(file))?;
        return Ok(ExitCode::Success);
    }

    let project_dir = PathBuf::from(args.path.as_deref().unwrap_or("."));
    let config = load_config(args.config.as_deref(), &project_dir)?;

    // CLI flags win over the config file, which wins over defaults
    let format = args
        .format
        .or_else(|| config.output_format())
        .unwrap_or_default();
    let fail_on_gaps = args.fail_on_gaps.or(config.fail_on_gaps);
    let http = config.http_settings();

    let (provider, repository): (Arc<dyn HostingProvider>, RepositoryRef) = match &args.github {
        Some(slug) => {
            let repository = RepositoryRef::parse(slug).ok_or_else(|| DepGraphError::Validation {
                message: format!("--github expects OWNER/REPO, got '{}'", slug),
            })?;
            let token = std::env::var("GITHUB_TOKEN").ok();
            let provider: Arc<dyn HostingProvider> = Arc::new(GitHubProvider::new(
                &http,
                token.as_deref(),
                config.github_base_url(),
            )?);
            (provider, repository)
        }
        None => {
            let local = LocalRepositoryProvider::new(project_dir.clone())?;
            let repository = RepositoryRef::new("local", &directory_name(local.root()));
            let provider: Arc<dyn HostingProvider> = Arc::new(local);
            (provider, repository)
        }
    };

    let product = args.product.clone().unwrap_or_else(|| match &args.github {
        Some(_) => repository.to_string(),
        None => repository.name.clone(),
    });

    // Create adapters (Dependency Injection)
    let store = Arc::new(InMemoryGraphStore::new());
    let use_case = SyncProductUseCase::new(
        SyncDependencies {
            provider,
            graph_store: Arc::clone(&store),
            snapshot_store: store,
            registry: Arc::new(build_registry(&config, &http)?),
            notifier: Arc::new(LoggingComplianceNotifier::new()),
            progress_reporter: Arc::new(StderrProgressReporter::new()),
        },
        config.acquisition_settings(),
        config.enrichment_settings(),
    );

    let request = SyncRequest::new(&product, repository)
        .with_branch(args.branch.clone())
        .with_enrichment(!args.no_enrich);

    let span = tracing::info_span!("sync", run_id = %Uuid::new_v4(), product = %product);
    let response = use_case.execute(&request).instrument(span.clone()).await?;

    let mut summary = response.summary;
    if let Some(handle) = response.enrichment {
        summary.enrichment = handle.wait().instrument(span).await;
    }

    let presenter_type = PresenterType::from_output(args.output.as_deref());
    let colored = presenter_type.is_terminal_target() && std::io::stdout().is_terminal();

    eprintln!("{}", FormatterFactory::progress_message(format));
    let formatter = FormatterFactory::create(format, colored);
    let rendered = formatter.format(&summary)?;

    let presenter = PresenterFactory::create(presenter_type);
    presenter.present(&rendered)?;

    Ok(gap_exit_code(&summary, fail_on_gaps))
}

/// Explicit `--config` must load; a discovered file is optional
fn load_config(explicit: Option<&str>, project_dir: &Path) -> Result<ConfigFile> {
    match explicit {
        Some(path) => config::load_config_from_path(Path::new(path)),
        None => Ok(config::discover_config(project_dir)?.unwrap_or_default()),
    }
}

fn build_registry(
    config: &ConfigFile,
    http: &HttpSettings,
) -> Result<CachingRegistry<RegistryRouter>> {
    let routes: Vec<Arc<dyn PackageRegistry>> = vec![
        Arc::new(NpmRegistryClient::new(http, config.registry_base_url("npm"))?),
        Arc::new(PyPiRegistryClient::new(http, config.registry_base_url("pip"))?),
        Arc::new(CratesIoClient::new(http, config.registry_base_url("cargo"))?),
        Arc::new(RubyGemsClient::new(http, config.registry_base_url("gem"))?),
    ];
    Ok(CachingRegistry::new(RegistryRouter::new(routes)))
}

fn directory_name(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "local".to_string())
}

fn gap_exit_code(summary: &SyncSummary, threshold: Option<usize>) -> ExitCode {
    match threshold {
        Some(threshold) if summary.total_gaps() > threshold => {
            tracing::warn!(
                product = %summary.product,
                gaps = summary.total_gaps(),
                threshold,
                "Enrichment gaps exceed threshold"
            );
            ExitCode::GapsDetected
        }
        _ => ExitCode::Success,
    }
}

fn parse_lockfile(path: &Path) -> Result<()> {
    validate_regular_file(path, MAX_FILE_SIZE)?;
    let content = std::fs::read_to_string(path).map_err(|e| DepGraphError::FileReadError {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let result = LockfileRegistry::parse(&filename, &content);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
