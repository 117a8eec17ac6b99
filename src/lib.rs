//! sbom-depgraph - dependency graph sync for products backed by source repositories
//!
//! This library acquires a repository's dependency list (provider SBOM,
//! lockfiles, or an import scan of source files), writes it into a product
//! dependency graph with direct/transitive classification, and enriches the
//! graph's packages with hashes and licenses from public registries.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`discovery`): Documents, purls, lockfile parsers and
//!   the depth, import-scan and triage services
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Config** (`config`): The optional YAML configuration file
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use sbom_depgraph::prelude::*;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn sync() -> Result<()> {
//! let http = HttpSettings::default();
//! let store = Arc::new(InMemoryGraphStore::new());
//! let npm: Arc<dyn PackageRegistry> = Arc::new(NpmRegistryClient::new(&http, None)?);
//! let registry = CachingRegistry::new(RegistryRouter::new(vec![npm]));
//!
//! let use_case = SyncProductUseCase::new(
//!     SyncDependencies {
//!         provider: Arc::new(LocalRepositoryProvider::new(PathBuf::from("."))?),
//!         graph_store: Arc::clone(&store),
//!         snapshot_store: store,
//!         registry: Arc::new(registry),
//!         notifier: Arc::new(LoggingComplianceNotifier::new()),
//!         progress_reporter: Arc::new(StderrProgressReporter::new()),
//!     },
//!     AcquisitionSettings::default(),
//!     EnrichmentSettings::default(),
//! );
//!
//! let request = SyncRequest::new("acme/app", RepositoryRef::new("acme", "app"));
//! let response = use_case.execute(&request).await?;
//! if let Some(handle) = response.enrichment {
//!     for report in handle.wait().await {
//!         println!("{}: {} gaps", report.kind, report.gaps.total());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod discovery;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemWriter, LocalRepositoryProvider, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, SummaryFormatter};
    pub use crate::adapters::outbound::network::{
        CachingRegistry, CratesIoClient, GitHubProvider, HttpSettings, NpmRegistryClient,
        PyPiRegistryClient, RegistryRouter, RubyGemsClient,
    };
    pub use crate::adapters::outbound::notification::LoggingComplianceNotifier;
    pub use crate::adapters::outbound::persistence::InMemoryGraphStore;
    pub use crate::application::dto::{
        AcquisitionOutcome, AcquisitionSettings, AcquisitionTier, EnrichmentSettings,
        OutputFormat, SyncRequest, SyncResponse, SyncSummary,
    };
    pub use crate::application::use_cases::{
        AcquireSbomUseCase, EnrichDependenciesUseCase, SyncDependencies,
        SyncDependencyGraphUseCase, SyncProductUseCase,
    };
    pub use crate::discovery::domain::{
        DependencyDocument, Ecosystem, EnrichmentGapReport, EnrichmentKind, LockfileParseResult,
        ParsedDependency, Purl, SbomSource,
    };
    pub use crate::discovery::parsers::LockfileRegistry;
    pub use crate::ports::outbound::{
        ComplianceNotifier, GraphStore, HostingProvider, OutputPresenter, PackageRegistry,
        ProgressReporter, ReportFormatter, RepositoryRef, SnapshotStore,
    };
    pub use crate::shared::Result;
}
