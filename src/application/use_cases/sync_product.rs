use super::{AcquireSbomUseCase, EnrichDependenciesUseCase, SyncDependencyGraphUseCase};
use crate::application::dto::{
    AcquisitionOutcome, AcquisitionSettings, EnrichmentSettings, SyncRequest, SyncResponse,
    SyncStatus, SyncSummary,
};
use crate::discovery::domain::{EnrichmentGapReport, EnrichmentKind, SbomSnapshot};
use crate::ports::outbound::{
    ComplianceNotifier, GraphStore, HostingProvider, PackageRegistry, ProgressReporter,
    SnapshotStore,
};
use crate::shared::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle to a detached enrichment task
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct EnrichmentHandle(JoinHandle<Vec<EnrichmentGapReport>>);

impl EnrichmentHandle {
    /// Waits for the hash and license reports
    ///
    /// A panicked or cancelled task is logged and yields no reports.
    pub async fn wait(self) -> Vec<EnrichmentGapReport> {
        match self.0.await {
            Ok(reports) => reports,
            Err(e) => {
                tracing::error!(error = %e, "Background enrichment task did not complete");
                Vec::new()
            }
        }
    }
}

/// SyncProductUseCase - acquisition, graph sync and background enrichment
///
/// The response is built as soon as the graph is written. Enrichment then
/// runs on its own task; its outcome reaches the compliance notifier whether
/// or not anyone waits on the returned handle.
///
/// # Type Parameters
/// * `H` - HostingProvider implementation
/// * `G` - GraphStore implementation
/// * `S` - SnapshotStore implementation
/// * `R` - PackageRegistry implementation
/// * `N` - ComplianceNotifier implementation
/// * `P` - ProgressReporter implementation
pub struct SyncProductUseCase<H: ?Sized, G: ?Sized, S: ?Sized, R: ?Sized, N: ?Sized, P: ?Sized> {
    acquire: AcquireSbomUseCase<H, P>,
    sync_graph: SyncDependencyGraphUseCase<G>,
    enrich: Arc<EnrichDependenciesUseCase<G, R, N, P>>,
    snapshot_store: Arc<S>,
}

/// Adapters shared by the stages of a product sync
pub struct SyncDependencies<H: ?Sized, G: ?Sized, S: ?Sized, R: ?Sized, N: ?Sized, P: ?Sized> {
    pub provider: Arc<H>,
    pub graph_store: Arc<G>,
    pub snapshot_store: Arc<S>,
    pub registry: Arc<R>,
    pub notifier: Arc<N>,
    pub progress_reporter: Arc<P>,
}

impl<H, G, S, R, N, P> SyncProductUseCase<H, G, S, R, N, P>
where
    H: HostingProvider + ?Sized,
    G: GraphStore + ?Sized + 'static,
    S: SnapshotStore + ?Sized,
    R: PackageRegistry + ?Sized + 'static,
    N: ComplianceNotifier + ?Sized + 'static,
    P: ProgressReporter + ?Sized + 'static,
{
    pub fn new(
        dependencies: SyncDependencies<H, G, S, R, N, P>,
        acquisition: AcquisitionSettings,
        enrichment: EnrichmentSettings,
    ) -> Self {
        let SyncDependencies {
            provider,
            graph_store,
            snapshot_store,
            registry,
            notifier,
            progress_reporter,
        } = dependencies;

        Self {
            acquire: AcquireSbomUseCase::new(provider, Arc::clone(&progress_reporter), acquisition),
            sync_graph: SyncDependencyGraphUseCase::new(Arc::clone(&graph_store)),
            enrich: Arc::new(EnrichDependenciesUseCase::new(
                graph_store,
                registry,
                notifier,
                progress_reporter,
                enrichment,
            )),
            snapshot_store,
        }
    }

    /// Syncs one product
    ///
    /// # Returns
    /// The sync summary plus, when enrichment was requested and data was
    /// acquired, a handle to the running enrichment task. "No data" is a
    /// successful outcome.
    ///
    /// # Errors
    /// Returns an error only if the graph or snapshot store rejects a write
    pub async fn execute(&self, request: &SyncRequest) -> Result<SyncResponse> {
        let (document, source) = match self.acquire.execute(request).await {
            AcquisitionOutcome::Acquired { document, source } => (document, source),
            AcquisitionOutcome::NoData => {
                return Ok(SyncResponse {
                    summary: SyncSummary::no_data(&request.product),
                    enrichment: None,
                });
            }
        };

        let graph = self.sync_graph.execute(&request.product, &document).await?;
        let package_count = document.dependency_packages().count();

        self.snapshot_store
            .save(SbomSnapshot::new(&request.product, package_count, source.clone()))
            .await?;

        let enrichment = request.enrich.then(|| self.spawn_enrichment(&request.product));

        Ok(SyncResponse {
            summary: SyncSummary {
                product: request.product.clone(),
                status: SyncStatus::Acquired,
                source: Some(source.to_string()),
                package_count,
                graph: Some(graph),
                confidence: document.confidence,
                detected_languages: document.detected_languages,
                enrichment: Vec::new(),
            },
            enrichment,
        })
    }

    /// Flags the product's snapshot stale after an out-of-band change signal
    ///
    /// # Returns
    /// Whether the product had a snapshot
    pub async fn mark_stale(&self, product: &str) -> Result<bool> {
        let existed = self.snapshot_store.mark_stale(product).await?;
        tracing::info!(product, existed, "Snapshot marked stale");
        Ok(existed)
    }

    fn spawn_enrichment(&self, product: &str) -> EnrichmentHandle {
        let enrich = Arc::clone(&self.enrich);
        let product = product.to_string();
        tracing::debug!(product = %product, "Spawning background enrichment");

        EnrichmentHandle(tokio::spawn(async move {
            let hash = enrich.run(&product, EnrichmentKind::Hash).await;
            let license = enrich.run(&product, EnrichmentKind::License).await;
            vec![hash, license]
        }))
    }
}
