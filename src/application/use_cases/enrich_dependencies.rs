use crate::application::dto::EnrichmentSettings;
use crate::discovery::domain::{
    DependencyNode, EnrichmentGapReport, EnrichmentKind, GapReason, RegistryMetadata,
};
use crate::discovery::policies::LicensePolicy;
use crate::discovery::services::EnrichmentTriage;
use crate::ports::outbound::{
    ComplianceNotifier, GraphStore, NodePredicate, PackageRegistry, ProgressReporter,
};
use crate::shared::Result;
use futures::future::join_all;
use std::sync::Arc;

/// EnrichDependenciesUseCase - batched hash and license enrichment
///
/// One run fills in one attribute for one product:
/// 1. select the product's nodes still lacking the attribute
/// 2. triage them into lookup candidates and gaps (no version, unsupported ecosystem,
///    not found on an earlier run)
/// 3. look up each batch concurrently, bounded by the per-request timeout
/// 4. write results back one at a time, classifying the rest as not found or fetch errors
/// 5. pause between batches
///
/// Gap reasons are persisted on the node and the aggregate report goes to
/// the compliance notifier.
///
/// # Type Parameters
/// * `G` - GraphStore implementation
/// * `R` - PackageRegistry implementation
/// * `N` - ComplianceNotifier implementation
/// * `P` - ProgressReporter implementation
pub struct EnrichDependenciesUseCase<G: ?Sized, R: ?Sized, N: ?Sized, P: ?Sized> {
    graph_store: Arc<G>,
    registry: Arc<R>,
    notifier: Arc<N>,
    progress_reporter: Arc<P>,
    settings: EnrichmentSettings,
}

impl<G, R, N, P> EnrichDependenciesUseCase<G, R, N, P>
where
    G: GraphStore + ?Sized,
    R: PackageRegistry + ?Sized,
    N: ComplianceNotifier + ?Sized,
    P: ProgressReporter + ?Sized,
{
    pub fn new(
        graph_store: Arc<G>,
        registry: Arc<R>,
        notifier: Arc<N>,
        progress_reporter: Arc<P>,
        settings: EnrichmentSettings,
    ) -> Self {
        Self {
            graph_store,
            registry,
            notifier,
            progress_reporter,
            settings,
        }
    }

    /// Runs one enrichment pass
    ///
    /// Never fails: selection, lookup and write failures all end up in the
    /// returned report, and `enriched + skipped + failed == total` holds for
    /// every report this returns.
    ///
    /// # Arguments
    /// * `product` - Product whose graph is enriched
    /// * `kind` - Attribute to fill in
    pub async fn run(&self, product: &str, kind: EnrichmentKind) -> EnrichmentGapReport {
        let predicate: &NodePredicate =
            &move |node: &DependencyNode| EnrichmentTriage::needs_enrichment(kind, node);

        let nodes = match self
            .graph_store
            .select_nodes_needing_enrichment(product, predicate)
            .await
        {
            Ok(nodes) => nodes,
            Err(e) => {
                tracing::warn!(product, kind = %kind, error = %e, "Could not select nodes for enrichment");
                self.progress_reporter
                    .report_error(&format!("⚠️  Skipping {} enrichment: {}", kind, e));
                let report = EnrichmentGapReport::new(kind, 0);
                self.finish(product, &report).await;
                return report;
            }
        };

        let triage = EnrichmentTriage::new(self.registry.supported_ecosystems());
        let (eligible, gaps) = triage.partition(kind, nodes);
        let mut report = EnrichmentGapReport::new(kind, eligible.len() + gaps.len());

        for (node, reason) in gaps {
            self.persist_gap(&node.purl, kind, reason).await;
            report.record_gap(reason);
        }

        if !eligible.is_empty() {
            self.progress_reporter.report(&format!(
                "🔍 Looking up {} for {} package(s)...",
                kind,
                eligible.len()
            ));
        }

        let batch_size = self.settings.batch_size.max(1);
        let mut processed = 0;
        for (index, batch) in eligible.chunks(batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.settings.batch_delay).await;
            }

            let results = join_all(batch.iter().map(|node| self.lookup(node))).await;

            for (node, result) in batch.iter().zip(results) {
                let outcome = match result {
                    Ok(Some(metadata)) => self.write_back(kind, node, metadata).await,
                    Ok(None) => Err(GapReason::NotFound),
                    Err(e) => {
                        tracing::warn!(product, purl = %node.purl, kind = %kind, error = %e, "Registry lookup failed");
                        Err(GapReason::FetchError)
                    }
                };

                match outcome {
                    Ok(()) => report.record_enriched(),
                    Err(reason) => {
                        self.persist_gap(&node.purl, kind, reason).await;
                        report.record_gap(reason);
                    }
                }
            }

            processed += batch.len();
            self.progress_reporter
                .report_progress(processed, eligible.len(), Some(kind.to_string().as_str()));
        }

        self.finish(product, &report).await;
        report
    }

    async fn lookup(&self, node: &DependencyNode) -> Result<Option<RegistryMetadata>> {
        let lookup = self
            .registry
            .lookup(node.ecosystem, &node.name, &node.version);
        match tokio::time::timeout(self.settings.request_timeout, lookup).await {
            Ok(result) => result,
            Err(_) => anyhow::bail!(
                "lookup timed out after {}ms",
                self.settings.request_timeout.as_millis()
            ),
        }
    }

    /// Writes the attribute this run owns
    ///
    /// A registry answer without that attribute counts as not found; a failed
    /// store write counts as a fetch error.
    async fn write_back(
        &self,
        kind: EnrichmentKind,
        node: &DependencyNode,
        metadata: RegistryMetadata,
    ) -> std::result::Result<(), GapReason> {
        let written = match kind {
            EnrichmentKind::Hash => match metadata.hash {
                Some(hash) => self.graph_store.update_hash(&node.purl, &hash).await,
                None => return Err(GapReason::NotFound),
            },
            EnrichmentKind::License => {
                match metadata.license.as_deref().and_then(LicensePolicy::normalize) {
                    Some(license) => self.graph_store.update_license(&node.purl, &license).await,
                    None => return Err(GapReason::NotFound),
                }
            }
        };

        written.map_err(|e| {
            tracing::warn!(purl = %node.purl, kind = %kind, error = %e, "Graph write failed");
            GapReason::FetchError
        })
    }

    async fn persist_gap(&self, purl: &str, kind: EnrichmentKind, reason: GapReason) {
        if let Err(e) = self.graph_store.record_gap(purl, kind, reason).await {
            tracing::warn!(purl, kind = %kind, reason = %reason, error = %e, "Could not persist gap reason");
        }
    }

    async fn finish(&self, product: &str, report: &EnrichmentGapReport) {
        tracing::info!(
            product,
            kind = %report.kind,
            total = report.total,
            enriched = report.enriched,
            skipped = report.skipped,
            failed = report.failed,
            "Enrichment run finished"
        );

        if let Err(e) = self.notifier.notify(product, report).await {
            tracing::warn!(product, error = %e, "Compliance notifier rejected the gap report");
        }

        self.progress_reporter.report_completion(&format!("{}", report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::persistence::InMemoryGraphStore;
    use crate::discovery::domain::{Ecosystem, EdgeAttributes, NodeAttributes, PackageHash, Purl};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    // Mock implementations for testing
    struct MockRegistry {
        missing: HashSet<String>,
        failing: HashSet<String>,
        slow: HashSet<String>,
        lookups: Arc<AtomicUsize>,
    }

    impl MockRegistry {
        fn new() -> Self {
            Self {
                missing: HashSet::new(),
                failing: HashSet::new(),
                slow: HashSet::new(),
                lookups: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl PackageRegistry for MockRegistry {
        fn supported_ecosystems(&self) -> Vec<Ecosystem> {
            vec![Ecosystem::Npm, Ecosystem::Pip]
        }

        async fn lookup(
            &self,
            _ecosystem: Ecosystem,
            name: &str,
            _version: &str,
        ) -> Result<Option<RegistryMetadata>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.slow.contains(name) {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if self.failing.contains(name) {
                anyhow::bail!("503 Service Unavailable");
            }
            if self.missing.contains(name) {
                return Ok(None);
            }
            Ok(Some(RegistryMetadata {
                license: Some("MIT License".to_string()),
                hash: Some(PackageHash::new("SHA256", &format!("digest-{}", name))),
            }))
        }
    }

    #[derive(Default)]
    struct MockNotifier {
        reports: Mutex<Vec<EnrichmentGapReport>>,
    }

    #[async_trait]
    impl ComplianceNotifier for MockNotifier {
        async fn notify(&self, _product: &str, report: &EnrichmentGapReport) -> Result<()> {
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    struct MockProgressReporter;

    impl ProgressReporter for MockProgressReporter {
        fn report(&self, _message: &str) {}
        fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
        fn report_error(&self, _message: &str) {}
        fn report_completion(&self, _message: &str) {}
    }

    async fn seed(store: &InMemoryGraphStore, name: &str, version: &str, ecosystem: Ecosystem) -> String {
        let purl = Purl::build(ecosystem, name, version);
        store
            .upsert_node(
                &purl,
                NodeAttributes {
                    name: name.to_string(),
                    version: version.to_string(),
                    ecosystem,
                    license: None,
                    supplier: None,
                },
            )
            .await
            .unwrap();
        store
            .upsert_edge("acme/app", &purl, EdgeAttributes::default())
            .await
            .unwrap();
        purl
    }

    fn settings() -> EnrichmentSettings {
        EnrichmentSettings {
            batch_size: 2,
            batch_delay: Duration::ZERO,
            request_timeout: Duration::from_millis(50),
        }
    }

    fn use_case(
        store: Arc<InMemoryGraphStore>,
        registry: MockRegistry,
        notifier: Arc<MockNotifier>,
    ) -> EnrichDependenciesUseCase<InMemoryGraphStore, MockRegistry, MockNotifier, MockProgressReporter>
    {
        EnrichDependenciesUseCase::new(
            store,
            Arc::new(registry),
            notifier,
            Arc::new(MockProgressReporter),
            settings(),
        )
    }

    #[tokio::test]
    async fn test_gap_classification_scenario() {
        let store = Arc::new(InMemoryGraphStore::new());
        for name in ["a", "b", "c"] {
            seed(&store, name, "", Ecosystem::Npm).await;
        }
        seed(&store, "zlib", "1.3", Ecosystem::Conan).await;
        seed(&store, "hashicorp/aws", "5.31.0", Ecosystem::Terraform).await;
        for name in ["lodash", "express", "flask", "requests"] {
            seed(&store, name, "1.0.0", Ecosystem::Npm).await;
        }
        let slow = seed(&store, "slowpoke", "1.0.0", Ecosystem::Npm).await;

        let mut registry = MockRegistry::new();
        registry.slow.insert("slowpoke".to_string());
        let notifier = Arc::new(MockNotifier::default());
        let use_case = use_case(Arc::clone(&store), registry, Arc::clone(&notifier));

        let report = use_case.run("acme/app", EnrichmentKind::Hash).await;

        assert_eq!(report.total, 10);
        assert_eq!(report.enriched, 4);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 5);
        assert_eq!(report.gaps.no_version, 3);
        assert_eq!(report.gaps.unsupported_ecosystem, 2);
        assert_eq!(report.gaps.not_found, 0);
        assert_eq!(report.gaps.fetch_error, 1);
        assert!(report.is_balanced());

        let node = store.get_node(&slow).await.unwrap().unwrap();
        assert_eq!(node.hash_gap_reason, Some(GapReason::FetchError));
        assert_eq!(notifier.reports.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_license_run_normalizes_and_writes_back() {
        let store = Arc::new(InMemoryGraphStore::new());
        let purl = seed(&store, "lodash", "4.17.21", Ecosystem::Npm).await;
        let notifier = Arc::new(MockNotifier::default());
        let use_case = use_case(Arc::clone(&store), MockRegistry::new(), notifier);

        let report = use_case.run("acme/app", EnrichmentKind::License).await;

        assert_eq!(report.enriched, 1);
        let node = store.get_node(&purl).await.unwrap().unwrap();
        assert_eq!(node.license.as_deref(), Some("MIT"));
        assert!(node.license_gap_reason.is_none());
    }

    #[tokio::test]
    async fn test_not_found_and_fetch_error_are_distinguished() {
        let store = Arc::new(InMemoryGraphStore::new());
        let missing = seed(&store, "ghost", "0.0.1", Ecosystem::Npm).await;
        seed(&store, "flaky", "1.0.0", Ecosystem::Pip).await;

        let mut registry = MockRegistry::new();
        registry.missing.insert("ghost".to_string());
        registry.failing.insert("flaky".to_string());
        let use_case = use_case(Arc::clone(&store), registry, Arc::new(MockNotifier::default()));

        let report = use_case.run("acme/app", EnrichmentKind::License).await;

        assert_eq!(report.gaps.not_found, 1);
        assert_eq!(report.gaps.fetch_error, 1);
        assert_eq!(report.failed, 2);
        let node = store.get_node(&missing).await.unwrap().unwrap();
        assert_eq!(node.license_gap_reason, Some(GapReason::NotFound));
    }

    #[tokio::test]
    async fn test_rerun_reports_not_found_without_refetching() {
        let store = Arc::new(InMemoryGraphStore::new());
        seed(&store, "ghost", "0.0.1", Ecosystem::Npm).await;
        seed(&store, "flaky", "1.0.0", Ecosystem::Npm).await;

        let mut registry = MockRegistry::new();
        registry.missing.insert("ghost".to_string());
        registry.failing.insert("flaky".to_string());
        let lookups = Arc::clone(&registry.lookups);
        let use_case = use_case(Arc::clone(&store), registry, Arc::new(MockNotifier::default()));

        use_case.run("acme/app", EnrichmentKind::Hash).await;
        assert_eq!(lookups.load(Ordering::SeqCst), 2);

        let report = use_case.run("acme/app", EnrichmentKind::Hash).await;

        // only the fetch error is retried
        assert_eq!(lookups.load(Ordering::SeqCst), 3);
        assert_eq!(report.total, 2);
        assert_eq!(report.gaps.not_found, 1);
        assert_eq!(report.gaps.fetch_error, 1);
        assert!(report.is_balanced());
    }

    #[tokio::test]
    async fn test_all_failing_registry_still_balances() {
        let store = Arc::new(InMemoryGraphStore::new());
        let mut registry = MockRegistry::new();
        for index in 0..7 {
            let name = format!("pkg{}", index);
            seed(&store, &name, "1.0.0", Ecosystem::Npm).await;
            registry.failing.insert(name);
        }
        let use_case = use_case(Arc::clone(&store), registry, Arc::new(MockNotifier::default()));

        let report = use_case.run("acme/app", EnrichmentKind::Hash).await;

        assert_eq!(report.total, 7);
        assert_eq!(report.failed, 7);
        assert!(report.is_balanced());
    }

    #[tokio::test]
    async fn test_already_enriched_nodes_are_not_selected() {
        let store = Arc::new(InMemoryGraphStore::new());
        let purl = seed(&store, "lodash", "4.17.21", Ecosystem::Npm).await;
        store
            .update_hash(&purl, &PackageHash::new("SHA512", "abc"))
            .await
            .unwrap();
        let use_case = use_case(Arc::clone(&store), MockRegistry::new(), Arc::new(MockNotifier::default()));

        let report = use_case.run("acme/app", EnrichmentKind::Hash).await;

        assert_eq!(report.total, 0);
        assert!(report.is_balanced());
    }

    #[tokio::test]
    async fn test_unknown_product_yields_empty_report() {
        let store = Arc::new(InMemoryGraphStore::new());
        let use_case = use_case(store, MockRegistry::new(), Arc::new(MockNotifier::default()));

        let report = use_case.run("nobody/nothing", EnrichmentKind::License).await;

        assert_eq!(report.total, 0);
        assert!(!report.has_gaps());
    }
}
