use crate::application::dto::GraphSyncSummary;
use crate::discovery::domain::{
    DependencyDepth, DependencyDocument, DocumentPackage, EdgeAttributes, NodeAttributes, Purl,
    NOASSERTION,
};
use crate::discovery::services::DepthClassifier;
use crate::ports::outbound::GraphStore;
use crate::shared::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// SyncDependencyGraphUseCase - writes one document into the graph
///
/// Upserts a node per unique canonical purl and a `DEPENDS_ON` edge per
/// `(product, purl)`, drops the product's edges the document no longer
/// names, then tags every edge of the product with its depth when
/// the document carries relationship data. Without relationship data every
/// depth of the product is cleared, never guessed.
///
/// # Type Parameters
/// * `G` - GraphStore implementation
pub struct SyncDependencyGraphUseCase<G: ?Sized> {
    graph_store: Arc<G>,
}

impl<G> SyncDependencyGraphUseCase<G>
where
    G: GraphStore + ?Sized,
{
    pub fn new(graph_store: Arc<G>) -> Self {
        Self { graph_store }
    }

    /// Syncs a document for a product
    ///
    /// # Arguments
    /// * `product` - Product the edges hang off
    /// * `document` - Acquired dependency document
    ///
    /// # Returns
    /// Counts of what was written
    ///
    /// # Errors
    /// Returns an error if the graph store rejects a write; partially written
    /// nodes stay in place and are merged by the next sync
    pub async fn execute(
        &self,
        product: &str,
        document: &DependencyDocument,
    ) -> Result<GraphSyncSummary> {
        let packages = Self::unique_packages(document);

        for (purl, (attrs, direct_hint)) in &packages {
            self.graph_store.upsert_node(purl, attrs.clone()).await?;
            self.graph_store
                .upsert_edge(
                    product,
                    purl,
                    EdgeAttributes {
                        depth: None,
                        direct_hint: *direct_hint,
                    },
                )
                .await?;
        }

        let current: Vec<String> = packages.keys().cloned().collect();
        let removed = self.graph_store.retain_edges(product, &current).await?;
        if removed > 0 {
            tracing::debug!(product, removed, "Dropped edges no longer in the document");
        }

        let classification = DepthClassifier::classify(document);
        let edges = self.graph_store.product_edges(product).await?;

        let mut direct = 0;
        let mut transitive = 0;
        for (purl, _) in &edges {
            let depth = classification.as_ref().map(|c| c.depth_of(purl));
            match depth {
                Some(DependencyDepth::Direct) => direct += 1,
                Some(DependencyDepth::Transitive) => transitive += 1,
                None => {}
            }
            self.graph_store.set_depth(product, purl, depth).await?;
        }

        let summary = GraphSyncSummary {
            nodes: packages.len(),
            direct: classification.is_some().then_some(direct),
            transitive: classification.is_some().then_some(transitive),
        };

        match classification {
            Some(_) => tracing::info!(
                product,
                nodes = summary.nodes,
                direct,
                transitive,
                "Synced dependency graph"
            ),
            None => tracing::info!(
                product,
                nodes = summary.nodes,
                "Synced dependency graph without relationship data, depth left unset"
            ),
        }

        Ok(summary)
    }

    /// Collapses the document's packages onto canonical purls
    ///
    /// The first occurrence of a purl supplies its attributes; direct hints are
    /// combined so that one direct sighting is enough.
    fn unique_packages(
        document: &DependencyDocument,
    ) -> BTreeMap<String, (NodeAttributes, Option<bool>)> {
        let mut packages: BTreeMap<String, (NodeAttributes, Option<bool>)> = BTreeMap::new();

        for package in document.dependency_packages() {
            let purl = package.canonical_purl();
            match packages.get_mut(&purl) {
                Some((_, hint)) => {
                    *hint = match (*hint, package.direct_hint) {
                        (Some(a), Some(b)) => Some(a || b),
                        (a, b) => a.or(b),
                    };
                }
                None => {
                    let attrs = Self::node_attributes(&purl, package);
                    packages.insert(purl, (attrs, package.direct_hint));
                }
            }
        }

        packages
    }

    fn node_attributes(purl: &str, package: &DocumentPackage) -> NodeAttributes {
        let (fallback_ecosystem, fallback_name) = package.ecosystem_and_name();
        let parsed = Purl::parse(purl);

        NodeAttributes {
            name: parsed
                .as_ref()
                .map(|p| p.name())
                .unwrap_or(fallback_name),
            version: parsed
                .as_ref()
                .and_then(|p| p.version.clone())
                .unwrap_or_default(),
            ecosystem: parsed.map(|p| p.ecosystem).unwrap_or(fallback_ecosystem),
            license: package.license().map(str::to_string),
            supplier: package
                .supplier
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty() && *s != NOASSERTION)
                .map(str::to_string),
        }
    }
}
