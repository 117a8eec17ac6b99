use crate::discovery::domain::{
    DependencyDepth, DependencyNode, EdgeAttributes, EnrichmentKind, GapReason, NodeAttributes,
    PackageHash, SbomSnapshot,
};
use crate::ports::outbound::{GraphStore, NodePredicate, SnapshotStore};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeMap;

/// InMemoryGraphStore adapter implementing GraphStore and SnapshotStore
///
/// Nodes are keyed by purl, edges grouped per product. All writes merge by
/// key, and no entry guard is held across an await point.
#[derive(Default)]
pub struct InMemoryGraphStore {
    nodes: DashMap<String, DependencyNode>,
    edges: DashMap<String, BTreeMap<String, EdgeAttributes>>,
    snapshots: DashMap<String, SbomSnapshot>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes of a product with their edge attributes, in purl order
    pub fn product_graph(&self, product: &str) -> Vec<(DependencyNode, EdgeAttributes)> {
        let Some(edges) = self.edges.get(product) else {
            return Vec::new();
        };
        edges
            .iter()
            .filter_map(|(purl, attrs)| {
                self.nodes
                    .get(purl)
                    .map(|node| (node.value().clone(), attrs.clone()))
            })
            .collect()
    }

    fn with_node(&self, purl: &str, update: impl FnOnce(&mut DependencyNode)) -> Result<()> {
        let mut node = self
            .nodes
            .get_mut(purl)
            .ok_or_else(|| anyhow::anyhow!("Unknown graph node: {}", purl))?;
        update(node.value_mut());
        Ok(())
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn upsert_node(&self, purl: &str, attrs: NodeAttributes) -> Result<()> {
        match self.nodes.entry(purl.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().merge(attrs),
            Entry::Vacant(entry) => {
                entry.insert(DependencyNode::new(purl, attrs));
            }
        }
        Ok(())
    }

    async fn upsert_edge(&self, product: &str, purl: &str, attrs: EdgeAttributes) -> Result<()> {
        let mut edges = self.edges.entry(product.to_string()).or_default();
        let edge = edges.entry(purl.to_string()).or_default();
        edge.direct_hint = attrs.direct_hint;
        if attrs.depth.is_some() {
            edge.depth = attrs.depth;
        }
        Ok(())
    }

    async fn retain_edges(&self, product: &str, purls: &[String]) -> Result<usize> {
        let Some(mut edges) = self.edges.get_mut(product) else {
            return Ok(0);
        };
        let before = edges.len();
        edges.retain(|purl, _| purls.contains(purl));
        Ok(before - edges.len())
    }

    async fn product_edges(&self, product: &str) -> Result<Vec<(String, EdgeAttributes)>> {
        Ok(self
            .edges
            .get(product)
            .map(|edges| {
                edges
                    .iter()
                    .map(|(purl, attrs)| (purl.clone(), attrs.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_depth(
        &self,
        product: &str,
        purl: &str,
        depth: Option<DependencyDepth>,
    ) -> Result<()> {
        let mut edges = self
            .edges
            .get_mut(product)
            .ok_or_else(|| anyhow::anyhow!("Unknown product: {}", product))?;
        let edge = edges
            .get_mut(purl)
            .ok_or_else(|| anyhow::anyhow!("No edge from {} to {}", product, purl))?;
        edge.depth = depth;
        Ok(())
    }

    async fn get_node(&self, purl: &str) -> Result<Option<DependencyNode>> {
        Ok(self.nodes.get(purl).map(|node| node.value().clone()))
    }

    async fn select_nodes_needing_enrichment(
        &self,
        product: &str,
        predicate: &NodePredicate,
    ) -> Result<Vec<DependencyNode>> {
        Ok(self
            .product_graph(product)
            .into_iter()
            .map(|(node, _)| node)
            .filter(|node| predicate(node))
            .collect())
    }

    async fn update_hash(&self, purl: &str, hash: &PackageHash) -> Result<()> {
        self.with_node(purl, |node| {
            node.hash = Some(hash.value.clone());
            node.hash_algorithm = Some(hash.algorithm.clone());
            node.hash_gap_reason = None;
        })
    }

    async fn update_license(&self, purl: &str, license: &str) -> Result<()> {
        self.with_node(purl, |node| {
            node.license = Some(license.to_string());
            node.license_gap_reason = None;
        })
    }

    async fn record_gap(&self, purl: &str, kind: EnrichmentKind, reason: GapReason) -> Result<()> {
        self.with_node(purl, |node| match kind {
            EnrichmentKind::Hash => node.hash_gap_reason = Some(reason),
            EnrichmentKind::License => node.license_gap_reason = Some(reason),
        })
    }
}

#[async_trait]
impl SnapshotStore for InMemoryGraphStore {
    async fn save(&self, snapshot: SbomSnapshot) -> Result<()> {
        self.snapshots.insert(snapshot.product.clone(), snapshot);
        Ok(())
    }

    async fn get(&self, product: &str) -> Result<Option<SbomSnapshot>> {
        Ok(self.snapshots.get(product).map(|s| s.value().clone()))
    }

    async fn mark_stale(&self, product: &str) -> Result<bool> {
        Ok(self
            .snapshots
            .get_mut(product)
            .map(|mut snapshot| snapshot.is_stale = true)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::domain::{Ecosystem, SbomSource};

    fn attrs(name: &str, license: Option<&str>) -> NodeAttributes {
        NodeAttributes {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            ecosystem: Ecosystem::Npm,
            license: license.map(String::from),
            supplier: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_node_never_duplicates() {
        let store = InMemoryGraphStore::new();
        store.upsert_node("pkg:npm/a@1.0.0", attrs("a", None)).await.unwrap();
        store.upsert_node("pkg:npm/a@1.0.0", attrs("a", Some("MIT"))).await.unwrap();

        assert_eq!(store.node_count(), 1);
        let node = store.get_node("pkg:npm/a@1.0.0").await.unwrap().unwrap();
        assert_eq!(node.license.as_deref(), Some("MIT"));
    }

    #[tokio::test]
    async fn test_upsert_edge_keeps_depth_until_set() {
        let store = InMemoryGraphStore::new();
        store.upsert_node("pkg:npm/a@1.0.0", attrs("a", None)).await.unwrap();
        store
            .upsert_edge("acme/app", "pkg:npm/a@1.0.0", EdgeAttributes::default())
            .await
            .unwrap();
        store
            .set_depth("acme/app", "pkg:npm/a@1.0.0", Some(DependencyDepth::Direct))
            .await
            .unwrap();

        let hint = EdgeAttributes {
            depth: None,
            direct_hint: Some(false),
        };
        store.upsert_edge("acme/app", "pkg:npm/a@1.0.0", hint).await.unwrap();

        let edges = store.product_edges("acme/app").await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].1.depth, Some(DependencyDepth::Direct));
        assert_eq!(edges[0].1.direct_hint, Some(false));

        store.set_depth("acme/app", "pkg:npm/a@1.0.0", None).await.unwrap();
        let edges = store.product_edges("acme/app").await.unwrap();
        assert_eq!(edges[0].1.depth, None);
    }

    #[tokio::test]
    async fn test_retain_edges_keeps_nodes() {
        let store = InMemoryGraphStore::new();
        for purl in ["pkg:npm/a@1.0.0", "pkg:npm/b@1.0.0"] {
            store.upsert_node(purl, attrs("a", None)).await.unwrap();
            store
                .upsert_edge("acme/app", purl, EdgeAttributes::default())
                .await
                .unwrap();
        }

        let removed = store
            .retain_edges("acme/app", &["pkg:npm/b@1.0.0".to_string()])
            .await
            .unwrap();

        assert_eq!(removed, 1);
        let edges = store.product_edges("acme/app").await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].0, "pkg:npm/b@1.0.0");
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.retain_edges("acme/other", &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_select_and_update() {
        let store = InMemoryGraphStore::new();
        for name in ["a", "b"] {
            let purl = format!("pkg:npm/{}@1.0.0", name);
            store.upsert_node(&purl, attrs(name, None)).await.unwrap();
            store
                .upsert_edge("acme/app", &purl, EdgeAttributes::default())
                .await
                .unwrap();
        }
        store.upsert_node("pkg:npm/other@1.0.0", attrs("other", None)).await.unwrap();

        let needs_hash = |node: &DependencyNode| node.hash.is_none();
        let selected = store
            .select_nodes_needing_enrichment("acme/app", &needs_hash)
            .await
            .unwrap();
        assert_eq!(selected.len(), 2);

        store
            .update_hash("pkg:npm/a@1.0.0", &PackageHash::new("SHA512", "abc"))
            .await
            .unwrap();
        store
            .record_gap("pkg:npm/b@1.0.0", EnrichmentKind::Hash, GapReason::NotFound)
            .await
            .unwrap();

        let selected = store
            .select_nodes_needing_enrichment("acme/app", &needs_hash)
            .await
            .unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].hash_gap_reason, Some(GapReason::NotFound));
    }

    #[tokio::test]
    async fn test_update_unknown_node_fails() {
        let store = InMemoryGraphStore::new();
        assert!(store.update_license("pkg:npm/ghost@1.0.0", "MIT").await.is_err());
    }

    #[tokio::test]
    async fn test_snapshots() {
        let store = InMemoryGraphStore::new();
        assert!(!store.mark_stale("acme/app").await.unwrap());

        store
            .save(SbomSnapshot::new("acme/app", 2, SbomSource::Api))
            .await
            .unwrap();
        assert!(store.mark_stale("acme/app").await.unwrap());
        assert!(store.get("acme/app").await.unwrap().unwrap().is_stale);

        store
            .save(SbomSnapshot::new("acme/app", 3, SbomSource::Api))
            .await
            .unwrap();
        let snapshot = store.get("acme/app").await.unwrap().unwrap();
        assert!(!snapshot.is_stale);
        assert_eq!(snapshot.package_count, 3);
    }
}
