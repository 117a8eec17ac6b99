use crate::discovery::domain::{
    DependencyDepth, DependencyNode, EdgeAttributes, EnrichmentKind, GapReason, NodeAttributes,
    PackageHash,
};
use crate::shared::Result;
use async_trait::async_trait;

/// Predicate used to select nodes for an enrichment run
pub type NodePredicate = dyn Fn(&DependencyNode) -> bool + Send + Sync;

/// GraphStore port for the persistent dependency graph
///
/// Nodes are keyed by canonical purl and edges by `(product, purl)`. Every
/// write is an upsert with merge semantics, so concurrent syncs of the same
/// product can interleave without application-level locking.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Creates the node on first sight, otherwise merges the attributes
    async fn upsert_node(&self, purl: &str, attrs: NodeAttributes) -> Result<()>;

    /// Creates or updates the `DEPENDS_ON` edge from `product` to `purl`
    ///
    /// An existing depth is kept when `attrs.depth` is `None`; only
    /// [`GraphStore::set_depth`] clears it.
    async fn upsert_edge(&self, product: &str, purl: &str, attrs: EdgeAttributes) -> Result<()>;

    /// Drops every edge of `product` whose purl is not in `purls`
    ///
    /// Nodes stay; other products may still reach them. Returns how many
    /// edges were removed.
    async fn retain_edges(&self, product: &str, purls: &[String]) -> Result<usize>;

    /// All edges of a product as `(purl, attributes)` pairs
    async fn product_edges(&self, product: &str) -> Result<Vec<(String, EdgeAttributes)>>;

    async fn set_depth(
        &self,
        product: &str,
        purl: &str,
        depth: Option<DependencyDepth>,
    ) -> Result<()>;

    async fn get_node(&self, purl: &str) -> Result<Option<DependencyNode>>;

    /// Nodes reachable from `product` that match `predicate`
    async fn select_nodes_needing_enrichment(
        &self,
        product: &str,
        predicate: &NodePredicate,
    ) -> Result<Vec<DependencyNode>>;

    /// Stores a hash and clears any recorded hash gap
    async fn update_hash(&self, purl: &str, hash: &PackageHash) -> Result<()>;

    /// Stores a license and clears any recorded license gap
    async fn update_license(&self, purl: &str, license: &str) -> Result<()>;

    async fn record_gap(&self, purl: &str, kind: EnrichmentKind, reason: GapReason) -> Result<()>;
}
