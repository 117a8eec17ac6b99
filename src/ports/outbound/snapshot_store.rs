use crate::discovery::domain::SbomSnapshot;
use crate::shared::Result;
use async_trait::async_trait;

/// SnapshotStore port for per-product acquisition snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Replaces the product's snapshot wholesale
    async fn save(&self, snapshot: SbomSnapshot) -> Result<()>;

    async fn get(&self, product: &str) -> Result<Option<SbomSnapshot>>;

    /// Flags the snapshot as stale after an out-of-band change signal
    ///
    /// # Returns
    /// Whether a snapshot existed for the product
    async fn mark_stale(&self, product: &str) -> Result<bool>;
}
