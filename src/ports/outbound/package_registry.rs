use crate::discovery::domain::{Ecosystem, RegistryMetadata};
use crate::shared::Result;
use async_trait::async_trait;

/// PackageRegistry port for hash and license lookups
///
/// # Returns contract for `lookup`
/// - `Ok(Some(_))`: the registry knows this name and version
/// - `Ok(None)`: the registry answered but has no such package
/// - `Err(_)`: network failure, timeout or non-success status
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Ecosystems this registry can answer for
    fn supported_ecosystems(&self) -> Vec<Ecosystem>;

    async fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<RegistryMetadata>>;
}
