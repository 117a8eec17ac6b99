use crate::discovery::domain::{Ecosystem, RegistryMetadata};
use crate::ports::outbound::PackageRegistry;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// RegistryRouter dispatches lookups to the registry owning the ecosystem
///
/// The union of the routes' ecosystems is what enrichment treats as
/// supported; everything else is triaged as an unsupported-ecosystem gap
/// before a lookup is ever attempted.
pub struct RegistryRouter {
    routes: Vec<Arc<dyn PackageRegistry>>,
}

impl RegistryRouter {
    pub fn new(routes: Vec<Arc<dyn PackageRegistry>>) -> Self {
        Self { routes }
    }

    fn route(&self, ecosystem: Ecosystem) -> Option<&Arc<dyn PackageRegistry>> {
        self.routes
            .iter()
            .find(|registry| registry.supported_ecosystems().contains(&ecosystem))
    }
}

#[async_trait]
impl PackageRegistry for RegistryRouter {
    fn supported_ecosystems(&self) -> Vec<Ecosystem> {
        let mut ecosystems: Vec<Ecosystem> = self
            .routes
            .iter()
            .flat_map(|registry| registry.supported_ecosystems())
            .collect();
        ecosystems.sort();
        ecosystems.dedup();
        ecosystems
    }

    async fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<RegistryMetadata>> {
        let registry = self
            .route(ecosystem)
            .ok_or_else(|| anyhow::anyhow!("No registry configured for {}", ecosystem))?;
        registry.lookup(ecosystem, name, version).await
    }
}
