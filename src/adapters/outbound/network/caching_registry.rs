use crate::discovery::domain::{Ecosystem, RegistryMetadata};
use crate::ports::outbound::PackageRegistry;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    ecosystem: Ecosystem,
    name: String,
    version: String,
}

impl CacheKey {
    fn new(ecosystem: Ecosystem, name: &str, version: &str) -> Self {
        Self {
            ecosystem,
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

/// CachingRegistry wraps a PackageRegistry and adds in-memory caching.
///
/// The hash and license passes look up the same components, so the second
/// pass is served from memory. Only answers are cached, including "not
/// found"; failures are retried by the next caller.
pub struct CachingRegistry<R: PackageRegistry> {
    inner: R,
    cache: Arc<DashMap<CacheKey, Option<RegistryMetadata>>>,
}

impl<R: PackageRegistry> CachingRegistry<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: PackageRegistry> PackageRegistry for CachingRegistry<R> {
    fn supported_ecosystems(&self) -> Vec<Ecosystem> {
        self.inner.supported_ecosystems()
    }

    async fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<RegistryMetadata>> {
        let key = CacheKey::new(ecosystem, name, version);

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let metadata = self.inner.lookup(ecosystem, name, version).await?;
        self.cache.insert(key, metadata.clone());

        Ok(metadata)
    }
}
