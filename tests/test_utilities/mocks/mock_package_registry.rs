use async_trait::async_trait;
use sbom_depgraph::discovery::domain::{PackageHash, RegistryMetadata};
use sbom_depgraph::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock PackageRegistry for testing
///
/// Answers for npm and pip. Unknown packages come back as "not found";
/// a failing registry errors on every lookup.
pub struct MockPackageRegistry {
    pub packages: HashMap<String, RegistryMetadata>,
    pub should_fail: bool,
    pub lookups: AtomicUsize,
}

impl MockPackageRegistry {
    pub fn new() -> Self {
        Self {
            packages: HashMap::new(),
            should_fail: false,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn with_package(
        mut self,
        name: &str,
        version: &str,
        license: Option<&str>,
        hash: Option<&str>,
    ) -> Self {
        self.packages.insert(
            format!("{}@{}", name, version),
            RegistryMetadata {
                license: license.map(str::to_string),
                hash: hash.map(|h| PackageHash::new("SHA512", h)),
            },
        );
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Default for MockPackageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageRegistry for MockPackageRegistry {
    fn supported_ecosystems(&self) -> Vec<Ecosystem> {
        vec![Ecosystem::Npm, Ecosystem::Pip]
    }

    async fn lookup(
        &self,
        _ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<RegistryMetadata>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            anyhow::bail!("Mock registry failure");
        }

        let key = format!("{}@{}", name, version);
        Ok(self.packages.get(&key).cloned())
    }
}
