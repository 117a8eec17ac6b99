use async_trait::async_trait;
use sbom_depgraph::prelude::*;
use sbom_depgraph::ports::outbound::RepositoryInfo;
use std::collections::BTreeMap;

/// Mock HostingProvider serving an in-memory file tree and optional SBOM
#[derive(Default)]
pub struct MockHostingProvider {
    pub sbom: Option<DependencyDocument>,
    pub files: BTreeMap<String, String>,
    pub api_fails: bool,
}

impl MockHostingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sbom(mut self, sbom: DependencyDocument) -> Self {
        self.sbom = Some(sbom);
        self
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_api_failure(mut self) -> Self {
        self.api_fails = true;
        self
    }
}

#[async_trait]
impl HostingProvider for MockHostingProvider {
    async fn repository_info(&self, _repo: &RepositoryRef) -> Result<RepositoryInfo> {
        if self.api_fails {
            anyhow::bail!("Mock provider API failure");
        }
        Ok(RepositoryInfo {
            default_branch: "main".to_string(),
            languages: Vec::new(),
        })
    }

    async fn get_sbom(&self, _repo: &RepositoryRef) -> Result<Option<DependencyDocument>> {
        if self.api_fails {
            anyhow::bail!("Mock provider API failure");
        }
        Ok(self.sbom.clone())
    }

    async fn get_file_content(
        &self,
        _repo: &RepositoryRef,
        _branch: &str,
        path: &str,
    ) -> Result<Option<String>> {
        Ok(self.files.get(path).cloned())
    }

    async fn list_repo_files(
        &self,
        _repo: &RepositoryRef,
        _branch: &str,
        max_files: usize,
    ) -> Result<Vec<String>> {
        Ok(self.files.keys().take(max_files).cloned().collect())
    }
}
