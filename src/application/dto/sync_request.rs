use crate::ports::outbound::RepositoryRef;

/// SyncRequest - request DTO for syncing one product
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Product identifier the graph edges hang off
    pub product: String,
    pub repository: RepositoryRef,
    /// Branch to read; the repository's default branch when `None`
    pub branch: Option<String>,
    /// Whether to spawn background enrichment after the graph sync
    pub enrich: bool,
}

impl SyncRequest {
    pub fn new(product: &str, repository: RepositoryRef) -> Self {
        Self {
            product: product.to_string(),
            repository,
            branch: None,
            enrich: true,
        }
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    pub fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }
}
