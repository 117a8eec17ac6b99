use crate::discovery::domain::DependencyDocument;
use crate::shared::Result;
use async_trait::async_trait;
use std::fmt;

/// Repository coordinates on a hosting provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Parses `owner/name`.
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, name) = slug.trim().trim_end_matches('/').split_once('/')?;
        let name = name.trim_end_matches(".git");
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository metadata fetched alongside the SBOM in the provider tier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub default_branch: String,
    pub languages: Vec<String>,
}

/// HostingProvider port for reading repositories
///
/// This port abstracts the source host (GitHub API, a local checkout, ...)
/// behind the three capabilities acquisition needs.
///
/// # Async Support
/// Implementations must be `Send + Sync`; the provider tier issues several
/// of these calls concurrently.
#[async_trait]
pub trait HostingProvider: Send + Sync {
    /// Fetches repository metadata (default branch, languages)
    async fn repository_info(&self, repo: &RepositoryRef) -> Result<RepositoryInfo>;

    /// Fetches the provider's native SBOM
    ///
    /// # Returns
    /// `Ok(None)` when the provider has no SBOM endpoint or no SBOM for this
    /// repository
    async fn get_sbom(&self, repo: &RepositoryRef) -> Result<Option<DependencyDocument>>;

    /// Reads one file at the given branch
    ///
    /// # Returns
    /// `Ok(None)` when the file does not exist
    async fn get_file_content(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        path: &str,
    ) -> Result<Option<String>>;

    /// Lists repository file paths (relative, `/`-separated), capped at
    /// `max_files` entries
    async fn list_repo_files(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        max_files: usize,
    ) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_ref_parse() {
        let repo = RepositoryRef::parse("acme/app").unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "app");
        assert_eq!(repo.to_string(), "acme/app");
        assert_eq!(RepositoryRef::parse("acme/app.git/"), Some(repo));
    }

    #[test]
    fn test_repository_ref_parse_rejects_invalid() {
        assert!(RepositoryRef::parse("acme").is_none());
        assert!(RepositoryRef::parse("/app").is_none());
        assert!(RepositoryRef::parse("acme/app/extra").is_none());
    }
}
