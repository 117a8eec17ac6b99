use super::registry_http::{trim_base_url, user_agent, validate_url_component, HttpSettings};
use crate::discovery::domain::DependencyDocument;
use crate::ports::outbound::{HostingProvider, RepositoryInfo, RepositoryRef};
use crate::shared::error::DepGraphError;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

pub const GITHUB_API_URL: &str = "https://api.github.com";

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

#[derive(Debug, Deserialize)]
struct RepoResponse {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct SbomResponse {
    sbom: DependencyDocument,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// GitHubProvider adapter for the GitHub REST API
///
/// Serves all three acquisition tiers: the dependency-graph SBOM export,
/// raw file contents, and the recursive git tree listing.
pub struct GitHubProvider {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubProvider {
    /// Creates a provider, authenticating when a token is given
    ///
    /// # Arguments
    /// * `settings` - Timeout settings (retries are not applied to the API)
    /// * `token` - Optional personal access token, usually from `GITHUB_TOKEN`
    /// * `base_url` - API root override for GitHub Enterprise
    pub fn new(settings: &HttpSettings, token: Option<&str>, base_url: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(user_agent())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: trim_base_url(base_url.unwrap_or(GITHUB_API_URL)),
        })
    }

    fn repo_url(&self, repo: &RepositoryRef) -> Result<String> {
        validate_url_component(&repo.owner, "Repository owner")?;
        validate_url_component(&repo.name, "Repository name")?;
        Ok(format!(
            "{}/repos/{}/{}",
            self.base_url,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name)
        ))
    }

    /// Encodes each path segment, keeping the separators
    fn encode_path(path: &str) -> String {
        path.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Sends a GET request, mapping 404 to `None` and other failures to a
    /// provider error
    async fn send(&self, url: &str, accept: &'static str) -> Result<Option<reqwest::Response>> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| DepGraphError::ProviderError {
                url: url.to_string(),
                details: e.to_string(),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DepGraphError::ProviderError {
                url: url.to_string(),
                details: format!("status code {}", response.status()),
            }
            .into());
        }
        Ok(Some(response))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        match self.send(url, JSON_MEDIA_TYPE).await? {
            Some(response) => Ok(Some(response.json().await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl HostingProvider for GitHubProvider {
    async fn repository_info(&self, repo: &RepositoryRef) -> Result<RepositoryInfo> {
        let repo_url = self.repo_url(repo)?;
        let languages_url = format!("{}/languages", repo_url);

        let (metadata, languages) = tokio::try_join!(
            self.get_json::<RepoResponse>(&repo_url),
            self.get_json::<HashMap<String, u64>>(&languages_url),
        )?;

        let metadata = metadata.ok_or_else(|| DepGraphError::ProviderError {
            url: repo_url.clone(),
            details: "repository not found".to_string(),
        })?;

        let mut languages: Vec<(String, u64)> = languages.unwrap_or_default().into_iter().collect();
        languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(RepositoryInfo {
            default_branch: metadata.default_branch,
            languages: languages.into_iter().map(|(name, _)| name).collect(),
        })
    }

    async fn get_sbom(&self, repo: &RepositoryRef) -> Result<Option<DependencyDocument>> {
        let url = format!("{}/dependency-graph/sbom", self.repo_url(repo)?);
        let response: Option<SbomResponse> = self.get_json(&url).await?;
        Ok(response.map(|r| r.sbom))
    }

    async fn get_file_content(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        path: &str,
    ) -> Result<Option<String>> {
        let url = format!(
            "{}/contents/{}?ref={}",
            self.repo_url(repo)?,
            Self::encode_path(path),
            urlencoding::encode(branch)
        );
        match self.send(&url, RAW_MEDIA_TYPE).await? {
            Some(response) => Ok(Some(response.text().await?)),
            None => Ok(None),
        }
    }

    async fn list_repo_files(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        max_files: usize,
    ) -> Result<Vec<String>> {
        let url = format!(
            "{}/git/trees/{}?recursive=1",
            self.repo_url(repo)?,
            urlencoding::encode(branch)
        );
        let Some(tree) = self.get_json::<TreeResponse>(&url).await? else {
            return Ok(Vec::new());
        };
        if tree.truncated {
            tracing::warn!(repository = %repo, "git tree listing was truncated by the API");
        }

        Ok(tree
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.path)
            .take(max_files)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GitHubProvider {
        GitHubProvider::new(&HttpSettings::default(), Some("ghp_test"), None).unwrap()
    }

    #[test]
    fn test_provider_creation_without_token() {
        assert!(GitHubProvider::new(&HttpSettings::default(), None, None).is_ok());
    }

    #[test]
    fn test_repo_url() {
        let repo = RepositoryRef::new("acme", "app");
        assert_eq!(
            provider().repo_url(&repo).unwrap(),
            "https://api.github.com/repos/acme/app"
        );
        assert!(provider()
            .repo_url(&RepositoryRef::new("..", "app"))
            .is_err());
    }

    #[test]
    fn test_enterprise_base_url() {
        let provider = GitHubProvider::new(
            &HttpSettings::default(),
            None,
            Some("https://github.example.com/api/v3/"),
        )
        .unwrap();
        let repo = RepositoryRef::new("acme", "app");
        assert_eq!(
            provider.repo_url(&repo).unwrap(),
            "https://github.example.com/api/v3/repos/acme/app"
        );
    }

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(
            GitHubProvider::encode_path("services/api/go.mod"),
            "services/api/go.mod"
        );
        assert_eq!(GitHubProvider::encode_path("a b/c#d"), "a%20b/c%23d");
    }

    #[test]
    fn test_sbom_response_deserializes() {
        let json = r#"{"sbom": {"SPDXID": "SPDXRef-DOCUMENT", "name": "acme/app",
            "packages": [{"SPDXID": "SPDXRef-npm-lodash", "name": "npm:lodash", "versionInfo": "4.17.21"}],
            "relationships": [{"spdxElementId": "SPDXRef-DOCUMENT", "relationshipType": "DESCRIBES",
                               "relatedSpdxElement": "SPDXRef-npm-lodash"}]}}"#;
        let response: SbomResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.sbom.packages.len(), 1);
        assert!(response.sbom.relationships.is_some());
    }
}
