use crate::shared::Result;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Connection settings shared by every outbound HTTP adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 1,
        }
    }
}

/// JSON-over-HTTP client with retry and linear backoff
///
/// A 404 is an answer ("not found"), not a failure, and is never retried.
pub(crate) struct RegistryHttpClient {
    client: reqwest::Client,
    max_retries: u32,
}

impl RegistryHttpClient {
    pub(crate) fn new(settings: &HttpSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(user_agent())
            .build()?;

        Ok(Self {
            client,
            max_retries: settings.max_retries,
        })
    }

    /// Fetches and decodes `url`, retrying transport errors and non-2xx statuses
    ///
    /// # Returns
    /// `Ok(None)` when the server answered 404
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match self.fetch_once(url).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::debug!(url, attempt, error = %e, "registry request failed");
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * (attempt as u64 + 1)))
                            .await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("No request was attempted for {}", url)))
    }

    async fn fetch_once<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("{} returned status code {}", url, response.status());
        }

        Ok(Some(response.json().await?))
    }
}

pub(crate) fn user_agent() -> String {
    format!("sbom-depgraph/{}", env!("CARGO_PKG_VERSION"))
}

/// Validates a path segment before it is interpolated into a URL
///
/// # Security
/// Prevents URL injection through package names, versions and repository
/// coordinates coming from untrusted lockfiles.
pub(crate) fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
    if component.is_empty() {
        anyhow::bail!("{} is empty", component_type);
    }

    if component.contains('/') || component.contains('\\') {
        anyhow::bail!(
            "Security: {} contains path separators which are not allowed",
            component_type
        );
    }

    if component.contains("..") {
        anyhow::bail!(
            "Security: {} contains '..' which is not allowed",
            component_type
        );
    }

    if component.contains('#') || component.contains('?') || component.contains('@') {
        anyhow::bail!("Security: {} contains URL-unsafe characters", component_type);
    }

    Ok(())
}

/// Removes a trailing slash so paths can be appended with `format!`
pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(RegistryHttpClient::new(&HttpSettings::default()).is_ok());
    }

    #[test]
    fn test_default_settings() {
        let settings = HttpSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.max_retries, 1);
    }

    #[test]
    fn test_validate_url_component() {
        assert!(validate_url_component("requests", "Package name").is_ok());
        assert!(validate_url_component("1.0.0+local", "Version").is_ok());
        assert!(validate_url_component("", "Version").is_err());
        assert!(validate_url_component("../admin", "Package name").is_err());
        assert!(validate_url_component("a/b", "Package name").is_err());
        assert!(validate_url_component("x?y=1", "Version").is_err());
        assert!(validate_url_component("x@1", "Version").is_err());
    }

    #[test]
    fn test_trim_base_url() {
        assert_eq!(trim_base_url("https://registry.npmjs.org/"), "https://registry.npmjs.org");
    }
}
