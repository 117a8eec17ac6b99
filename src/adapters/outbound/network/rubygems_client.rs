use super::registry_http::{trim_base_url, validate_url_component, HttpSettings, RegistryHttpClient};
use crate::discovery::domain::{Ecosystem, PackageHash, RegistryMetadata};
use crate::discovery::policies::LicensePolicy;
use crate::ports::outbound::PackageRegistry;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;

pub const RUBYGEMS_URL: &str = "https://rubygems.org";

#[derive(Debug, Deserialize)]
struct GemVersion {
    #[serde(default)]
    licenses: Option<Vec<String>>,
    #[serde(default)]
    sha: Option<String>,
}

/// RubyGemsClient adapter for the RubyGems v2 version endpoint
pub struct RubyGemsClient {
    http: RegistryHttpClient,
    base_url: String,
}

impl RubyGemsClient {
    pub fn new(settings: &HttpSettings, base_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            http: RegistryHttpClient::new(settings)?,
            base_url: trim_base_url(base_url.unwrap_or(RUBYGEMS_URL)),
        })
    }

    fn version_url(&self, name: &str, version: &str) -> Result<String> {
        validate_url_component(name, "Gem name")?;
        validate_url_component(version, "Version")?;

        Ok(format!(
            "{}/api/v2/rubygems/{}/versions/{}.json",
            self.base_url,
            urlencoding::encode(name),
            urlencoding::encode(version)
        ))
    }

    fn to_metadata(gem: GemVersion) -> RegistryMetadata {
        let licenses: Vec<String> = gem
            .licenses
            .unwrap_or_default()
            .iter()
            .filter_map(|l| LicensePolicy::normalize(l))
            .collect();
        let license = (!licenses.is_empty()).then(|| licenses.join(" OR "));
        let hash = gem.sha.map(|sha| PackageHash::new("SHA256", &sha));

        RegistryMetadata { license, hash }
    }
}

#[async_trait]
impl PackageRegistry for RubyGemsClient {
    fn supported_ecosystems(&self) -> Vec<Ecosystem> {
        vec![Ecosystem::Gem]
    }

    async fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<RegistryMetadata>> {
        if ecosystem != Ecosystem::Gem {
            anyhow::bail!("RubyGems cannot look up {} packages", ecosystem);
        }
        let url = self.version_url(name, version)?;
        let gem: Option<GemVersion> = self.http.get_json(&url).await?;
        Ok(gem.map(Self::to_metadata))
    }
}
