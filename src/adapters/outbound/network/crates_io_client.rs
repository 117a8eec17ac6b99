use super::registry_http::{trim_base_url, validate_url_component, HttpSettings, RegistryHttpClient};
use crate::discovery::domain::{Ecosystem, PackageHash, RegistryMetadata};
use crate::discovery::policies::LicensePolicy;
use crate::ports::outbound::PackageRegistry;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;

pub const CRATES_IO_URL: &str = "https://crates.io";

#[derive(Debug, Deserialize)]
struct CrateVersionResponse {
    version: CrateVersion,
}

#[derive(Debug, Deserialize)]
struct CrateVersion {
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    checksum: Option<String>,
}

/// CratesIoClient adapter for the crates.io version endpoint
pub struct CratesIoClient {
    http: RegistryHttpClient,
    base_url: String,
}

impl CratesIoClient {
    pub fn new(settings: &HttpSettings, base_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            http: RegistryHttpClient::new(settings)?,
            base_url: trim_base_url(base_url.unwrap_or(CRATES_IO_URL)),
        })
    }

    fn version_url(&self, name: &str, version: &str) -> Result<String> {
        validate_url_component(name, "Crate name")?;
        validate_url_component(version, "Version")?;

        Ok(format!(
            "{}/api/v1/crates/{}/{}",
            self.base_url,
            urlencoding::encode(name),
            urlencoding::encode(version)
        ))
    }

    fn to_metadata(response: CrateVersionResponse) -> RegistryMetadata {
        // old crates use `MIT/Apache-2.0` for a choice of licenses
        let license = response
            .version
            .license
            .map(|l| l.replace('/', " OR "))
            .and_then(|l| LicensePolicy::normalize(&l));
        let hash = response
            .version
            .checksum
            .map(|sum| PackageHash::new("SHA256", &sum));

        RegistryMetadata { license, hash }
    }
}

#[async_trait]
impl PackageRegistry for CratesIoClient {
    fn supported_ecosystems(&self) -> Vec<Ecosystem> {
        vec![Ecosystem::Cargo]
    }

    async fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<RegistryMetadata>> {
        if ecosystem != Ecosystem::Cargo {
            anyhow::bail!("crates.io cannot look up {} packages", ecosystem);
        }
        let url = self.version_url(name, version)?;
        let response: Option<CrateVersionResponse> = self.http.get_json(&url).await?;
        Ok(response.map(Self::to_metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_url() {
        let client = CratesIoClient::new(&HttpSettings::default(), None).unwrap();
        assert_eq!(
            client.version_url("serde", "1.0.197").unwrap(),
            "https://crates.io/api/v1/crates/serde/1.0.197"
        );
    }

    #[test]
    fn test_to_metadata_splits_legacy_license_choice() {
        let response: CrateVersionResponse = serde_json::from_str(
            r#"{"version": {"license": "MIT/Apache-2.0", "checksum": "abc123"}}"#,
        )
        .unwrap();
        let metadata = CratesIoClient::to_metadata(response);
        assert_eq!(metadata.license.as_deref(), Some("MIT OR Apache-2.0"));
        assert_eq!(metadata.hash, Some(PackageHash::new("SHA256", "abc123")));
    }
}
