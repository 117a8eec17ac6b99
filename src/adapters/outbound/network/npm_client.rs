use super::registry_http::{trim_base_url, validate_url_component, HttpSettings, RegistryHttpClient};
use crate::discovery::domain::{Ecosystem, PackageHash, RegistryMetadata};
use crate::discovery::policies::LicensePolicy;
use crate::ports::outbound::PackageRegistry;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;

pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

#[derive(Debug, Deserialize)]
struct NpmVersionDocument {
    #[serde(default)]
    license: Option<NpmLicense>,
    /// Pre-2015 packages list licenses as an array
    #[serde(default)]
    licenses: Vec<NpmLicense>,
    #[serde(default)]
    dist: Option<NpmDist>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmLicense {
    Id(String),
    Object {
        #[serde(rename = "type")]
        kind: String,
    },
}

impl NpmLicense {
    fn as_str(&self) -> &str {
        match self {
            NpmLicense::Id(id) => id,
            NpmLicense::Object { kind } => kind,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NpmDist {
    #[serde(default)]
    integrity: Option<String>,
    #[serde(default)]
    shasum: Option<String>,
}

/// NpmRegistryClient adapter for the npm registry version endpoint
pub struct NpmRegistryClient {
    http: RegistryHttpClient,
    base_url: String,
}

impl NpmRegistryClient {
    pub fn new(settings: &HttpSettings, base_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            http: RegistryHttpClient::new(settings)?,
            base_url: trim_base_url(base_url.unwrap_or(NPM_REGISTRY_URL)),
        })
    }

    /// Builds the version URL, keeping scoped names as one path segment
    fn version_url(&self, name: &str, version: &str) -> Result<String> {
        match name.strip_prefix('@').and_then(|scoped| scoped.split_once('/')) {
            Some((scope, package)) => {
                validate_url_component(scope, "Package scope")?;
                validate_url_component(package, "Package name")?;
            }
            None => validate_url_component(name, "Package name")?,
        }
        validate_url_component(version, "Version")?;

        Ok(format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(name),
            urlencoding::encode(version)
        ))
    }

    fn to_metadata(document: NpmVersionDocument) -> RegistryMetadata {
        let license = document
            .license
            .iter()
            .chain(document.licenses.iter())
            .find_map(|l| LicensePolicy::normalize(l.as_str()));

        let hash = document.dist.and_then(|dist| {
            dist.integrity
                .as_deref()
                .and_then(PackageHash::from_integrity)
                .or_else(|| dist.shasum.map(|sha| PackageHash::new("SHA1", &sha)))
        });

        RegistryMetadata { license, hash }
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistryClient {
    fn supported_ecosystems(&self) -> Vec<Ecosystem> {
        vec![Ecosystem::Npm]
    }

    async fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<RegistryMetadata>> {
        if ecosystem != Ecosystem::Npm {
            anyhow::bail!("npm registry cannot look up {} packages", ecosystem);
        }
        let url = self.version_url(name, version)?;
        let document: Option<NpmVersionDocument> = self.http.get_json(&url).await?;
        Ok(document.map(Self::to_metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NpmRegistryClient {
        NpmRegistryClient::new(&HttpSettings::default(), None).unwrap()
    }

    #[test]
    fn test_version_url() {
        assert_eq!(
            client().version_url("lodash", "4.17.21").unwrap(),
            "https://registry.npmjs.org/lodash/4.17.21"
        );
        assert_eq!(
            client().version_url("@types/node", "20.1.0").unwrap(),
            "https://registry.npmjs.org/%40types%2Fnode/20.1.0"
        );
        assert!(client().version_url("../etc", "1.0.0").is_err());
        assert!(client().version_url("@a/b/c", "1.0.0").is_err());
    }

    #[test]
    fn test_base_url_override() {
        let client =
            NpmRegistryClient::new(&HttpSettings::default(), Some("http://localhost:4873/")).unwrap();
        assert_eq!(
            client.version_url("left-pad", "1.3.0").unwrap(),
            "http://localhost:4873/left-pad/1.3.0"
        );
    }

    #[test]
    fn test_to_metadata_prefers_integrity() {
        let document: NpmVersionDocument = serde_json::from_str(
            r#"{"license": "MIT", "dist": {"integrity": "sha512-abc==", "shasum": "deadbeef"}}"#,
        )
        .unwrap();
        let metadata = NpmRegistryClient::to_metadata(document);
        assert_eq!(metadata.license.as_deref(), Some("MIT"));
        assert_eq!(metadata.hash, Some(PackageHash::new("SHA512", "abc==")));
    }

    #[test]
    fn test_to_metadata_legacy_fields() {
        let document: NpmVersionDocument = serde_json::from_str(
            r#"{"licenses": [{"type": "Apache 2.0", "url": "http://x"}], "dist": {"shasum": "deadbeef"}}"#,
        )
        .unwrap();
        let metadata = NpmRegistryClient::to_metadata(document);
        assert_eq!(metadata.license.as_deref(), Some("Apache-2.0"));
        assert_eq!(metadata.hash, Some(PackageHash::new("SHA1", "deadbeef")));
    }
}
