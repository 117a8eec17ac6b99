use super::registry_http::{trim_base_url, validate_url_component, HttpSettings, RegistryHttpClient};
use crate::discovery::domain::{Ecosystem, PackageHash, RegistryMetadata};
use crate::discovery::policies::LicensePolicy;
use crate::ports::outbound::PackageRegistry;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;

pub const PYPI_URL: &str = "https://pypi.org";

#[derive(Debug, Deserialize)]
struct PyPiPackageInfo {
    info: PyPiInfo,
    #[serde(default)]
    urls: Vec<PyPiReleaseFile>,
}

#[derive(Debug, Deserialize)]
struct PyPiInfo {
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    license_expression: Option<String>,
    #[serde(default)]
    classifiers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PyPiReleaseFile {
    #[serde(default)]
    packagetype: String,
    #[serde(default)]
    digests: PyPiDigests,
}

#[derive(Debug, Default, Deserialize)]
struct PyPiDigests {
    #[serde(default)]
    sha256: Option<String>,
}

/// PyPiRegistryClient adapter for the PyPI JSON API
///
/// License selection follows PyPI's own field priority (expression, license
/// field, classifiers). The hash is the sdist's sha256, or the first
/// distribution file's when no sdist was uploaded.
pub struct PyPiRegistryClient {
    http: RegistryHttpClient,
    base_url: String,
}

impl PyPiRegistryClient {
    pub fn new(settings: &HttpSettings, base_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            http: RegistryHttpClient::new(settings)?,
            base_url: trim_base_url(base_url.unwrap_or(PYPI_URL)),
        })
    }

    fn release_url(&self, package_name: &str, version: &str) -> Result<String> {
        validate_url_component(package_name, "Package name")?;
        validate_url_component(version, "Version")?;

        Ok(format!(
            "{}/pypi/{}/{}/json",
            self.base_url,
            urlencoding::encode(package_name),
            urlencoding::encode(version)
        ))
    }

    fn to_metadata(package_info: PyPiPackageInfo) -> RegistryMetadata {
        let license = LicensePolicy::select_pypi_license(
            package_info.info.license.as_deref(),
            package_info.info.license_expression.as_deref(),
            &package_info.info.classifiers,
        );

        let sdist = package_info.urls.iter().find(|f| f.packagetype == "sdist");
        let hash = sdist
            .into_iter()
            .chain(package_info.urls.iter())
            .find_map(|f| f.digests.sha256.as_deref())
            .map(|sha| PackageHash::new("SHA256", sha));

        RegistryMetadata { license, hash }
    }
}

#[async_trait]
impl PackageRegistry for PyPiRegistryClient {
    fn supported_ecosystems(&self) -> Vec<Ecosystem> {
        vec![Ecosystem::Pip]
    }

    async fn lookup(
        &self,
        ecosystem: Ecosystem,
        name: &str,
        version: &str,
    ) -> Result<Option<RegistryMetadata>> {
        if ecosystem != Ecosystem::Pip {
            anyhow::bail!("PyPI cannot look up {} packages", ecosystem);
        }
        let url = self.release_url(name, version)?;
        let package_info: Option<PyPiPackageInfo> = self.http.get_json(&url).await?;
        Ok(package_info.map(Self::to_metadata))
    }
}
