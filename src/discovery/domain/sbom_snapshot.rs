use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance of an acquired document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SbomSource {
    /// Hosting provider's native SBOM endpoint
    Api,
    /// Parsed lockfile or manifest, tagged with its filename
    Lockfile(String),
    /// Import-statement scan, tagged with the detected languages
    ImportScan(Vec<String>),
}

impl fmt::Display for SbomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SbomSource::Api => write!(f, "api"),
            SbomSource::Lockfile(kind) => write!(f, "lockfile:{}", kind),
            SbomSource::ImportScan(languages) => write!(f, "import-scan:{}", languages.join("+")),
        }
    }
}

impl From<SbomSource> for String {
    fn from(source: SbomSource) -> Self {
        source.to_string()
    }
}

impl TryFrom<String> for SbomSource {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "api" {
            return Ok(SbomSource::Api);
        }
        if let Some(kind) = value.strip_prefix("lockfile:") {
            return Ok(SbomSource::Lockfile(kind.to_string()));
        }
        if let Some(languages) = value.strip_prefix("import-scan:") {
            return Ok(SbomSource::ImportScan(
                languages.split('+').map(String::from).collect(),
            ));
        }
        Err(format!("Unknown SBOM source tag: {}", value))
    }
}

/// Per-product cached acquisition result
///
/// Replaced wholesale on every successful acquisition, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbomSnapshot {
    pub product: String,
    pub package_count: usize,
    pub source: SbomSource,
    pub is_stale: bool,
    pub synced_at: DateTime<Utc>,
}

impl SbomSnapshot {
    pub fn new(product: &str, package_count: usize, source: SbomSource) -> Self {
        Self {
            product: product.to_string(),
            package_count,
            source,
            is_stale: false,
            synced_at: Utc::now(),
        }
    }
}
