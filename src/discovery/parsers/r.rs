use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RenvLock {
    #[serde(default)]
    packages: BTreeMap<String, RenvPackage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RenvPackage {
    #[serde(default)]
    package: Option<String>,
    #[serde(default)]
    version: String,
}

/// Parses renv.lock
pub(super) fn parse_renv_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let lockfile: RenvLock = serde_json::from_str(content)?;
    let mut collector = DependencyCollector::new();
    for (key, package) in &lockfile.packages {
        let name = package.package.as_deref().unwrap_or(key.as_str());
        collector.push(name, &package.version, Ecosystem::Cran, false);
    }
    Ok(collector.into_vec())
}
