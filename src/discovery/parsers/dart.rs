use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct PubspecLock {
    #[serde(default)]
    packages: BTreeMap<String, PubPackage>,
}

#[derive(Debug, Deserialize)]
struct PubPackage {
    #[serde(default)]
    dependency: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    version: String,
}

/// Parses pubspec.lock; `dependency: "direct main"` / `"direct dev"` mark
/// direct packages and SDK-provided packages are skipped.
pub(super) fn parse_pubspec_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let lockfile: PubspecLock = serde_yaml_ng::from_str(content)?;
    let mut collector = DependencyCollector::new();

    for (name, package) in &lockfile.packages {
        if package.source == "sdk" {
            continue;
        }
        let is_direct = package.dependency.starts_with("direct");
        collector.push(name, &package.version, Ecosystem::Pub, is_direct);
    }

    Ok(collector.into_vec())
}
