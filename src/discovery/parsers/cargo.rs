use super::pinned_version;
use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use serde::Deserialize;

const DEPENDENCY_TABLES: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

#[derive(Debug, Deserialize)]
struct CargoLock {
    #[serde(default)]
    package: Vec<CargoLockPackage>,
}

#[derive(Debug, Deserialize)]
struct CargoLockPackage {
    name: String,
    version: String,
    #[serde(default)]
    source: Option<String>,
}

/// Parses Cargo.lock.
///
/// Workspace members and path dependencies carry no `source` and are the
/// project's own code, so they are left out. Cargo.lock does not mark
/// direct dependencies; every entry is reported as transitive.
pub(super) fn parse_cargo_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let lockfile: CargoLock = toml::from_str(content)?;
    let mut collector = DependencyCollector::new();
    for package in lockfile.package.iter().filter(|p| p.source.is_some()) {
        collector.push(&package.name, &package.version, Ecosystem::Cargo, false);
    }
    Ok(collector.into_vec())
}

/// Parses Cargo.toml dependency tables, including target-specific and
/// workspace-level ones.
pub(super) fn parse_cargo_toml(content: &str) -> Result<Vec<ParsedDependency>> {
    let manifest: toml::Value = toml::from_str(content)?;
    let mut collector = DependencyCollector::new();

    let mut tables: Vec<&toml::Value> = DEPENDENCY_TABLES
        .into_iter()
        .filter_map(|name| manifest.get(name))
        .collect();
    if let Some(workspace) = manifest.get("workspace") {
        tables.extend(workspace.get("dependencies"));
    }
    if let Some(targets) = manifest.get("target").and_then(|t| t.as_table()) {
        for target in targets.values() {
            tables.extend(DEPENDENCY_TABLES.into_iter().filter_map(|name| target.get(name)));
        }
    }

    for (key, spec) in tables.into_iter().filter_map(|t| t.as_table()).flatten() {
        let (name, requirement) = match spec {
            toml::Value::String(requirement) => (key.as_str(), requirement.as_str()),
            toml::Value::Table(table) => {
                let version = table.get("version").and_then(|v| v.as_str());
                // local crates are not third-party dependencies
                if version.is_none() && table.contains_key("path") {
                    continue;
                }
                let name = table.get("package").and_then(|v| v.as_str()).unwrap_or(key.as_str());
                (name, version.unwrap_or_default())
            }
            _ => continue,
        };
        collector.push(name, &pinned_version(requirement), Ecosystem::Cargo, true);
    }

    Ok(collector.into_vec())
}
