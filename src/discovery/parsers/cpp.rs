use crate::discovery::domain::{DependencyCollector, Ecosystem, ParsedDependency};
use crate::shared::Result;
use serde_json::Value;

/// Parses conan.lock, both the 2.x `requires` lists and the 1.x
/// `graph_lock.nodes` map.
pub(super) fn parse_conan_lock(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: Value = serde_json::from_str(content)?;
    let mut collector = DependencyCollector::new();

    let v2_refs = ["requires", "build_requires", "python_requires"]
        .into_iter()
        .filter_map(|key| parsed.get(key).and_then(|v| v.as_array()))
        .flatten()
        .filter_map(|v| v.as_str());

    let v1_refs = parsed
        .get("graph_lock")
        .and_then(|g| g.get("nodes"))
        .and_then(|n| n.as_object())
        .into_iter()
        .flat_map(|nodes| nodes.values())
        .filter_map(|node| node.get("ref").and_then(|r| r.as_str()));

    for reference in v2_refs.chain(v1_refs) {
        if let Some((name, version)) = split_conan_reference(reference) {
            collector.push(name, version, Ecosystem::Conan, false);
        }
    }

    Ok(collector.into_vec())
}

/// `zlib/1.3#rev%1700000000.0` or `fmt/10.1.1@user/channel` → (`zlib`, `1.3`)
fn split_conan_reference(reference: &str) -> Option<(&str, &str)> {
    let reference = reference.split(['#', '@']).next()?;
    let (name, version) = reference.split_once('/')?;
    Some((name, version))
}

/// Parses vcpkg.json manifests; versions come from `version>=` constraints
/// or from the `overrides` list.
pub(super) fn parse_vcpkg_json(content: &str) -> Result<Vec<ParsedDependency>> {
    let parsed: Value = serde_json::from_str(content)?;

    let overrides: Vec<(&str, &str)> = parsed
        .get("overrides")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter_map(|o| {
            let name = o.get("name")?.as_str()?;
            let version = ["version", "version-semver", "version-string", "version-date"]
                .into_iter()
                .find_map(|key| o.get(key).and_then(|v| v.as_str()))?;
            Some((name, version))
        })
        .collect();

    let mut collector = DependencyCollector::new();
    for dependency in parsed
        .get("dependencies")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
    {
        let (name, minimum) = match dependency {
            Value::String(name) => (name.as_str(), None),
            Value::Object(object) => {
                let Some(name) = object.get("name").and_then(|v| v.as_str()) else {
                    continue;
                };
                (name, object.get("version>=").and_then(|v| v.as_str()))
            }
            _ => continue,
        };
        let pinned = overrides.iter().find(|(n, _)| *n == name).map(|(_, v)| *v);
        let version = pinned.or(minimum).unwrap_or_default();
        // port revisions (`1.2.3#2`) are packaging metadata
        let version = version.split('#').next().unwrap_or(version);
        collector.push(name, version, Ecosystem::Vcpkg, true);
    }

    Ok(collector.into_vec())
}
